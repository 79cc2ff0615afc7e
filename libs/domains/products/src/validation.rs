//! Declarative request validation.
//!
//! A rule set is an ordered list of [`FieldRules`]; [`validate`] runs every
//! rule of every field and collects one [`FieldError`] per failed rule. Rules
//! never short-circuit, so a field can report several problems at once.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use utoipa::ToSchema;

/// Where a validated field was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Params,
    Body,
}

/// One failed rule.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    /// Always `"field"`
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Offending value; omitted when the field was absent
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub value: Option<Value>,
    pub msg: String,
    pub path: String,
    pub location: Location,
}

impl FieldError {
    pub fn new(
        path: impl Into<String>,
        location: Location,
        value: Option<Value>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            kind: "field",
            value,
            msg: msg.into(),
            path: path.into(),
            location,
        }
    }
}

/// Ordered list of failed rules, rendered as `400 {"errors": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.msg.as_str()).collect()
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join(", "))
    }
}

impl IntoResponse for ValidationErrors {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

/// Failures reported by `validator` derives on typed inputs.
///
/// Fields come out sorted by name so the order is stable.
impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let errors = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| {
                    let msg = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    FieldError::new(
                        field.to_string(),
                        Location::Body,
                        err.params.get("value").cloned(),
                        msg,
                    )
                })
            })
            .collect();

        Self { errors }
    }
}

/// A single predicate with the message reported when it fails.
#[derive(Clone, Copy)]
pub struct Rule {
    pub check: fn(Option<&Value>) -> bool,
    pub message: &'static str,
}

impl Rule {
    pub const fn new(check: fn(Option<&Value>) -> bool, message: &'static str) -> Self {
        Self { check, message }
    }
}

/// Rules applied, in order, to one field.
#[derive(Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub location: Location,
    pub rules: &'static [Rule],
}

/// Raw request input: path parameters and the JSON body.
#[derive(Debug, Clone, Default)]
pub struct RequestInput {
    params: Map<String, Value>,
    body: Value,
}

impl RequestInput {
    pub fn new() -> Self {
        Self {
            params: Map::new(),
            body: Value::Object(Map::new()),
        }
    }

    pub fn param(mut self, name: &str, raw: &str) -> Self {
        self.params
            .insert(name.to_string(), Value::String(raw.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn get(&self, location: Location, field: &str) -> Option<&Value> {
        match location {
            Location::Params => self.params.get(field),
            Location::Body => self.body.as_object().and_then(|body| body.get(field)),
        }
    }
}

/// Run every rule of every field in declaration order.
pub fn validate(input: &RequestInput, rule_set: &[FieldRules]) -> ValidationErrors {
    let errors = rule_set
        .iter()
        .flat_map(|field| {
            let value = input.get(field.location, field.field);
            field
                .rules
                .iter()
                .filter(move |rule| !(rule.check)(value))
                .map(move |rule| {
                    FieldError::new(field.field, field.location, value.cloned(), rule.message)
                })
        })
        .collect();

    ValidationErrors { errors }
}

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").expect("numeric pattern is valid"));

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9]+$").expect("digits pattern is valid"));

/// Scalar rendered the way a query string or form would carry it
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Loose numeric coercion: numbers, numeric strings (blank is zero),
/// booleans as 1/0, `null` as 0. Anything else is NaN.
fn to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        _ => f64::NAN,
    }
}

/// Present, not `null`, and not an empty string
pub fn is_not_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

pub fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

/// Decimal number, optionally signed, given as a JSON number or a string
pub fn is_numeric(value: Option<&Value>) -> bool {
    value
        .and_then(as_text)
        .is_some_and(|text| NUMERIC.is_match(&text))
}

/// Coerces to a finite number strictly greater than zero
pub fn is_positive(value: Option<&Value>) -> bool {
    value.map(to_number).is_some_and(|n| n.is_finite() && n > 0.0)
}

/// `true`/`false`, `1`/`0`, or their string forms
pub fn is_boolean(value: Option<&Value>) -> bool {
    match value.and_then(as_text) {
        Some(text) => matches!(text.as_str(), "true" | "false" | "1" | "0"),
        None => false,
    }
}

/// Integer key greater than zero that fits in an `i32`
pub fn is_positive_int(value: Option<&Value>) -> bool {
    value
        .and_then(as_text)
        .filter(|text| DIGITS.is_match(text))
        .and_then(|text| text.trim_start_matches('+').parse::<i32>().ok())
        .is_some_and(|n| n > 0)
}
