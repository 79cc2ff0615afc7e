//! Per-route rule sets and coercion into typed inputs.

use serde_json::Value;

use crate::models::{CreateProduct, ReplaceProduct};
use crate::validation::{
    is_boolean, is_not_empty, is_numeric, is_positive, is_positive_int, is_string, validate,
    FieldError, FieldRules, Location, RequestInput, Rule, ValidationErrors,
};

pub const ID_INVALID: &str = "Id no valido";
pub const NAME_EMPTY: &str = "El nombre del producto no puede ir vacio";
pub const NAME_NOT_STRING: &str = "El nombre del producto debe ser texto";
pub const PRICE_NOT_NUMERIC: &str = "Valor no valido";
pub const PRICE_NOT_POSITIVE: &str = "El precio debe ser mayor a 0";
pub const AVAILABILITY_INVALID: &str = "Valor para disponibilidad no valido";

const ID: FieldRules = FieldRules {
    field: "id",
    location: Location::Params,
    rules: &[Rule::new(is_positive_int, ID_INVALID)],
};

const NAME: FieldRules = FieldRules {
    field: "name",
    location: Location::Body,
    rules: &[
        Rule::new(is_not_empty, NAME_EMPTY),
        Rule::new(is_string, NAME_NOT_STRING),
    ],
};

const PRICE: FieldRules = FieldRules {
    field: "price",
    location: Location::Body,
    rules: &[
        Rule::new(is_numeric, PRICE_NOT_NUMERIC),
        Rule::new(is_positive, PRICE_NOT_POSITIVE),
    ],
};

const AVAILABILITY: FieldRules = FieldRules {
    field: "availability",
    location: Location::Body,
    rules: &[Rule::new(is_boolean, AVAILABILITY_INVALID)],
};

/// `GET /{id}`, `PATCH /{id}`, `DELETE /{id}`
pub const BY_ID: &[FieldRules] = &[ID];

/// `POST /`
pub const CREATE: &[FieldRules] = &[NAME, PRICE];

/// `PUT /{id}`
pub const REPLACE: &[FieldRules] = &[ID, NAME, PRICE, AVAILABILITY];

/// Validate a path id and return it as a key
pub fn product_id(raw: &str) -> Result<i32, ValidationErrors> {
    let input = RequestInput::new().param("id", raw);
    validate(&input, BY_ID).into_result()?;
    parse_id(raw, &input)
}

/// Validate a create body; extra fields are ignored
pub fn create_product(body: &Value) -> Result<CreateProduct, ValidationErrors> {
    let input = RequestInput::new().body(body.clone());
    validate(&input, CREATE).into_result()?;

    Ok(CreateProduct {
        name: text(&input, "name"),
        price: number(&input, "price"),
    })
}

/// Validate a path id plus a full replacement body
pub fn replace_product(
    raw_id: &str,
    body: &Value,
) -> Result<(i32, ReplaceProduct), ValidationErrors> {
    let input = RequestInput::new().param("id", raw_id).body(body.clone());
    validate(&input, REPLACE).into_result()?;

    let id = parse_id(raw_id, &input)?;
    Ok((
        id,
        ReplaceProduct {
            name: text(&input, "name"),
            price: number(&input, "price"),
            availability: flag(&input, "availability"),
        },
    ))
}

// Coercion helpers; only called once the rule set has passed.

fn parse_id(raw: &str, input: &RequestInput) -> Result<i32, ValidationErrors> {
    raw.trim_start_matches('+').parse().map_err(|_| ValidationErrors {
        errors: vec![FieldError::new(
            "id",
            Location::Params,
            input.get(Location::Params, "id").cloned(),
            ID_INVALID,
        )],
    })
}

fn text(input: &RequestInput, field: &str) -> String {
    input
        .get(Location::Body, field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn number(input: &RequestInput, field: &str) -> f64 {
    match input.get(Location::Body, field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0.0,
    }
}

fn flag(input: &RequestInput, field: &str) -> bool {
    match input.get(Location::Body, field) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true" || s == "1",
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        _ => false,
    }
}
