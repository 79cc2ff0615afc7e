//! JSON body extractor that tolerates missing bodies.

use crate::errors::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{HeaderMap, header},
};
use serde_json::{Map, Value};

/// Request body as an untyped JSON value.
///
/// Unlike `axum::Json`, this does not reject requests that carry no body or a
/// non-JSON content type: both yield an empty object, so field-level
/// validation can report every missing field. A body declared as JSON that
/// fails to parse is rejected with [`AppError::InvalidJson`].
///
/// ```ignore
/// async fn create(JsonBody(body): JsonBody) -> impl IntoResponse {
///     let name = body.get("name");
///     // ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

impl JsonBody {
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let declared_json = is_json_content_type(req.headers());

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if !declared_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::empty());
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::InvalidJson(e.to_string()))
    }
}

/// `application/json` or any `+json` media type, parameters ignored
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
