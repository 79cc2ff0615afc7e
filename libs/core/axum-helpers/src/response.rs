//! Success envelope shared by the resource handlers.

use serde::Serialize;
use utoipa::ToSchema;

/// `{ "data": ... }`
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Envelope<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}
