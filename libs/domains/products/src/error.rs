use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_helpers::AppError;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::validation::ValidationErrors;

pub const NOT_FOUND_MESSAGE: &str = "Producto no encontrado";

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl From<ValidationErrors> for ProductError {
    fn from(errors: ValidationErrors) -> Self {
        ProductError::Validation(errors)
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ProductError::Validation(errors.into())
    }
}

/// `{"error": "Producto no encontrado"}`
#[derive(Debug, Serialize, ToSchema)]
pub struct NotFoundBody {
    #[schema(example = "Producto no encontrado")]
    pub error: &'static str,
}

/// Store and internal faults for the shared fault renderer.
///
/// Business errors are not expected here; they map to their closest generic
/// equivalent so nothing is lost if a caller converts them anyway.
impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => AppError::NotFound(format!("Product {} not found", id)),
            ProductError::Validation(errors) => AppError::BadRequest(errors.to_string()),
            ProductError::Database(e) => AppError::Database(e),
            ProductError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        match self {
            ProductError::Validation(errors) => {
                tracing::info!(count = errors.len(), "Request rejected by validation");
                errors.into_response()
            }
            ProductError::NotFound(id) => {
                tracing::info!(product_id = id, "Product not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(NotFoundBody {
                        error: NOT_FOUND_MESSAGE,
                    }),
                )
                    .into_response()
            }
            other => AppError::from(other).into_response(),
        }
    }
}
