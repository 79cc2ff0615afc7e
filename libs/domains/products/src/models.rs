use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A sellable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    /// Store-assigned key, never changes
    pub id: i32,
    pub name: String,
    /// Always strictly positive
    pub price: f64,
    pub availability: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Overwrite the fields present in `update`
    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(availability) = update.availability {
            self.availability = availability;
        }
        self.updated_at = Utc::now();
    }
}

/// Body of `POST /`; new products start available
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "El nombre del producto no puede ir vacio"))]
    #[schema(example = "Monitor Curvo")]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "El precio debe ser mayor a 0"))]
    #[schema(example = 300)]
    pub price: f64,
}

/// Body of `PUT /{id}`: every field is overwritten
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ReplaceProduct {
    #[validate(length(min = 1, message = "El nombre del producto no puede ir vacio"))]
    #[schema(example = "Monitor Curvo")]
    pub name: String,
    #[validate(range(exclusive_min = 0.0, message = "El precio debe ser mayor a 0"))]
    #[schema(example = 300)]
    pub price: f64,
    pub availability: bool,
}

/// Field-level store update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub availability: Option<bool>,
}

impl UpdateProduct {
    pub fn availability(availability: bool) -> Self {
        Self {
            availability: Some(availability),
            ..Self::default()
        }
    }
}

impl From<ReplaceProduct> for UpdateProduct {
    fn from(input: ReplaceProduct) -> Self {
        Self {
            name: Some(input.name),
            price: Some(input.price),
            availability: Some(input.availability),
        }
    }
}
