use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, ReplaceProduct, UpdateProduct};
use crate::repository::ProductRepository;

/// Service layer for Product business logic
///
/// Every mutation on an existing id looks the product up first, so a missing
/// id is reported as [`ProductError::NotFound`] before anything is written.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// All products, newest id first
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.list().await
    }

    #[instrument(skip(self), fields(product_id = id))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input), fields(product_name = %input.name))]
    pub async fn create_product(&self, input: CreateProduct) -> ProductResult<Product> {
        input.validate()?;

        self.repository.create(input).await
    }

    /// Overwrite name, price and availability
    #[instrument(skip(self, input), fields(product_id = id))]
    pub async fn replace_product(&self, id: i32, input: ReplaceProduct) -> ProductResult<Product> {
        input.validate()?;

        self.get_product(id).await?;
        self.repository.update(id, input.into()).await
    }

    /// Flip availability; nothing else changes
    #[instrument(skip(self), fields(product_id = id))]
    pub async fn toggle_availability(&self, id: i32) -> ProductResult<Product> {
        let product = self.get_product(id).await?;

        self.repository
            .update(id, UpdateProduct::availability(!product.availability))
            .await
    }

    #[instrument(skip(self), fields(product_id = id))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        self.get_product(id).await?;

        let deleted = self.repository.delete(id).await?;
        if !deleted {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }
}
