use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product, UpdateProduct};

/// Persistence capability for products.
///
/// The store does not re-validate input; callers pass already validated data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; the store assigns the id and `availability = true`
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// All products, newest id first
    async fn list(&self) -> ProductResult<Vec<Product>>;

    /// Overwrite the provided fields and bump `updated_at`
    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product>;

    /// Returns whether a row was removed
    async fn delete(&self, id: i32) -> ProductResult<bool>;
}

#[derive(Default)]
struct Store {
    last_id: i32,
    products: BTreeMap<i32, Product>,
}

/// Process-local store used by tests and for running without a database.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        store.last_id = store
            .last_id
            .checked_add(1)
            .ok_or_else(|| ProductError::Internal("product id space exhausted".to_string()))?;

        let now = Utc::now();
        let product = Product {
            id: store.last_id,
            name: input.name,
            price: input.price,
            availability: true,
            created_at: now,
            updated_at: now,
        };
        store.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        Ok(self.store.read().await.products.get(&id).cloned())
    }

    async fn list(&self) -> ProductResult<Vec<Product>> {
        Ok(self
            .store
            .read()
            .await
            .products
            .values()
            .rev()
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, input: UpdateProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        let product = store
            .products
            .get_mut(&id)
            .ok_or(ProductError::NotFound(id))?;

        product.apply_update(input);

        tracing::info!(product_id = id, "Updated product");
        Ok(product.clone())
    }

    async fn delete(&self, id: i32) -> ProductResult<bool> {
        let removed = self.store.write().await.products.remove(&id).is_some();
        if removed {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(removed)
    }
}
