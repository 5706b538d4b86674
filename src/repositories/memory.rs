use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::models::product::{NewProduct, Product};

use super::{ProductFilter, ProductRepository, RepositoryError};

#[derive(Default)]
struct Store {
    products: BTreeMap<i64, Product>,
    last_id: i64,
}

/// Process-local repository. Ids come from a counter that only grows, so a
/// deleted id is never handed out again.
#[derive(Default)]
pub struct InMemoryProductRepository {
    store: RwLock<Store>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut store = self.store.write().await;
        store.last_id += 1;
        let product = product.with_id(store.last_id);
        store.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store.products.get(&id).cloned())
    }

    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, RepositoryError> {
        let mut store = self.store.write().await;
        Ok(store.products.get_mut(&id).map(|slot| {
            *slot = product.with_id(id);
            slot.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut store = self.store.write().await;
        Ok(store.products.remove(&id).is_some())
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let store = self.store.read().await;
        Ok(store
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }
}
