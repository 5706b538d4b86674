use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::AppError;
use crate::models::product::{NewProduct, Product};
use crate::repositories::{NameMatch, ProductFilter, ProductRepository};

/// Create, read, update, delete and search over an injected repository.
#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
    name_match: NameMatch,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ProductRepository>, name_match: NameMatch) -> Self {
        Self { repo, name_match }
    }

    #[instrument(skip(self, product), fields(name = %product.name))]
    pub async fn create(&self, product: NewProduct) -> Result<Product, AppError> {
        let product = self.repo.create(product).await?;
        info!(id = product.id, "Product saved");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, id: i64) -> Result<Product, AppError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::product_not_found(id))
    }

    #[instrument(skip(self, product))]
    pub async fn update(&self, id: i64, product: NewProduct) -> Result<Product, AppError> {
        let product = self
            .repo
            .update(id, product)
            .await?
            .ok_or_else(|| AppError::product_not_found(id))?;
        info!(id, "Product updated");
        Ok(product)
    }

    /// Deleting an id that does not exist succeeds without doing anything.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.repo.delete(id).await? {
            info!(id, "Product deleted");
        }
        Ok(())
    }

    /// The configured name policy overrides whatever the caller's filter carries.
    #[instrument(skip(self))]
    pub async fn search(&self, filter: ProductFilter) -> Result<Vec<Product>, AppError> {
        let filter = ProductFilter { name_match: self.name_match, ..filter };
        let products = self.repo.list(&filter).await?;
        info!(count = products.len(), "Returning products");
        Ok(products)
    }
}
