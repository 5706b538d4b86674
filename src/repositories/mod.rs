use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::product::{Category, NewProduct, Product};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProductRepository;
pub use postgres::PgProductRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// How the `name` filter compares against stored names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameMatch {
    #[default]
    Exact,
    /// Case-sensitive substring.
    Substring,
}

impl FromStr for NameMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(NameMatch::Exact),
            "substring" | "contains" => Ok(NameMatch::Substring),
            other => Err(format!("unknown name match policy '{other}'")),
        }
    }
}

/// Search predicate. Absent fields do not constrain; present ones are ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub available: Option<bool>,
    pub price: Option<Decimal>,
    pub name_match: NameMatch,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let name_ok = match (&self.name, self.name_match) {
            (None, _) => true,
            (Some(name), NameMatch::Exact) => product.name == *name,
            (Some(name), NameMatch::Substring) => product.name.contains(name.as_str()),
        };
        name_ok
            && self.category.map_or(true, |c| product.category == c)
            && self.available.map_or(true, |a| product.available == a)
            && self.price.map_or(true, |p| product.price == p)
    }
}

/// Storage collaborator behind the catalog service.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;
    async fn get(&self, id: i64) -> Result<Option<Product>, RepositoryError>;
    /// Replaces every mutable field; `None` when no record has this id.
    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, RepositoryError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;
    /// Matching records in ascending id order.
    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError>;
}
