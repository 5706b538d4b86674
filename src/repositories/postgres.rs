use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::error;

use crate::models::product::{Category, NewProduct, Product};

use super::{NameMatch, ProductFilter, ProductRepository, RepositoryError};

const COLUMNS: &str = "id, name, description, price, available, category";

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    available: bool,
    category: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(|_| {
            RepositoryError::Decode(format!(
                "product {} has unknown category '{}'",
                row.id, row.category
            ))
        })?;
        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            available: row.available,
            category,
        })
    }
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, description, price, available, category)
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    async fn update(&self, id: i64, product: NewProduct) -> Result<Option<Product>, RepositoryError> {
        sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET
             name = $1, description = $2, price = $3, available = $4, category = $5
             WHERE id = $6 RETURNING {COLUMNS}"
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.available)
        .bind(product.category.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Product::try_from)
        .transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let mut query = search_query(filter);
        let rows = query
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, "Failed to search products");
                e
            })?;

        rows.into_iter().map(Product::try_from).collect()
    }
}

fn search_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(format!("SELECT {COLUMNS} FROM products WHERE 1=1"));

    if let Some(name) = &filter.name {
        match filter.name_match {
            NameMatch::Exact => query.push(" AND name = ").push_bind(name.clone()),
            NameMatch::Substring => query
                .push(" AND strpos(name, ")
                .push_bind(name.clone())
                .push(") > 0"),
        };
    }
    if let Some(category) = filter.category {
        query.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(available) = filter.available {
        query.push(" AND available = ").push_bind(available);
    }
    if let Some(price) = filter.price {
        query.push(" AND price = ").push_bind(price);
    }

    query.push(" ORDER BY id");
    query
}
