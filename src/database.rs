use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(30))
        .connect(database_url)
        .await
}

/// Creates the products table when it is missing.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS products (
            id          BIGSERIAL PRIMARY KEY,
            name        VARCHAR(100) NOT NULL,
            description VARCHAR(250) NOT NULL,
            price       NUMERIC(14, 2) NOT NULL CHECK (price >= 0),
            available   BOOLEAN NOT NULL DEFAULT TRUE,
            category    VARCHAR(32) NOT NULL DEFAULT 'UNKNOWN'
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}
