// src/main.rs
mod config;
mod database;
mod dtos;
mod error;
mod handlers;
mod models;
mod repositories;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::fmt::init as tracing_init;

use crate::config::AppConfig;
use crate::repositories::{InMemoryProductRepository, PgProductRepository, ProductRepository};
use crate::services::CatalogService;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_init();

    // Load environment variables
    dotenv().ok();
    let config = AppConfig::from_env();

    // Pick the persistence collaborator
    let repo: Arc<dyn ProductRepository> = match &config.database_url {
        Some(url) => {
            let pool = match database::create_pool(url, config.db_max_connections).await {
                Ok(pool) => pool,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create database pool");
                    return;
                }
            };
            if let Err(e) = database::init_schema(&pool).await {
                tracing::error!(error = %e, "Failed to initialise database schema");
                return;
            }
            tracing::info!("Using PostgreSQL product repository");
            Arc::new(PgProductRepository::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, products are kept in memory");
            Arc::new(InMemoryProductRepository::new())
        }
    };

    // Create application state
    let catalog = CatalogService::new(repo, config.name_match);
    let app = routes::build_app(state::AppState::new(catalog));

    // Try port..port+20 to avoid crash when address is in use
    let listener = {
        let mut bound = None;
        for offset in 0u16..=20 {
            let port = config.port.saturating_add(offset);
            let addr = SocketAddr::from((config.host, port));
            match TcpListener::bind(addr).await {
                Ok(l) => {
                    bound = Some((l, addr));
                    break;
                }
                Err(e) => {
                    if offset == 0 {
                        tracing::warn!(%addr, error = %e, "Port in use, trying next");
                    }
                }
            }
        }
        match bound {
            Some((l, addr)) => {
                tracing::info!("Server running on {}", addr);
                l
            }
            None => {
                tracing::error!(
                    "Failed to bind to any port starting at {} on {}",
                    config.port,
                    config.host
                );
                return;
            }
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
    }
}
