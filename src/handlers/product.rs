// src/handlers/product.rs
use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    Json,
};
use http::header;
use serde_json::Value;
use tracing::{info, instrument};

use crate::dtos::product::{ProductQueryParams, ProductRequest, ProductResponse};
use crate::error::AppError;
use crate::repositories::ProductFilter;
use crate::state::AppState;

/// Unwraps a JSON body, turning a missing or wrong Content-Type into 415
/// and any other body problem into a validation error.
fn json_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Err(AppError::unsupported_media_type(
            "Content-Type must be application/json",
        )),
        Err(rejection) => Err(AppError::validation(rejection.body_text())),
    }
}

/// Product id taken from the path. A segment that is not an integer can
/// never name a stored product, so it is reported as not found.
#[derive(Debug)]
pub struct ProductId(pub i64);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        raw.parse::<i64>()
            .map(ProductId)
            .map_err(|_| AppError::not_found(format!("Product with id '{raw}' was not found.")))
    }
}

// GET /products - List products, optionally filtered
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQueryParams>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let filter = ProductFilter::try_from(params)?;
    let products = state.catalog.search(filter).await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

// GET /products/{id} - Get single product
#[instrument(skip(state))]
pub async fn get_product(
    ProductId(id): ProductId,
    State(state): State<AppState>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state.catalog.retrieve(id).await?;
    Ok(Json(ProductResponse::from(product)))
}

// POST /products - Create new product
#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<ProductResponse>), AppError> {
    let body = json_body(payload)?;
    info!(%body, "Request to create a product");
    let request = ProductRequest::try_from(body)?;

    let product = state.catalog.create(request.into()).await?;
    let location = format!("/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ProductResponse::from(product)),
    ))
}

// PUT /products/{id} - Replace a product's fields
#[instrument(skip(state, payload))]
pub async fn update_product(
    ProductId(id): ProductId,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProductResponse>, AppError> {
    let body = json_body(payload)?;
    // Existence is checked before the body is validated.
    state.catalog.retrieve(id).await?;
    let request = ProductRequest::try_from(body)?;
    let product = state.catalog.update(id, request.into()).await?;
    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/{id} - Delete product; absent ids are fine
#[instrument(skip(state))]
pub async fn delete_product(
    ProductId(id): ProductId,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
