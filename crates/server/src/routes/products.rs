//! Product and variation route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use alto_core::{ProductId, VariationId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{
    NewProduct, NewVariation, Product, ProductDetail, ProductUpdate, ProductVariation,
    VariationUpdate,
};
use crate::state::AppState;

/// Catalog filter query parameters.
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub color: Option<String>,
}

/// List products, optionally filtered by color.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = state.storage.list_products(query.color.as_deref()).await?;
    Ok(Json(products))
}

/// Product detail, including its variations.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetail>> {
    let product = state
        .storage
        .get_product(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let variations = state.storage.list_variations(id).await?;
    Ok(Json(ProductDetail {
        product,
        variations,
    }))
}

/// Create a product.
#[instrument(skip(state, _admin, input))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let product = state.storage.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product.
#[instrument(skip(state, _admin, changes))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
    Json(changes): Json<ProductUpdate>,
) -> Result<Json<Product>> {
    changes.validate().map_err(AppError::BadRequest)?;
    let product = state.storage.update_product(id, changes).await?;
    Ok(Json(product))
}

/// Delete a product and its variations.
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    state.storage.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the variations of a product.
#[instrument(skip(state))]
pub async fn variations_index(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Vec<ProductVariation>>> {
    let variations = state.storage.list_variations(id).await?;
    Ok(Json(variations))
}

/// Add a variation to a product.
#[instrument(skip(state, _admin, input))]
pub async fn variations_create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
    Json(input): Json<NewVariation>,
) -> Result<(StatusCode, Json<ProductVariation>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let variation = state.storage.create_variation(id, input).await?;
    Ok((StatusCode::CREATED, Json(variation)))
}

/// Apply a partial update to a variation.
#[instrument(skip(state, _admin, changes))]
pub async fn variations_update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path((id, vid)): Path<(ProductId, VariationId)>,
    Json(changes): Json<VariationUpdate>,
) -> Result<Json<ProductVariation>> {
    changes.validate().map_err(AppError::BadRequest)?;
    let variation = state.storage.update_variation(id, vid, changes).await?;
    Ok(Json(variation))
}

/// Delete a variation.
#[instrument(skip(state, _admin))]
pub async fn variations_destroy(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path((id, vid)): Path<(ProductId, VariationId)>,
) -> Result<StatusCode> {
    state.storage.delete_variation(id, vid).await?;
    Ok(StatusCode::NO_CONTENT)
}
