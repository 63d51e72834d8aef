//! Order management route handlers (admin only).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use alto_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{OrderDetail, OrderSummary};
use crate::state::AppState;

/// List orders newest-first, with customer summaries.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<OrderSummary>>> {
    let orders = state.storage.list_orders().await?;
    Ok(Json(orders))
}

/// Order detail, including customer and items.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    let order = state
        .storage
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;
    Ok(Json(order))
}

/// Status update payload.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Update an order's status.
#[instrument(skip(state, _admin))]
pub async fn update_status(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<OrderId>,
    Json(payload): Json<StatusUpdate>,
) -> Result<Json<OrderDetail>> {
    let order = state.storage.update_order_status(id, payload.status).await?;

    tracing::info!(order_id = %id, status = %payload.status, "order status updated");

    Ok(Json(order))
}

/// Delete an order and its items.
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<OrderId>,
) -> Result<StatusCode> {
    state.storage.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
