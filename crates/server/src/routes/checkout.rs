//! Checkout route handler.

use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::{CheckoutRequest, OrderDetail};
use crate::state::AppState;

/// Place an order.
///
/// Validates the payload, then hands the whole request to storage, which
/// upserts the customer, snapshots prices, decrements stock and creates the
/// order atomically. An empty cart is a 400; a line exceeding available stock
/// is a 409 and leaves nothing behind.
#[instrument(skip(state, request), fields(lines = request.items.len()))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderDetail>)> {
    request.validate().map_err(AppError::BadRequest)?;
    let order = state.storage.checkout(request).await?;

    tracing::info!(order_id = %order.order.id, total = %order.order.total, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}
