//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::error::Result;
use crate::models::UserOrder;
use crate::services::OrderService;
use crate::state::AppState;

/// Submit the user's cart as an order.
pub async fn submit(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<UserOrder>> {
    let order = OrderService::new(state.repos()).submit(&username).await?;
    Ok(Json(order))
}

/// List the user's past orders.
pub async fn history(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<UserOrder>>> {
    let orders = OrderService::new(state.repos()).history(&username).await?;
    Ok(Json(orders))
}
