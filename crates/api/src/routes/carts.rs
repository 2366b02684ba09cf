//! Cart route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;

use shopkeep_core::ItemId;

use crate::error::Result;
use crate::models::Cart;
use crate::services::CartService;
use crate::state::AppState;

use super::JsonBody;

/// Body of the add/remove cart requests.
///
/// A negative or missing `quantity` fails to parse and is a 400, as is a
/// quantity above [`MAX_QUANTITY`](crate::services::MAX_QUANTITY).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCartRequest {
    pub username: String,
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Add `quantity` units of an item to the user's cart.
pub async fn add_to_cart(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ModifyCartRequest>,
) -> Result<Json<Cart>> {
    let cart = CartService::new(state.repos())
        .add_to_cart(&request.username, request.item_id, request.quantity)
        .await?;
    Ok(Json(cart))
}

/// Remove up to `quantity` units of an item from the user's cart.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ModifyCartRequest>,
) -> Result<Json<Cart>> {
    let cart = CartService::new(state.repos())
        .remove_from_cart(&request.username, request.item_id, request.quantity)
        .await?;
    Ok(Json(cart))
}
