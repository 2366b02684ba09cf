//! Catalog route handlers. Items are read-only over HTTP.

use axum::{
    Json,
    extract::{Path, State},
};

use shopkeep_core::ItemId;

use crate::db::ItemRepository;
use crate::error::{AppError, Result};
use crate::models::Item;
use crate::state::AppState;

/// List every catalog item.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    Ok(Json(state.repos().items.find_all().await?))
}

/// Look up an item by ID.
pub async fn show(State(state): State<AppState>, Path(id): Path<ItemId>) -> Result<Json<Item>> {
    state
        .repos()
        .items
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("item {id}")))
}

/// Look up items by exact name. No match is a 404, not an empty list.
pub async fn find_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Vec<Item>>> {
    let items = state.repos().items.find_by_name(&name).await?;

    if items.is_empty() {
        return Err(AppError::NotFound(format!("items named {name}")));
    }

    Ok(Json(items))
}
