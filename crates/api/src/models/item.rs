//! Catalog item types.

use serde::{Deserialize, Serialize};

use shopkeep_core::{ItemId, Price};

/// A catalog item. Immutable reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub description: String,
}

/// A catalog item that has not been stored yet (seed input).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
}
