//! Order domain types.
//!
//! An order is created once from a cart and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkeep_core::{OrderId, Price};

use super::{Cart, Item, User};

/// A submitted order (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrder {
    pub id: OrderId,
    pub user: User,
    /// Items copied from the cart at submission time.
    pub items: Vec<Item>,
    /// Cart total at submission time.
    pub total: Price,
    pub created_at: DateTime<Utc>,
}

/// An order that has not been stored yet.
///
/// Built from a cart by copying its items and total, so later changes to
/// the cart cannot reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user: User,
    pub items: Vec<Item>,
    pub total: Price,
}

impl NewOrder {
    /// Snapshot a cart's current contents.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            user: cart.user().clone(),
            items: cart.items().to_vec(),
            total: cart.total(),
        }
    }
}
