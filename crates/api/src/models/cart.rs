//! Shopping cart domain type.
//!
//! A cart holds an ordered list of items where duplicates represent
//! quantity. The total is derived from the item list and recomputed after
//! every mutation, so it always equals the sum of the item prices.

use serde::{Deserialize, Serialize};

use shopkeep_core::{CartId, Price};

use super::{Item, User};

/// A user's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    id: CartId,
    user: User,
    items: Vec<Item>,
    total: Price,
}

impl Cart {
    /// Create an empty cart for a user.
    #[must_use]
    pub const fn new(id: CartId, user: User) -> Self {
        Self {
            id,
            user,
            items: Vec::new(),
            total: Price::ZERO,
        }
    }

    /// Rebuild a cart from stored rows. The total is derived from `items`.
    #[must_use]
    pub fn from_parts(id: CartId, user: User, items: Vec<Item>) -> Self {
        let mut cart = Self {
            id,
            user,
            items,
            total: Price::ZERO,
        };
        cart.recompute_total();
        cart
    }

    #[must_use]
    pub const fn id(&self) -> CartId {
        self.id
    }

    /// The user owning this cart.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Items in insertion order, one entry per unit.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append `quantity` units of `item`.
    pub fn add_item(&mut self, item: &Item, quantity: u32) {
        self.items
            .extend(std::iter::repeat_n(item, quantity as usize).cloned());
        self.recompute_total();
    }

    /// Remove up to `quantity` units of `item`, first occurrence first.
    ///
    /// Units that are not in the cart are skipped. Returns how many units
    /// were actually removed.
    pub fn remove_item(&mut self, item: &Item, quantity: u32) -> u32 {
        let mut removed = 0;
        while removed < quantity {
            let Some(pos) = self.items.iter().position(|i| i.id == item.id) else {
                break;
            };
            self.items.remove(pos);
            removed += 1;
        }
        self.recompute_total();
        removed
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(|i| i.price).sum();
    }
}
