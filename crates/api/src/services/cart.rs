//! Cart service.
//!
//! Adds and removes catalog items in a user's cart. Every mutation looks
//! up the user by username and the item by ID first; nothing is saved when
//! either lookup misses. A single request moves at most [`MAX_QUANTITY`]
//! units.

use thiserror::Error;

use shopkeep_core::ItemId;

use crate::db::{CartRepository, ItemRepository, Repositories, RepositoryError, UserRepository};
use crate::models::{Cart, Item};

/// Largest quantity accepted by one add or remove request.
pub const MAX_QUANTITY: u32 = 1000;

/// Errors that can occur while modifying a cart.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("cart not found for user: {0}")]
    CartNotFound(String),

    #[error("quantity {0} exceeds the limit of {MAX_QUANTITY}")]
    InvalidQuantity(u32),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart modification service.
pub struct CartService<'a> {
    users: &'a dyn UserRepository,
    items: &'a dyn ItemRepository,
    carts: &'a dyn CartRepository,
}

impl<'a> CartService<'a> {
    /// Create a cart service over the given repositories.
    #[must_use]
    pub fn new(repos: &'a Repositories) -> Self {
        Self {
            users: repos.users.as_ref(),
            items: repos.items.as_ref(),
            carts: repos.carts.as_ref(),
        }
    }

    /// Add `quantity` units of an item to a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` above [`MAX_QUANTITY`], or
    /// `UserNotFound`, `ItemNotFound` or `CartNotFound` if a lookup misses.
    /// The cart is left unchanged on any error.
    pub async fn add_to_cart(
        &self,
        username: &str,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        check_quantity(username, quantity)?;
        let (mut cart, item) = self.load(username, item_id).await?;

        cart.add_item(&item, quantity);
        self.carts.save(&cart).await?;

        tracing::info!(
            username,
            item_id = %item_id,
            quantity,
            added = %item.price.times(quantity),
            total = %cart.total(),
            "items added to cart"
        );
        Ok(cart)
    }

    /// Remove up to `quantity` units of an item from a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` above [`MAX_QUANTITY`], or
    /// `UserNotFound`, `ItemNotFound` or `CartNotFound` if a lookup misses.
    /// The cart is left unchanged on any error.
    pub async fn remove_from_cart(
        &self,
        username: &str,
        item_id: ItemId,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        check_quantity(username, quantity)?;
        let (mut cart, item) = self.load(username, item_id).await?;

        let before = cart.total();
        let removed = cart.remove_item(&item, quantity);
        self.carts.save(&cart).await?;

        tracing::info!(
            username,
            item_id = %item_id,
            requested = quantity,
            removed,
            released = %(before - cart.total()),
            total = %cart.total(),
            "items removed from cart"
        );
        Ok(cart)
    }

    async fn load(&self, username: &str, item_id: ItemId) -> Result<(Cart, Item), CartError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            tracing::warn!(username, "cart update failed: user not found");
            return Err(CartError::UserNotFound(username.to_owned()));
        };

        let Some(item) = self.items.find_by_id(item_id).await? else {
            tracing::warn!(username, item_id = %item_id, "cart update failed: item not found");
            return Err(CartError::ItemNotFound(item_id));
        };

        let Some(cart) = self.carts.find_by_user(&user).await? else {
            tracing::error!(username, "cart update failed: user has no cart");
            return Err(CartError::CartNotFound(username.to_owned()));
        };

        Ok((cart, item))
    }
}

fn check_quantity(username: &str, quantity: u32) -> Result<(), CartError> {
    if quantity > MAX_QUANTITY {
        tracing::warn!(username, quantity, "cart update failed: quantity over limit");
        return Err(CartError::InvalidQuantity(quantity));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopkeep_core::{Price, Username};

    use super::*;
    use crate::db::MemoryStore;
    use crate::models::NewItem;

    async fn setup() -> (MemoryStore, Repositories, Item) {
        let store = MemoryStore::new();
        let repos = Repositories::in_memory(&store);
        store
            .create_with_cart(&Username::parse("testUser").unwrap(), "hash")
            .await
            .unwrap();
        let item = store
            .insert(&NewItem {
                name: "Gogoasa".to_string(),
                price: Price::new(Decimal::from(4)),
                description: "Cu ciocolata".to_string(),
            })
            .await
            .unwrap();
        (store, repos, item)
    }

    async fn stored_cart(store: &MemoryStore) -> Cart {
        let user = store.find_by_username("testUser").await.unwrap().unwrap();
        store.find_by_user(&user).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_add_to_cart() {
        let (store, repos, item) = setup().await;
        let service = CartService::new(&repos);

        let cart = service.add_to_cart("testUser", item.id, 4).await.unwrap();

        assert_eq!(cart.user().username.as_str(), "testUser");
        assert_eq!(cart.items().iter().filter(|i| i.id == item.id).count(), 4);
        assert_eq!(cart.total(), Price::new(Decimal::from(16)));
        assert_eq!(stored_cart(&store).await, cart);
    }

    #[tokio::test]
    async fn test_remove_from_cart() {
        let (store, repos, item) = setup().await;
        let service = CartService::new(&repos);
        service.add_to_cart("testUser", item.id, 4).await.unwrap();

        let cart = service
            .remove_from_cart("testUser", item.id, 4)
            .await
            .unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(stored_cart(&store).await, cart);
    }

    #[tokio::test]
    async fn test_user_not_found_leaves_cart_unchanged() {
        let (store, repos, item) = setup().await;
        let service = CartService::new(&repos);
        service.add_to_cart("testUser", item.id, 1).await.unwrap();
        let before = stored_cart(&store).await;

        let err = service.add_to_cart("nobody", item.id, 4).await.unwrap_err();
        assert!(matches!(err, CartError::UserNotFound(_)));

        let err = service
            .remove_from_cart("nobody", item.id, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::UserNotFound(_)));

        assert_eq!(stored_cart(&store).await, before);
    }

    #[tokio::test]
    async fn test_item_not_found_leaves_cart_unchanged() {
        let (store, repos, item) = setup().await;
        let service = CartService::new(&repos);
        service.add_to_cart("testUser", item.id, 2).await.unwrap();
        let before = stored_cart(&store).await;

        let missing = ItemId::new(9999);
        let err = service
            .add_to_cart("testUser", missing, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(id) if id == missing));

        let err = service
            .remove_from_cart("testUser", missing, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(_)));

        assert_eq!(stored_cart(&store).await, before);
    }

    #[tokio::test]
    async fn test_quantity_over_limit_is_rejected() {
        let (store, repos, item) = setup().await;
        let service = CartService::new(&repos);
        service.add_to_cart("testUser", item.id, 2).await.unwrap();
        let before = stored_cart(&store).await;

        for quantity in [MAX_QUANTITY + 1, u32::MAX] {
            let err = service
                .add_to_cart("testUser", item.id, quantity)
                .await
                .unwrap_err();
            assert!(matches!(err, CartError::InvalidQuantity(q) if q == quantity));

            let err = service
                .remove_from_cart("testUser", item.id, quantity)
                .await
                .unwrap_err();
            assert!(matches!(err, CartError::InvalidQuantity(_)));
        }

        assert_eq!(stored_cart(&store).await, before);
    }

    #[tokio::test]
    async fn test_quantity_at_limit_is_accepted() {
        let (_store, repos, item) = setup().await;
        let service = CartService::new(&repos);

        let cart = service
            .add_to_cart("testUser", item.id, MAX_QUANTITY)
            .await
            .unwrap();

        assert_eq!(cart.item_count(), MAX_QUANTITY as usize);
        assert_eq!(cart.total(), item.price.times(MAX_QUANTITY));
    }
}
