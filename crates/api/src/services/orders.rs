//! Order service.
//!
//! Submitting copies the user's cart into a new order. The cart is left as
//! it is, and later cart changes never reach stored orders.

use thiserror::Error;

use crate::db::{CartRepository, OrderRepository, Repositories, RepositoryError, UserRepository};
use crate::models::{NewOrder, User, UserOrder};

/// Errors that can occur while submitting or listing orders.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// The user has no cart, or the cart holds no items.
    #[error("cart is empty for user: {0}")]
    EmptyCart(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order submission and history service.
pub struct OrderService<'a> {
    users: &'a dyn UserRepository,
    carts: &'a dyn CartRepository,
    orders: &'a dyn OrderRepository,
}

impl<'a> OrderService<'a> {
    /// Create an order service over the given repositories.
    #[must_use]
    pub fn new(repos: &'a Repositories) -> Self {
        Self {
            users: repos.users.as_ref(),
            carts: repos.carts.as_ref(),
            orders: repos.orders.as_ref(),
        }
    }

    /// Submit the user's current cart as an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::UserNotFound` if the user does not exist and
    /// `OrderError::EmptyCart` if the user has no cart or an empty one.
    pub async fn submit(&self, username: &str) -> Result<UserOrder, OrderError> {
        let user = self.find_user(username).await?;

        let cart = match self.carts.find_by_user(&user).await? {
            Some(cart) if !cart.is_empty() => cart,
            _ => {
                tracing::warn!(username, "order submit failed: cart is missing or empty");
                return Err(OrderError::EmptyCart(username.to_owned()));
            }
        };

        let order = self.orders.create(&NewOrder::from_cart(&cart)).await?;

        tracing::info!(
            username,
            order_id = %order.id,
            items = order.items.len(),
            total = %order.total,
            "order submitted"
        );
        Ok(order)
    }

    /// List the user's orders, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::UserNotFound` if the user does not exist.
    pub async fn history(&self, username: &str) -> Result<Vec<UserOrder>, OrderError> {
        let user = self.find_user(username).await?;
        let orders = self.orders.find_by_user(&user).await?;

        tracing::debug!(username, count = orders.len(), "order history loaded");
        Ok(orders)
    }

    async fn find_user(&self, username: &str) -> Result<User, OrderError> {
        self.users.find_by_username(username).await?.ok_or_else(|| {
            tracing::warn!(username, "order lookup failed: user not found");
            OrderError::UserNotFound(username.to_owned())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopkeep_core::{Price, Username};

    use super::*;
    use crate::db::{ItemRepository, MemoryStore};
    use crate::models::{Item, NewItem};
    use crate::services::CartService;

    async fn setup() -> (MemoryStore, Repositories, Item) {
        let store = MemoryStore::new();
        let repos = Repositories::in_memory(&store);
        UserRepository::create_with_cart(&store, &Username::parse("testUser").unwrap(), "hash")
            .await
            .unwrap();
        let item = ItemRepository::insert(
            &store,
            &NewItem {
                name: "Round Widget".to_string(),
                price: Price::new(Decimal::new(299, 2)),
                description: "A widget that is round".to_string(),
            },
        )
        .await
        .unwrap();
        (store, repos, item)
    }

    #[tokio::test]
    async fn test_submit_copies_cart() {
        let (_store, repos, item) = setup().await;
        let cart = CartService::new(&repos)
            .add_to_cart("testUser", item.id, 3)
            .await
            .unwrap();

        let order = OrderService::new(&repos).submit("testUser").await.unwrap();

        assert_eq!(order.user, *cart.user());
        assert_eq!(order.items, cart.items());
        assert_eq!(order.total, cart.total());
    }

    #[tokio::test]
    async fn test_order_unaffected_by_later_cart_changes() {
        let (_store, repos, item) = setup().await;
        let carts = CartService::new(&repos);
        let orders = OrderService::new(&repos);
        carts.add_to_cart("testUser", item.id, 2).await.unwrap();
        let submitted = orders.submit("testUser").await.unwrap();

        carts.remove_from_cart("testUser", item.id, 2).await.unwrap();
        carts.add_to_cart("testUser", item.id, 5).await.unwrap();

        let history = orders.history("testUser").await.unwrap();
        assert_eq!(history, vec![submitted.clone()]);
        assert_eq!(history[0].items.len(), 2);
        assert_eq!(history[0].total, Price::new(Decimal::new(598, 2)));
    }

    #[tokio::test]
    async fn test_submit_leaves_cart_intact() {
        let (store, repos, item) = setup().await;
        CartService::new(&repos)
            .add_to_cart("testUser", item.id, 1)
            .await
            .unwrap();

        OrderService::new(&repos).submit("testUser").await.unwrap();

        let user = UserRepository::find_by_username(&store, "testUser")
            .await
            .unwrap()
            .unwrap();
        let cart = CartRepository::find_by_user(&store, &user)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_submit_empty_cart() {
        let (_store, repos, _item) = setup().await;

        let err = OrderService::new(&repos)
            .submit("testUser")
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::EmptyCart(_)));
        assert!(
            OrderService::new(&repos)
                .history("testUser")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (_store, repos, _item) = setup().await;
        let orders = OrderService::new(&repos);

        assert!(matches!(
            orders.submit("nobody").await,
            Err(OrderError::UserNotFound(_))
        ));
        assert!(matches!(
            orders.history("nobody").await,
            Err(OrderError::UserNotFound(_))
        ));
    }
}
