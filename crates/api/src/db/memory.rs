//! In-memory repository implementation.
//!
//! [`MemoryStore`] implements every repository trait over a shared,
//! mutex-guarded state. Clones share the same data, so a test can hand one
//! clone to the application and inspect another.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use shopkeep_core::{CartId, ItemId, OrderId, UserId, Username};

use super::{CartRepository, ItemRepository, OrderRepository, RepositoryError, UserRepository};
use crate::models::{Cart, Item, NewItem, NewOrder, User, UserOrder};

/// Shared in-memory storage.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<UserId, StoredUser>,
    carts: BTreeMap<CartId, StoredCart>,
    items: BTreeMap<ItemId, Item>,
    orders: BTreeMap<OrderId, StoredOrder>,
    next_id: i32,
}

struct StoredUser {
    user: User,
    password_hash: String,
}

struct StoredCart {
    user_id: UserId,
    item_ids: Vec<ItemId>,
}

struct StoredOrder {
    user_id: UserId,
    order: UserOrder,
}

impl MemoryState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn resolve_items(&self, ids: &[ItemId]) -> Result<Vec<Item>, RepositoryError> {
        ids.iter()
            .map(|id| {
                self.items.get(id).cloned().ok_or_else(|| {
                    RepositoryError::DataCorruption(format!("unknown item {id} in cart"))
                })
            })
            .collect()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.state().users.get(&id).map(|s| s.user.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|s| s.user.username.as_str() == username)
            .map(|s| s.user.clone()))
    }

    async fn create_with_cart(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut state = self.state();

        if state.users.values().any(|s| &s.user.username == username) {
            return Err(RepositoryError::Conflict(
                "username already exists".to_owned(),
            ));
        }

        let user = User {
            id: UserId::new(state.next_id()),
            username: username.clone(),
            created_at: Utc::now(),
        };
        let cart_id = CartId::new(state.next_id());

        state.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        state.carts.insert(
            cart_id,
            StoredCart {
                user_id: user.id,
                item_ids: Vec::new(),
            },
        );

        Ok(user)
    }

    async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .state()
            .users
            .values()
            .find(|s| s.user.username.as_str() == username)
            .map(|s| (s.user.clone(), s.password_hash.clone())))
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn find_by_user(&self, user: &User) -> Result<Option<Cart>, RepositoryError> {
        let state = self.state();

        let Some((cart_id, stored)) = state.carts.iter().find(|(_, c)| c.user_id == user.id)
        else {
            return Ok(None);
        };

        let items = state.resolve_items(&stored.item_ids)?;
        Ok(Some(Cart::from_parts(*cart_id, user.clone(), items)))
    }

    async fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let mut state = self.state();

        let stored = state
            .carts
            .get_mut(&cart.id())
            .ok_or(RepositoryError::NotFound)?;
        stored.item_ids = cart.items().iter().map(|i| i.id).collect();

        Ok(())
    }
}

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        Ok(self.state().items.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.state().items.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, RepositoryError> {
        Ok(self
            .state()
            .items
            .values()
            .filter(|i| i.name == name)
            .cloned()
            .collect())
    }

    async fn insert(&self, item: &NewItem) -> Result<Item, RepositoryError> {
        let mut state = self.state();

        let item = Item {
            id: ItemId::new(state.next_id()),
            name: item.name.clone(),
            price: item.price,
            description: item.description.clone(),
        };
        state.items.insert(item.id, item.clone());

        Ok(item)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn create(&self, order: &NewOrder) -> Result<UserOrder, RepositoryError> {
        let mut state = self.state();

        if !state.users.contains_key(&order.user.id) {
            return Err(RepositoryError::NotFound);
        }

        let stored = UserOrder {
            id: OrderId::new(state.next_id()),
            user: order.user.clone(),
            items: order.items.clone(),
            total: order.total,
            created_at: Utc::now(),
        };
        state.orders.insert(
            stored.id,
            StoredOrder {
                user_id: order.user.id,
                order: stored.clone(),
            },
        );

        Ok(stored)
    }

    async fn find_by_user(&self, user: &User) -> Result<Vec<UserOrder>, RepositoryError> {
        Ok(self
            .state()
            .orders
            .values()
            .filter(|o| o.user_id == user.id)
            .map(|o| o.order.clone())
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopkeep_core::Price;

    use super::*;

    fn widget() -> NewItem {
        NewItem {
            name: "Round Widget".to_string(),
            price: Price::new(Decimal::new(299, 2)),
            description: "A widget that is round".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_with_cart_creates_empty_cart() {
        let store = MemoryStore::new();
        let name = Username::parse("testUser").unwrap();

        let user = store.create_with_cart(&name, "hash").await.unwrap();
        let cart = CartRepository::find_by_user(&store, &user)
            .await
            .unwrap()
            .unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.user(), &user);
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = MemoryStore::new();
        let name = Username::parse("testUser").unwrap();
        store.create_with_cart(&name, "hash").await.unwrap();

        let err = store.create_with_cart(&name, "hash").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_cart_save_round_trips_items_in_order() {
        let store = MemoryStore::new();
        let user = store
            .create_with_cart(&Username::parse("testUser").unwrap(), "hash")
            .await
            .unwrap();
        let a = store.insert(&widget()).await.unwrap();
        let b = store
            .insert(&NewItem {
                name: "Square Widget".to_string(),
                price: Price::new(Decimal::new(199, 2)),
                description: String::new(),
            })
            .await
            .unwrap();

        let mut cart = CartRepository::find_by_user(&store, &user)
            .await
            .unwrap()
            .unwrap();
        cart.add_item(&b, 1);
        cart.add_item(&a, 2);
        store.save(&cart).await.unwrap();

        let reloaded = CartRepository::find_by_user(&store, &user)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded, cart);
    }

    #[tokio::test]
    async fn test_find_by_name_matches_exactly() {
        let store = MemoryStore::new();
        store.insert(&widget()).await.unwrap();

        assert_eq!(store.find_by_name("Round Widget").await.unwrap().len(), 1);
        assert!(store.find_by_name("Round").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_filtered_by_user() {
        let store = MemoryStore::new();
        let alice = store
            .create_with_cart(&Username::parse("alice").unwrap(), "hash")
            .await
            .unwrap();
        let bob = store
            .create_with_cart(&Username::parse("bob").unwrap(), "hash")
            .await
            .unwrap();

        let order = NewOrder {
            user: alice.clone(),
            items: Vec::new(),
            total: Price::ZERO,
        };
        store.create(&order).await.unwrap();

        assert_eq!(
            OrderRepository::find_by_user(&store, &alice)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(
            OrderRepository::find_by_user(&store, &bob)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
