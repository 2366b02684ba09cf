//! Cart repository for `PostgreSQL`.
//!
//! A cart's items live in `cart_item`, one row per unit, ordered by
//! `position`. Saving rewrites the rows and the stored total in a single
//! transaction.

use async_trait::async_trait;
use sqlx::PgPool;

use shopkeep_core::CartId;

use super::items::{ITEM_COLUMNS, ItemRow};
use super::{CartRepository, RepositoryError};
use crate::models::{Cart, Item, User};

/// Repository for cart database operations.
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn find_by_user(&self, user: &User) -> Result<Option<Cart>, RepositoryError> {
        let cart_id: Option<CartId> =
            sqlx::query_scalar("SELECT id FROM cart WHERE user_id = $1")
                .bind(user.id)
                .fetch_optional(&self.pool)
                .await?;

        let Some(cart_id) = cart_id else {
            return Ok(None);
        };

        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            r"
            SELECT {ITEM_COLUMNS}
            FROM cart_item ci
            JOIN item i ON i.id = ci.item_id
            WHERE ci.cart_id = $1
            ORDER BY ci.position
            "
        ))
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        let items = rows.into_iter().map(Item::from).collect();
        Ok(Some(Cart::from_parts(cart_id, user.clone(), items)))
    }

    async fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let item_ids: Vec<i32> = cart.items().iter().map(|i| i.id.as_i32()).collect();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE cart SET total = $2 WHERE id = $1")
            .bind(cart.id())
            .bind(cart.total())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM cart_item WHERE cart_id = $1")
            .bind(cart.id())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r"
            INSERT INTO cart_item (cart_id, position, item_id)
            SELECT $1, t.position::INT4, t.item_id
            FROM UNNEST($2::INT4[]) WITH ORDINALITY AS t(item_id, position)
            ",
        )
        .bind(cart.id())
        .bind(&item_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }
}
