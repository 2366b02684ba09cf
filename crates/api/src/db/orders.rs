//! Order repository for `PostgreSQL`.
//!
//! Orders are written once and never updated.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopkeep_core::{OrderId, Price};

use super::items::ItemRow;
use super::{OrderRepository, RepositoryError};
use crate::models::{Item, NewOrder, User, UserOrder};

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    total: Price,
    created_at: DateTime<Utc>,
}

/// An item row tagged with the order it belongs to.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    order_id: OrderId,
    #[sqlx(flatten)]
    item: ItemRow,
}

/// Repository for order database operations.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: &NewOrder) -> Result<UserOrder, RepositoryError> {
        let item_ids: Vec<i32> = order.items.iter().map(|i| i.id.as_i32()).collect();

        let mut tx = self.pool.begin().await?;

        let row: OrderRow = sqlx::query_as(
            r"
            INSERT INTO user_order (user_id, total)
            VALUES ($1, $2)
            RETURNING id, total, created_at
            ",
        )
        .bind(order.user.id)
        .bind(order.total)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO user_order_item (order_id, position, item_id)
            SELECT $1, t.position::INT4, t.item_id
            FROM UNNEST($2::INT4[]) WITH ORDINALITY AS t(item_id, position)
            ",
        )
        .bind(row.id)
        .bind(&item_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(UserOrder {
            id: row.id,
            user: order.user.clone(),
            items: order.items.clone(),
            total: row.total,
            created_at: row.created_at,
        })
    }

    async fn find_by_user(&self, user: &User) -> Result<Vec<UserOrder>, RepositoryError> {
        let orders: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, total, created_at
            FROM user_order
            WHERE user_id = $1
            ORDER BY created_at, id
            ",
        )
        .bind(user.id)
        .fetch_all(&self.pool)
        .await?;

        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let item_rows: Vec<OrderItemRow> = sqlx::query_as(
            r"
            SELECT oi.order_id, i.id, i.name, i.price, i.description
            FROM user_order_item oi
            JOIN item i ON i.id = oi.item_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.order_id, oi.position
            ",
        )
        .bind(&order_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut items_by_order: HashMap<OrderId, Vec<Item>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(row.item.into());
        }

        Ok(orders
            .into_iter()
            .map(|o| UserOrder {
                id: o.id,
                user: user.clone(),
                items: items_by_order.remove(&o.id).unwrap_or_default(),
                total: o.total,
                created_at: o.created_at,
            })
            .collect())
    }
}
