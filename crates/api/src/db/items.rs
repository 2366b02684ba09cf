//! Catalog item repository for `PostgreSQL`.

use async_trait::async_trait;
use sqlx::PgPool;

use shopkeep_core::{ItemId, Price};

use super::{ItemRepository, RepositoryError};
use crate::models::{Item, NewItem};

/// Column list shared by every query that returns items.
pub(super) const ITEM_COLUMNS: &str = "i.id, i.name, i.price, i.description";

/// Database row for an item.
#[derive(Debug, sqlx::FromRow)]
pub(super) struct ItemRow {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub description: String,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
        }
    }
}

/// Repository for catalog items.
#[derive(Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn find_all(&self) -> Result<Vec<Item>, RepositoryError> {
        let rows: Vec<ItemRow> =
            sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM item i ORDER BY i.id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row: Option<ItemRow> =
            sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM item i WHERE i.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Item::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Item>, RepositoryError> {
        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM item i WHERE i.name = $1 ORDER BY i.id"
        ))
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Item::from).collect())
    }

    async fn insert(&self, item: &NewItem) -> Result<Item, RepositoryError> {
        let row: ItemRow = sqlx::query_as(
            r"
            INSERT INTO item AS i (name, price, description)
            VALUES ($1, $2, $3)
            RETURNING i.id, i.name, i.price, i.description
            ",
        )
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
