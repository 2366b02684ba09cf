//! Seed the item catalog from a YAML file.
//!
//! # Usage
//!
//! ```bash
//! shopkeep-cli seed items --file crates/api/seed/items.yaml
//! ```
//!
//! The file is a list of items:
//!
//! ```yaml
//! - name: Round Widget
//!   price: "2.99"
//!   description: A widget that is round
//! ```
//!
//! Items whose name already exists in the catalog are skipped, so the
//! command can be re-run safely.

use std::path::Path;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info};

use shopkeep_api::db::{self, ItemRepository, PgItemRepository, RepositoryError};
use shopkeep_api::models::NewItem;

use super::{DATABASE_URL_VAR, database_url};

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Outcome of a seeding run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parse a YAML item list.
///
/// # Errors
///
/// Returns `SeedError::Yaml` if the document is not a list of items.
pub fn parse_items(content: &str) -> Result<Vec<NewItem>, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Decimal places the `item.price` column keeps.
const PRICE_SCALE: u32 = 2;

/// Integer digits the `item.price` column keeps (`NUMERIC(12, 2)`).
const PRICE_INTEGER_DIGITS: u32 = 10;

/// Check every item, returning one message per problem.
///
/// Prices must fit `item.price` exactly; Postgres would otherwise round
/// extra decimals or fail partway through the insert.
#[must_use]
pub fn validate_items(items: &[NewItem]) -> Vec<String> {
    let mut errors = Vec::new();
    let price_limit = Decimal::from(10_i64.pow(PRICE_INTEGER_DIGITS));

    for (index, item) in items.iter().enumerate() {
        if item.name.trim().is_empty() {
            errors.push(format!("item {index}: name is empty"));
        }
        if item.price.is_negative() {
            errors.push(format!("item {index} ({}): price is negative", item.name));
        }
        let amount = item.price.amount();
        if amount.normalize().scale() > PRICE_SCALE {
            errors.push(format!(
                "item {index} ({}): price {amount} has more than {PRICE_SCALE} decimal places",
                item.name
            ));
        }
        if amount >= price_limit {
            errors.push(format!(
                "item {index} ({}): price {amount} must be below {price_limit}",
                item.name
            ));
        }
        if items.iter().take(index).any(|other| other.name == item.name) {
            errors.push(format!("item {index} ({}): duplicate name", item.name));
        }
    }

    errors
}

/// Insert items whose name is not in the catalog yet.
///
/// # Errors
///
/// Returns `SeedError::Repository` on the first failed query.
pub async fn insert_missing(
    repo: &dyn ItemRepository,
    new_items: &[NewItem],
) -> Result<SeedSummary, SeedError> {
    let mut summary = SeedSummary::default();

    for item in new_items {
        if repo.find_by_name(&item.name).await?.is_empty() {
            let stored = repo.insert(item).await?;
            info!(id = %stored.id, name = %stored.name, price = %stored.price, "Inserted item");
            summary.inserted += 1;
        } else {
            info!(name = %item.name, "Item already exists, skipping");
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

/// Seed catalog items from a YAML file.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be
/// read or validated, or a database operation fails.
pub async fn items(file_path: &Path) -> Result<SeedSummary, SeedError> {
    let database_url = database_url().ok_or(SeedError::MissingEnvVar(DATABASE_URL_VAR))?;

    info!(path = %file_path.display(), "Loading items from file");

    // Read and validate before connecting to the database
    let content = tokio::fs::read_to_string(file_path)
        .await
        .map_err(|source| SeedError::Read {
            path: file_path.display().to_string(),
            source,
        })?;
    let new_items = parse_items(&content)?;

    let errors = validate_items(&new_items);
    if !errors.is_empty() {
        error!("Item validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }
    info!(items = new_items.len(), "Parsed and validated items");

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let summary = insert_missing(&PgItemRepository::new(pool), &new_items).await?;

    info!("Seeding complete!");
    info!("  Items inserted: {}", summary.inserted);
    info!("  Items skipped (already exist): {}", summary.skipped);

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopkeep_api::db::MemoryStore;
    use shopkeep_core::Price;

    use super::*;

    const SEED: &str = r#"
- name: Round Widget
  price: "2.99"
  description: A widget that is round
- name: Square Widget
  price: "1.99"
  description: A widget that is square
"#;

    #[test]
    fn test_parse_items() {
        let items = parse_items(SEED).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Round Widget");
        assert_eq!(items[0].price, Price::new(Decimal::new(299, 2)));
        assert_eq!(items[1].description, "A widget that is square");
    }

    #[test]
    fn test_parse_items_description_optional() {
        let items = parse_items("- name: Bare\n  price: \"1.00\"\n").unwrap();
        assert_eq!(items[0].description, "");
    }

    #[test]
    fn test_parse_items_rejects_bad_price() {
        assert!(parse_items("- name: Bad\n  price: \"cheap\"\n").is_err());
    }

    #[test]
    fn test_validate_items() {
        let mut items = parse_items(SEED).unwrap();
        assert!(validate_items(&items).is_empty());

        items.push(NewItem {
            name: "Round Widget".to_string(),
            price: Price::new(Decimal::new(-1, 0)),
            description: String::new(),
        });
        items.push(NewItem {
            name: "  ".to_string(),
            price: Price::ZERO,
            description: String::new(),
        });

        let errors = validate_items(&items);
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("duplicate name")));
        assert!(errors.iter().any(|e| e.contains("price is negative")));
        assert!(errors.iter().any(|e| e.contains("name is empty")));
    }

    #[test]
    fn test_validate_items_price_must_fit_column() {
        let item = |name: &str, price: &str| NewItem {
            name: name.to_string(),
            price: Price::new(price.parse().unwrap()),
            description: String::new(),
        };

        let errors = validate_items(&[
            item("Fine", "9999999999.99"),
            item("Trailing zero", "2.990"),
            item("Too precise", "1.999"),
            item("Too large", "10000000000"),
        ]);

        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("Too precise") && e.contains("decimal places")));
        assert!(errors.iter().any(|e| e.contains("Too large") && e.contains("must be below")));
    }

    #[tokio::test]
    async fn test_insert_missing_is_idempotent() {
        let store = MemoryStore::new();
        let items = parse_items(SEED).unwrap();

        let first = insert_missing(&store, &items).await.unwrap();
        assert_eq!(
            first,
            SeedSummary {
                inserted: 2,
                skipped: 0
            }
        );

        let second = insert_missing(&store, &items).await.unwrap();
        assert_eq!(
            second,
            SeedSummary {
                inserted: 0,
                skipped: 2
            }
        );
        assert_eq!(store.find_all().await.unwrap().len(), 2);
    }
}
