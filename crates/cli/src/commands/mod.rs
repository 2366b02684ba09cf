//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Primary database URL variable; `DATABASE_URL` is the fallback.
pub const DATABASE_URL_VAR: &str = "SHOPKEEP_DATABASE_URL";

/// Load `.env` and read the database URL.
///
/// Returns `None` when neither variable is set.
pub fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}
