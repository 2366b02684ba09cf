//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkeep_core::{UserId, Username};

/// A registered user (domain type).
///
/// The password hash is deliberately not part of this type; it is only
/// read by the authentication service through
/// [`UserRepository::get_password_hash`](crate::db::UserRepository::get_password_hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: Username,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
