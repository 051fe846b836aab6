//! User entity model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use stockroom_core::storage::User;

/// Full user row from the `users` table.
///
/// Contains the password hash -- never serialize this to API responses.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub login: String,
    pub password_hash: String,
    pub role: Option<i16>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            login: row.login,
            password_hash: row.password_hash,
        }
    }
}
