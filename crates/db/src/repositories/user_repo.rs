//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::UserRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, login, password_hash, role, created_at";

/// Provides user creation, lookup, and role assignment.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user with its role code.
    pub async fn create(
        pool: &PgPool,
        id: &str,
        login: &str,
        password_hash: &str,
        role: i16,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO users (id, login, password_hash, role) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(login)
            .bind(password_hash)
            .bind(role)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Find a user by login (case-sensitive).
    pub async fn find_by_login(
        pool: &PgPool,
        login: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE login = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(login)
            .fetch_optional(pool)
            .await
    }

    /// Set the role code. Returns `true` if the user exists.
    pub async fn set_role(pool: &PgPool, id: &str, role: i16) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
            .bind(id)
            .bind(role)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The role code of a user; `None` if the user is missing or has no role.
    pub async fn role(pool: &PgPool, id: &str) -> Result<Option<i16>, sqlx::Error> {
        let role = sqlx::query_scalar::<_, Option<i16>>("SELECT role FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(role.flatten())
    }
}
