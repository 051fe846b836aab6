//! Repository for the `user_tokens` table (latest token pair per user).

use sqlx::PgPool;

/// Provides upsert and lookup of per-user token pairs.
pub struct TokenRepo;

impl TokenRepo {
    /// Create the user's token pair, or overwrite it if one exists.
    pub async fn upsert(
        pool: &PgPool,
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO user_tokens (user_id, access_token, refresh_token)
             VALUES ($1, $2, $3)
             ON CONFLICT (user_id) DO UPDATE SET
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                updated_at = NOW()",
        )
        .bind(user_id)
        .bind(access_token)
        .bind(refresh_token)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Overwrite the access token. Returns `true` if the user has a pair.
    pub async fn update_access(
        pool: &PgPool,
        user_id: &str,
        access_token: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_tokens SET access_token = $2, updated_at = NOW() WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(access_token)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The stored refresh token, or `None` if the user never logged in.
    pub async fn refresh_token(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT refresh_token FROM user_tokens WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
