//! Login, registration, role lookup, and token validation.
//!
//! Session state is implicit in token validity: the only server-side record is
//! the latest token pair per user, overwritten on every login.

use std::sync::Arc;

use chrono::Duration;
use uuid::Uuid;

use super::password::{compare_password, hash_password, PasswordError};
use super::token::{Claims, TokenCodec, TokenError, TokenKind, TokenSubject};
use crate::error::CoreError;
use crate::roles::{Role, UnknownRole};
use crate::storage::{StoreError, UserStore};
use crate::types::UserId;

/// Default access token lifetime in minutes.
pub const DEFAULT_ACCESS_TTL_MINS: i64 = 15;
/// Default refresh token lifetime in days.
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

/// Token lifetime policy.
#[derive(Debug, Clone, Copy)]
pub struct AuthConfig {
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_ttl: Duration::minutes(DEFAULT_ACCESS_TTL_MINS),
            refresh_ttl: Duration::days(DEFAULT_REFRESH_TTL_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,

    #[error("wrong login or password")]
    WrongCredentials,

    #[error("login {0} is already taken")]
    LoginTaken(String),

    #[error("token timeout")]
    TokenTimedOut,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<AuthError> for CoreError {
    fn from(err: AuthError) -> Self {
        match err {
            // Do not reveal which of login or password was wrong.
            AuthError::UserNotFound | AuthError::WrongCredentials => {
                CoreError::Unauthorized(AuthError::WrongCredentials.to_string())
            }
            AuthError::LoginTaken(login) => {
                CoreError::Conflict(format!("login {login} is already taken"))
            }
            AuthError::TokenTimedOut | AuthError::Token(TokenError::Expired) => {
                CoreError::TokenTimedOut
            }
            AuthError::Token(e) => CoreError::Unauthorized(e.to_string()),
            AuthError::UnknownRole(e) => CoreError::Internal(e.to_string()),
            AuthError::Internal(msg) => CoreError::Internal(msg),
        }
    }
}

/// Access and refresh token issued on login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Identity of a caller holding a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    pub id: UserId,
    pub login: String,
    pub role: Role,
    pub access_token: String,
}

/// Orchestrates credential checks and token lifecycle over a [`UserStore`].
pub struct AuthService {
    store: Arc<dyn UserStore>,
    codec: TokenCodec,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, codec: TokenCodec, config: AuthConfig) -> Self {
        Self {
            store,
            codec,
            config,
        }
    }

    /// Access token lifetime, in seconds.
    pub fn access_ttl_secs(&self) -> i64 {
        self.config.access_ttl.num_seconds()
    }

    /// Verify credentials and issue a fresh token pair.
    ///
    /// The pair is upserted for the user, invalidating any earlier refresh
    /// token.
    pub async fn login(&self, login: &str, password: &str) -> Result<TokenPair, AuthError> {
        tracing::debug!(login, "login attempt");

        let user = match self.store.user_by_login(login).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                tracing::info!(login, "login rejected: unknown user");
                return Err(AuthError::UserNotFound);
            }
            Err(e) => return Err(e.into()),
        };

        match compare_password(password, &user.password_hash) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                tracing::info!(login, "login rejected: wrong password");
                return Err(AuthError::WrongCredentials);
            }
            Err(PasswordError::Hashing(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "stored password hash is unusable");
                return Err(AuthError::Internal(e));
            }
        }

        let role = self.load_role(&user.id).await?;
        let subject = TokenSubject {
            id: &user.id,
            login: &user.login,
            role,
        };

        let access_token = self.issue(subject, TokenKind::Access, self.config.access_ttl)?;
        let refresh_token = self.issue(subject, TokenKind::Refresh, self.config.refresh_ttl)?;

        self.store
            .upsert_tokens(&user.id, &access_token, &refresh_token)
            .await?;

        tracing::info!(user_id = %user.id, role = %role, "user logged in");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Create a user with its role, returning the new user id.
    ///
    /// Role names outside the known set fall back to [`Role::LOWEST`].
    pub async fn register_user(
        &self,
        login: &str,
        password: &str,
        role: &str,
    ) -> Result<UserId, AuthError> {
        let password_hash = hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "failed to hash password");
            AuthError::Internal(e.to_string())
        })?;

        let role = Role::from_name(role).unwrap_or_else(|| {
            tracing::warn!(requested = role, "unknown role, assigning {}", Role::LOWEST);
            Role::LOWEST
        });

        let id = Uuid::new_v4().to_string();
        match self
            .store
            .create_user(&id, login, &password_hash, role.code())
            .await
        {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => return Err(AuthError::LoginTaken(login.to_string())),
            Err(e) => {
                tracing::error!(login, error = %e, "failed to save user");
                return Err(e.into());
            }
        }

        tracing::info!(user_id = %id, login, role = %role, "user registered");
        Ok(id)
    }

    /// The role assigned to a user.
    pub async fn get_role(&self, user_id: &str) -> Result<Role, AuthError> {
        self.load_role(user_id).await
    }

    /// Validate an access token and return the caller's identity.
    ///
    /// An expired token yields [`AuthError::TokenTimedOut`] so the caller can
    /// switch to the refresh flow. Refresh tokens are rejected.
    pub fn authorize(&self, access_token: &str) -> Result<AuthInfo, AuthError> {
        let claims = self
            .codec
            .verify_kind(access_token, TokenKind::Access)
            .map_err(|e| match e {
                TokenError::Expired => AuthError::TokenTimedOut,
                other => AuthError::Token(other),
            })?;

        let role =
            Role::try_from(claims.role).map_err(|_| AuthError::Token(TokenError::Malformed))?;

        Ok(AuthInfo {
            id: claims.id,
            login: claims.login,
            role,
            access_token: access_token.to_string(),
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Every verification failure is reported as [`AuthError::TokenTimedOut`]:
    /// callers cannot tell why a refresh token was refused. An access token is
    /// refused too. The stored refresh token is left unchanged.
    pub async fn access_by_refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self
            .codec
            .verify_kind(refresh_token, TokenKind::Refresh)
            .map_err(|e| {
                tracing::info!(error = %e, "refresh rejected");
                AuthError::TokenTimedOut
            })?;

        self.ensure_current_refresh(&claims, refresh_token).await?;

        let role = Role::try_from(claims.role).map_err(|_| AuthError::TokenTimedOut)?;
        let access_token = self.issue(
            TokenSubject {
                id: &claims.id,
                login: &claims.login,
                role,
            },
            TokenKind::Access,
            self.config.access_ttl,
        )?;

        self.store
            .update_access_token(&claims.id, &access_token)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %claims.id, error = %e, "failed to store access token");
                AuthError::from(e)
            })?;

        Ok(access_token)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn load_role(&self, user_id: &str) -> Result<Role, AuthError> {
        let code = match self.store.user_role(user_id).await {
            Ok(code) => code,
            Err(StoreError::NotFound) => return Err(AuthError::UserNotFound),
            Err(e) => return Err(e.into()),
        };
        Role::try_from(code).map_err(|e| {
            tracing::error!(user_id, code, "stored role is outside the known set");
            AuthError::from(e)
        })
    }

    /// A refresh token is only honored while it is the one stored for the user.
    async fn ensure_current_refresh(
        &self,
        claims: &Claims,
        presented: &str,
    ) -> Result<(), AuthError> {
        match self.store.refresh_token(&claims.id).await {
            Ok(stored) if stored == presented => Ok(()),
            Ok(_) | Err(StoreError::NotFound) => {
                tracing::info!(user_id = %claims.id, "refresh rejected: token superseded");
                Err(AuthError::TokenTimedOut)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn issue(
        &self,
        subject: TokenSubject<'_>,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        self.codec.issue(subject, kind, ttl).map_err(|e| {
            tracing::error!(error = %e, "failed to generate token");
            AuthError::Internal(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;
    use crate::storage::memory::MemoryStore;
    use crate::storage::User;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn service(store: Arc<MemoryStore>) -> AuthService {
        AuthService::new(store, TokenCodec::new(SECRET), AuthConfig::default())
    }

    async fn setup() -> (Arc<MemoryStore>, AuthService, UserId) {
        let store = Arc::new(MemoryStore::new());
        let auth = service(Arc::clone(&store));
        let id = auth
            .register_user("bob", "hunter22", "warehouse worker")
            .await
            .unwrap();
        (store, auth, id)
    }

    #[tokio::test]
    async fn login_issues_and_persists_token_pair() {
        let (store, auth, id) = setup().await;

        let pair = auth.login("bob", "hunter22").await.unwrap();
        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(
            store.token_pair(&id),
            Some((pair.access_token.clone(), pair.refresh_token.clone()))
        );

        let info = auth.authorize(&pair.access_token).unwrap();
        assert_eq!(info.id, id);
        assert_eq!(info.login, "bob");
        assert_eq!(info.role, Role::WarehouseWorker);
        assert_eq!(info.access_token, pair.access_token);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_login_look_the_same() {
        let (_store, auth, _id) = setup().await;

        let wrong = auth.login("bob", "wrongpass").await.unwrap_err();
        let ghost = auth.login("ghost", "x").await.unwrap_err();
        assert_eq!(wrong, AuthError::WrongCredentials);
        assert_eq!(ghost, AuthError::UserNotFound);

        assert_eq!(
            CoreError::from(wrong).to_string(),
            CoreError::from(ghost).to_string()
        );
    }

    #[tokio::test]
    async fn unknown_role_falls_back_to_product_worker() {
        let store = Arc::new(MemoryStore::new());
        let auth = service(store);

        let id = auth.register_user("eve", "pw", "overlord").await.unwrap();
        assert_eq!(auth.get_role(&id).await.unwrap(), Role::ProductWorker);
    }

    #[tokio::test]
    async fn duplicate_login_is_reported() {
        let (_store, auth, _id) = setup().await;
        assert_matches!(
            auth.register_user("bob", "other", "admin").await,
            Err(AuthError::LoginTaken(login)) if login == "bob"
        );
    }

    #[tokio::test]
    async fn get_role_rejects_values_outside_the_set() {
        let (store, auth, id) = setup().await;
        store.set_user_role(&id, 9).await.unwrap();

        assert_matches!(auth.get_role(&id).await, Err(AuthError::UnknownRole(UnknownRole(9))));
        assert_matches!(auth.get_role("missing").await, Err(AuthError::UserNotFound));
    }

    #[tokio::test]
    async fn expired_access_token_times_out() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthService::new(
            store,
            TokenCodec::new(SECRET),
            AuthConfig {
                access_ttl: Duration::minutes(-5),
                refresh_ttl: Duration::days(1),
            },
        );
        auth.register_user("bob", "pw", "admin").await.unwrap();
        let pair = auth.login("bob", "pw").await.unwrap();

        assert_matches!(auth.authorize(&pair.access_token), Err(AuthError::TokenTimedOut));
    }

    #[tokio::test]
    async fn tampered_access_token_reports_the_codec_error() {
        let (_store, auth, _id) = setup().await;
        let forged = TokenCodec::new("other-secret")
            .issue(
                TokenSubject {
                    id: "x",
                    login: "mallory",
                    role: Role::Admin,
                },
                TokenKind::Access,
                Duration::minutes(5),
            )
            .unwrap();

        assert_matches!(
            auth.authorize(&forged),
            Err(AuthError::Token(TokenError::InvalidSignature))
        );
    }

    #[tokio::test]
    async fn tokens_only_work_for_their_own_flow() {
        let (_store, auth, _id) = setup().await;
        let pair = auth.login("bob", "hunter22").await.unwrap();

        assert_matches!(
            auth.authorize(&pair.refresh_token),
            Err(AuthError::Token(TokenError::WrongKind))
        );
        assert_eq!(
            auth.access_by_refresh(&pair.access_token).await,
            Err(AuthError::TokenTimedOut)
        );
    }

    #[tokio::test]
    async fn refresh_rotates_access_only() {
        let (store, auth, id) = setup().await;
        let pair = auth.login("bob", "hunter22").await.unwrap();

        let access = auth.access_by_refresh(&pair.refresh_token).await.unwrap();
        let info = auth.authorize(&access).unwrap();
        assert_eq!(info.id, id);
        assert_eq!(info.role, Role::WarehouseWorker);

        let (stored_access, stored_refresh) = store.token_pair(&id).unwrap();
        assert_eq!(stored_access, access);
        assert_eq!(stored_refresh, pair.refresh_token);
    }

    #[tokio::test]
    async fn refresh_failures_are_indistinguishable() {
        let (_store, auth, _id) = setup().await;
        let first = auth.login("bob", "hunter22").await.unwrap();
        // Sleep past the one-second claim granularity so the second pair differs.
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
        let _second = auth.login("bob", "hunter22").await.unwrap();

        assert_eq!(
            auth.access_by_refresh(&first.refresh_token).await,
            Err(AuthError::TokenTimedOut)
        );
        assert_eq!(
            auth.access_by_refresh("garbage").await,
            Err(AuthError::TokenTimedOut)
        );
    }

    /// Delegates to a [`MemoryStore`] but refuses every separate role write.
    struct NoRoleWrites(MemoryStore);

    #[async_trait]
    impl UserStore for NoRoleWrites {
        async fn user_by_login(&self, login: &str) -> Result<User, StoreError> {
            self.0.user_by_login(login).await
        }
        async fn create_user(
            &self,
            id: &str,
            login: &str,
            password_hash: &str,
            role: i16,
        ) -> Result<(), StoreError> {
            self.0.create_user(id, login, password_hash, role).await
        }
        async fn set_user_role(&self, _: &str, _: i16) -> Result<(), StoreError> {
            Err(StoreError::Backend("connection reset".into()))
        }
        async fn user_role(&self, user_id: &str) -> Result<i16, StoreError> {
            self.0.user_role(user_id).await
        }
        async fn upsert_tokens(
            &self,
            id: &str,
            access: &str,
            refresh: &str,
        ) -> Result<(), StoreError> {
            self.0.upsert_tokens(id, access, refresh).await
        }
        async fn update_access_token(&self, id: &str, access: &str) -> Result<(), StoreError> {
            self.0.update_access_token(id, access).await
        }
        async fn refresh_token(&self, id: &str) -> Result<String, StoreError> {
            self.0.refresh_token(id).await
        }
    }

    #[tokio::test]
    async fn registered_user_can_log_in_without_a_separate_role_write() {
        let auth = AuthService::new(
            Arc::new(NoRoleWrites(MemoryStore::new())),
            TokenCodec::new(SECRET),
            AuthConfig::default(),
        );

        let id = auth.register_user("nina", "pw", "admin").await.unwrap();
        assert_eq!(auth.get_role(&id).await.unwrap(), Role::Admin);
        assert_matches!(auth.login("nina", "pw").await, Ok(_));
    }
}
