//! Authentication primitives and the auth service.
//!
//! - [`token`] -- HS256 token issuance and verification.
//! - [`password`] -- Argon2id password hashing and comparison.
//! - [`service`] -- login, registration, role lookup, authorize, refresh.

pub mod password;
pub mod service;
pub mod token;

pub use service::{AuthConfig, AuthError, AuthInfo, AuthService, TokenPair};
pub use token::{Claims, TokenCodec, TokenError, TokenKind, TokenSubject};
