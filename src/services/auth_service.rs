//! Domain service for authentication and token issue.
//!
//! Login verifies credentials, issues a signed JWT carrying identity and
//! role claims, and records the token in the revocation whitelist with a
//! TTL equal to the token lifetime. Authorization verifies the signature
//! and then requires the whitelist entry to match, so revoked tokens are
//! rejected even while cryptographically valid.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entities::users;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Claims embedded in every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Username.
    pub sub: String,
    /// Whitelist key component.
    pub user_id: i32,
    /// Space-delimited roles, e.g. "admin user".
    pub authorities: String,
    pub iat: i64,
    pub exp: i64,
}

/// Successful login: the authenticated user plus their fresh token.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: users::Model,
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials, issues a token, and whitelists it.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for unknown users or wrong
    /// passwords, [`AuthError::AccountDisabled`] for disabled accounts.
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError>;

    /// Verifies a bearer token: signature, expiry, and whitelist match.
    async fn authorize(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
