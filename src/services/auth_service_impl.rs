//! JWT + whitelist implementation of the `AuthService` trait.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;

use crate::clients::revocation::RevocationCache;
use crate::db::Store;
use crate::services::auth_service::{AuthError, AuthService, LoginOutcome, TokenClaims};

pub struct JwtAuthService {
    store: Store,
    revocation: Arc<dyn RevocationCache>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl JwtAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        revocation: Arc<dyn RevocationCache>,
        secret: &str,
        token_ttl: Duration,
    ) -> Self {
        Self {
            store,
            revocation,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    fn create_token(&self, claims: &TokenClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }
}

#[async_trait]
impl AuthService for JwtAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let Some(user) = self.store.get_user_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let is_valid = self.store.verify_user_password(&user, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.enabled {
            return Err(AuthError::AccountDisabled);
        }

        let now = chrono::Utc::now().timestamp();
        let ttl = i64::try_from(self.token_ttl.as_secs())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let claims = TokenClaims {
            sub: user.username.clone(),
            user_id: user.id,
            authorities: user.roles.clone(),
            iat: now,
            exp: now + ttl,
        };

        let token = self.create_token(&claims)?;

        // Whitelist the fresh token for the token lifetime. Failure here is
        // logged rather than propagated; the login already succeeded and
        // the worst case is a token that is rejected on first use.
        if let Err(e) = self
            .revocation
            .record(user.id, &token, self.token_ttl)
            .await
        {
            warn!("Failed to whitelist token for user {}: {e}", user.id);
        }

        Ok(LoginOutcome { user, token })
    }

    async fn authorize(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;

        let claims = data.claims;

        // A cryptographically valid token is still rejected when its
        // whitelist entry is gone or holds a different (newer) token.
        let whitelisted = self.revocation.is_valid(claims.user_id, token).await?;
        if !whitelisted {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}
