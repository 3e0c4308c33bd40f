//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::clients::revocation::RevocationCache;
use crate::db::Store;
use crate::entities::users;
use crate::services::password;
use crate::services::user_service::{NewUser, UserError, UserService, UserUpdate, has_admin_role};

pub struct SeaOrmUserService {
    store: Store,
    revocation: Arc<dyn RevocationCache>,
}

impl SeaOrmUserService {
    #[must_use]
    pub fn new(store: Store, revocation: Arc<dyn RevocationCache>) -> Self {
        Self { store, revocation }
    }

    /// Revocation is best-effort: the record update has already committed,
    /// and a stale whitelist entry self-heals when its TTL expires.
    async fn revoke_token(&self, user_id: i32) {
        if let Err(e) = self.revocation.invalidate(user_id).await {
            warn!("Failed to revoke token for user {user_id}: {e}");
        }
    }
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn find_all(&self) -> Result<Vec<users::Model>, UserError> {
        Ok(self.store.list_users().await?)
    }

    async fn find_by_id(&self, user_id: i32) -> Result<users::Model, UserError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    async fn create(&self, new_user: NewUser) -> Result<users::Model, UserError> {
        let user = self
            .store
            .create_user(
                &new_user.username,
                &new_user.password,
                new_user.enabled,
                &new_user.roles,
            )
            .await?;

        Ok(user)
    }

    async fn update(
        &self,
        user_id: i32,
        update: UserUpdate,
        caller_roles: &str,
    ) -> Result<users::Model, UserError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let is_admin = has_admin_role(caller_roles);

        // Non-admin callers can only change their username; enabled and
        // roles in the proposed update are dropped without error.
        let (enabled, roles) = if is_admin {
            (Some(update.enabled), Some(update.roles.as_str()))
        } else {
            (None, None)
        };

        let updated = self
            .store
            .update_user_fields(user, &update.username, enabled, roles)
            .await?;

        if is_admin {
            // Role-affecting fields changed; stop honoring the target's
            // current token.
            self.revoke_token(user_id).await;
        }

        Ok(updated)
    }

    async fn delete(&self, user_id: i32) -> Result<(), UserError> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        self.store.delete_user(user_id).await?;
        self.revoke_token(user_id).await;

        Ok(())
    }

    async fn change_password(
        &self,
        user_id: i32,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> Result<(), UserError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        let old_matches = self.store.verify_user_password(&user, old_password).await?;
        if !old_matches {
            return Err(UserError::BadCredentials(
                "Old password is incorrect".to_string(),
            ));
        }

        if new_password != confirm_new_password {
            return Err(UserError::Validation(
                "New password and confirm new password do not match.".to_string(),
            ));
        }

        if !password::satisfies_policy(new_password) {
            return Err(UserError::Validation(
                "New password does not conform to password policy.".to_string(),
            ));
        }

        self.store.update_user_password(user, new_password).await?;

        // Force re-authentication with the new credential.
        self.revoke_token(user_id).await;

        Ok(())
    }
}
