//! Domain service for user accounts.
//!
//! Covers registration, role-gated updates, deletion, and the password
//! change flow. Every authorization-sensitive operation takes the caller's
//! resolved roles as an explicit argument; nothing reads ambient context.

use thiserror::Error;

use crate::entities::users;

/// Role token that unlocks full-field updates.
pub const ADMIN_ROLE: &str = "admin";

/// Whether a space-delimited roles string carries the administrative role.
#[must_use]
pub fn has_admin_role(roles: &str) -> bool {
    roles.split_whitespace().any(|role| role == ADMIN_ROLE)
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Could not find user With Id {0} :(")]
    NotFound(i32),

    #[error("{0}")]
    BadCredentials(String),

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Fields of a registration request.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub enabled: bool,
    pub roles: String,
}

/// Proposed changes to an existing user. Which fields actually apply
/// depends on the caller's roles.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub enabled: bool,
    pub roles: String,
}

/// Domain service trait for user accounts.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    async fn find_all(&self) -> Result<Vec<users::Model>, UserError>;

    async fn find_by_id(&self, user_id: i32) -> Result<users::Model, UserError>;

    /// Registers a user; the password is hashed before persistence.
    async fn create(&self, new_user: NewUser) -> Result<users::Model, UserError>;

    /// Role-gated update.
    ///
    /// Non-admin callers only change the username; `enabled` and `roles`
    /// in the proposed update are silently ignored. Admin callers apply
    /// all three fields, and the target user's whitelist entry is deleted
    /// so their current token stops being honored.
    async fn update(
        &self,
        user_id: i32,
        update: UserUpdate,
        caller_roles: &str,
    ) -> Result<users::Model, UserError>;

    /// Deletes a user and revokes their current token.
    async fn delete(&self, user_id: i32) -> Result<(), UserError>;

    /// Password change flow.
    ///
    /// # Errors
    ///
    /// [`UserError::NotFound`] if the user is missing,
    /// [`UserError::BadCredentials`] if the old password does not match,
    /// [`UserError::Validation`] on confirmation mismatch or policy failure.
    async fn change_password(
        &self,
        user_id: i32,
        old_password: &str,
        new_password: &str,
        confirm_new_password: &str,
    ) -> Result<(), UserError>;
}
