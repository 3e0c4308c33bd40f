use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::entities::users;

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<users::Model>> {
        users::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<users::Model>> {
        users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")
    }

    /// Create a user, hashing the plaintext password before persistence.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        enabled: bool,
        roles: &str,
    ) -> Result<users::Model> {
        let password = password.to_string();
        let password_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let active = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            enabled: Set(enabled),
            roles: Set(roles.to_string()),
            ..Default::default()
        };

        active.insert(&self.conn).await.context("Failed to insert user")
    }

    /// Apply a field update to an existing user.
    ///
    /// `enabled` and `roles` are only written when provided; the caller is
    /// responsible for deciding which fields the authorization policy allows.
    pub async fn update_fields(
        &self,
        user: users::Model,
        username: &str,
        enabled: Option<bool>,
        roles: Option<&str>,
    ) -> Result<users::Model> {
        let mut active: users::ActiveModel = user.into();
        active.username = Set(username.to_string());
        if let Some(enabled) = enabled {
            active.enabled = Set(enabled);
        }
        if let Some(roles) = roles {
            active.roles = Set(roles.to_string());
        }

        active.update(&self.conn).await.context("Failed to update user")
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        users::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;
        Ok(())
    }

    /// Verify a plaintext password against the stored hash for a user.
    /// Argon2 verification is CPU-intensive, so it runs in a blocking task.
    pub async fn verify_password(&self, user: &users::Model, password: &str) -> Result<bool> {
        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            let argon2 = Argon2::default();
            Ok::<bool, anyhow::Error>(
                argon2
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }

    /// Store the hash of a new password for a user.
    pub async fn update_password(&self, user: users::Model, new_password: &str) -> Result<()> {
        let password = new_password.to_string();
        let new_hash = task::spawn_blocking(move || hash_password(&password))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.update(&self.conn).await?;

        Ok(())
    }
}

/// Hash a password using Argon2id with default params.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
