use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::artifact::ArtifactWithOwner;

use crate::entities::{artifacts, users, wizards};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        // Every pooled connection to an in-memory SQLite gets its own
        // database, so those run on a single persistent connection.
        let (max_connections, min_connections) = if db_url.contains(":memory:") {
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn wizard_repo(&self) -> repositories::wizard::WizardRepository {
        repositories::wizard::WizardRepository::new(self.conn.clone())
    }

    fn artifact_repo(&self) -> repositories::artifact::ArtifactRepository {
        repositories::artifact::ArtifactRepository::new(self.conn.clone())
    }

    // ========== Users ==========

    pub async fn list_users(&self) -> Result<Vec<users::Model>> {
        self.user_repo().list_all().await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<users::Model>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<users::Model>> {
        self.user_repo().get_by_username(username).await
    }

    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        enabled: bool,
        roles: &str,
    ) -> Result<users::Model> {
        self.user_repo()
            .create(username, password, enabled, roles)
            .await
    }

    pub async fn update_user_fields(
        &self,
        user: users::Model,
        username: &str,
        enabled: Option<bool>,
        roles: Option<&str>,
    ) -> Result<users::Model> {
        self.user_repo()
            .update_fields(user, username, enabled, roles)
            .await
    }

    pub async fn delete_user(&self, id: i32) -> Result<()> {
        self.user_repo().delete(id).await
    }

    pub async fn verify_user_password(&self, user: &users::Model, password: &str) -> Result<bool> {
        self.user_repo().verify_password(user, password).await
    }

    pub async fn update_user_password(
        &self,
        user: users::Model,
        new_password: &str,
    ) -> Result<()> {
        self.user_repo().update_password(user, new_password).await
    }

    // ========== Wizards ==========

    pub async fn list_wizards(&self) -> Result<Vec<wizards::Model>> {
        self.wizard_repo().list_all().await
    }

    pub async fn get_wizard(&self, id: i32) -> Result<Option<wizards::Model>> {
        self.wizard_repo().get_by_id(id).await
    }

    pub async fn create_wizard(&self, name: &str) -> Result<wizards::Model> {
        self.wizard_repo().create(name).await
    }

    pub async fn update_wizard_name(
        &self,
        wizard: wizards::Model,
        name: &str,
    ) -> Result<wizards::Model> {
        self.wizard_repo().update_name(wizard, name).await
    }

    pub async fn delete_wizard(&self, id: i32) -> Result<()> {
        self.wizard_repo().delete(id).await
    }

    pub async fn wizard_artifact_count(&self, id: i32) -> Result<u64> {
        self.wizard_repo().artifact_count(id).await
    }

    pub async fn wizard_artifacts(&self, id: i32) -> Result<Vec<artifacts::Model>> {
        self.wizard_repo().owned_artifacts(id).await
    }

    // ========== Artifacts ==========

    pub async fn get_artifact(&self, id: &str) -> Result<Option<ArtifactWithOwner>> {
        self.artifact_repo().get(id).await
    }

    pub async fn list_artifacts(&self) -> Result<Vec<ArtifactWithOwner>> {
        self.artifact_repo().list_all().await
    }

    pub async fn list_artifacts_page(
        &self,
        page: u64,
        size: u64,
    ) -> Result<(Vec<ArtifactWithOwner>, u64)> {
        self.artifact_repo().list_page(page, size).await
    }

    pub async fn search_artifacts(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        page: u64,
        size: u64,
    ) -> Result<(Vec<ArtifactWithOwner>, u64)> {
        self.artifact_repo()
            .search(name, description, page, size)
            .await
    }

    pub async fn create_artifact(
        &self,
        id: &str,
        name: &str,
        description: &str,
        image_url: &str,
    ) -> Result<artifacts::Model> {
        self.artifact_repo()
            .create(id, name, description, image_url)
            .await
    }

    pub async fn update_artifact_fields(
        &self,
        artifact: artifacts::Model,
        name: &str,
        description: &str,
        image_url: &str,
    ) -> Result<artifacts::Model> {
        self.artifact_repo()
            .update_fields(artifact, name, description, image_url)
            .await
    }

    pub async fn delete_artifact(&self, id: &str) -> Result<()> {
        self.artifact_repo().delete(id).await
    }

    pub async fn set_artifact_owner(&self, artifact: artifacts::Model, owner_id: i32) -> Result<()> {
        self.artifact_repo().set_owner(artifact, owner_id).await
    }
}
