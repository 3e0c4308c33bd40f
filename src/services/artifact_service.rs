//! Domain service for artifacts.

use thiserror::Error;

use crate::db::ArtifactWithOwner;
use crate::entities::artifacts;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Could not find artifact With Id {0} :(")]
    NotFound(String),

    #[error("Chat service error: {0}")]
    ChatService(String),

    #[error("Storage service error: {0}")]
    StorageService(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for ArtifactError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Fields of a create or update request; the id is assigned server-side.
#[derive(Debug, Clone)]
pub struct ArtifactInput {
    pub name: String,
    pub description: String,
    pub image_url: String,
}

/// Search criteria, partial match, AND semantics.
#[derive(Debug, Clone, Default)]
pub struct ArtifactCriteria {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Domain service trait for artifacts.
#[async_trait::async_trait]
pub trait ArtifactService: Send + Sync {
    async fn find_by_id(&self, artifact_id: &str) -> Result<ArtifactWithOwner, ArtifactError>;

    /// One page of artifacts plus the total page count.
    async fn find_all(
        &self,
        page: u64,
        size: u64,
    ) -> Result<(Vec<ArtifactWithOwner>, u64), ArtifactError>;

    /// Creates an artifact under a freshly generated snowflake id.
    async fn save(&self, input: ArtifactInput) -> Result<artifacts::Model, ArtifactError>;

    async fn update(
        &self,
        artifact_id: &str,
        input: ArtifactInput,
    ) -> Result<ArtifactWithOwner, ArtifactError>;

    async fn delete(&self, artifact_id: &str) -> Result<(), ArtifactError>;

    async fn find_by_criteria(
        &self,
        criteria: ArtifactCriteria,
        page: u64,
        size: u64,
    ) -> Result<(Vec<ArtifactWithOwner>, u64), ArtifactError>;

    /// Summarizes the whole catalog via the external chat-completion
    /// service. Stateless pass-through; failures propagate unmodified.
    async fn summarize(&self) -> Result<String, ArtifactError>;

    /// Uploads an image to blob storage and returns its public URL.
    async fn upload_image(
        &self,
        container: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<String, ArtifactError>;
}
