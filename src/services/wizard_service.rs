//! Domain service for wizards and artifact ownership.

use thiserror::Error;

use crate::entities::wizards;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Could not find wizard With Id {0} :(")]
    WizardNotFound(i32),

    #[error("Could not find artifact With Id {0} :(")]
    ArtifactNotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for WizardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// A wizard with the derived count of artifacts they own.
#[derive(Debug, Clone)]
pub struct WizardRecord {
    pub wizard: wizards::Model,
    pub number_of_artifacts: u64,
}

/// Domain service trait for wizards.
#[async_trait::async_trait]
pub trait WizardService: Send + Sync {
    async fn find_all(&self) -> Result<Vec<WizardRecord>, WizardError>;

    async fn find_by_id(&self, wizard_id: i32) -> Result<WizardRecord, WizardError>;

    async fn add(&self, name: &str) -> Result<WizardRecord, WizardError>;

    async fn update(&self, wizard_id: i32, name: &str) -> Result<WizardRecord, WizardError>;

    /// Deletes a wizard. Owned artifacts are detached, not deleted.
    async fn delete(&self, wizard_id: i32) -> Result<(), WizardError>;

    /// Ownership transfer.
    ///
    /// The artifact is resolved before the wizard, so an unknown wizard id
    /// fails without touching the artifact's existing owner. Reassigning an
    /// artifact already owned by the target wizard succeeds and changes
    /// nothing observable.
    async fn assign_artifact(&self, wizard_id: i32, artifact_id: &str)
    -> Result<(), WizardError>;
}
