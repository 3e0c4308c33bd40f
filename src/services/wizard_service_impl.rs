//! `SeaORM` implementation of the `WizardService` trait.

use async_trait::async_trait;

use crate::db::Store;
use crate::services::wizard_service::{WizardError, WizardRecord, WizardService};

pub struct SeaOrmWizardService {
    store: Store,
}

impl SeaOrmWizardService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WizardService for SeaOrmWizardService {
    async fn find_all(&self) -> Result<Vec<WizardRecord>, WizardError> {
        let wizards = self.store.list_wizards().await?;

        let mut records = Vec::with_capacity(wizards.len());
        for wizard in wizards {
            let number_of_artifacts = self.store.wizard_artifact_count(wizard.id).await?;
            records.push(WizardRecord {
                wizard,
                number_of_artifacts,
            });
        }

        Ok(records)
    }

    async fn find_by_id(&self, wizard_id: i32) -> Result<WizardRecord, WizardError> {
        let wizard = self
            .store
            .get_wizard(wizard_id)
            .await?
            .ok_or(WizardError::WizardNotFound(wizard_id))?;
        let number_of_artifacts = self.store.wizard_artifact_count(wizard_id).await?;

        Ok(WizardRecord {
            wizard,
            number_of_artifacts,
        })
    }

    async fn add(&self, name: &str) -> Result<WizardRecord, WizardError> {
        let wizard = self.store.create_wizard(name).await?;

        Ok(WizardRecord {
            wizard,
            number_of_artifacts: 0,
        })
    }

    async fn update(&self, wizard_id: i32, name: &str) -> Result<WizardRecord, WizardError> {
        let wizard = self
            .store
            .get_wizard(wizard_id)
            .await?
            .ok_or(WizardError::WizardNotFound(wizard_id))?;

        let updated = self.store.update_wizard_name(wizard, name).await?;
        let number_of_artifacts = self.store.wizard_artifact_count(wizard_id).await?;

        Ok(WizardRecord {
            wizard: updated,
            number_of_artifacts,
        })
    }

    async fn delete(&self, wizard_id: i32) -> Result<(), WizardError> {
        self.store
            .get_wizard(wizard_id)
            .await?
            .ok_or(WizardError::WizardNotFound(wizard_id))?;

        self.store.delete_wizard(wizard_id).await?;

        Ok(())
    }

    async fn assign_artifact(
        &self,
        wizard_id: i32,
        artifact_id: &str,
    ) -> Result<(), WizardError> {
        // Artifact first: a missing wizard must not detach anything.
        let (artifact, _owner) = self
            .store
            .get_artifact(artifact_id)
            .await?
            .ok_or_else(|| WizardError::ArtifactNotFound(artifact_id.to_string()))?;

        self.store
            .get_wizard(wizard_id)
            .await?
            .ok_or(WizardError::WizardNotFound(wizard_id))?;

        self.store.set_artifact_owner(artifact, wizard_id).await?;

        Ok(())
    }
}
