//! `SeaORM` implementation of the `ArtifactService` trait.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::clients::chat::{ChatClient, ChatMessage, ChatRequest};
use crate::clients::storage::StorageClient;
use crate::db::{ArtifactWithOwner, Store};
use crate::entities::artifacts;
use crate::services::artifact_service::{
    ArtifactCriteria, ArtifactError, ArtifactInput, ArtifactService,
};
use crate::services::id_worker::IdWorker;

const SUMMARY_INSTRUCTION: &str = "Your task is to generate a short summary of a given JSON array in at most 100 words. The summary must include the number of artifacts, each artifact's description, and the ownership information. Don't mention that the summary is from a given JSON array.";

pub struct SeaOrmArtifactService {
    store: Store,
    id_worker: Arc<IdWorker>,
    chat: ChatClient,
    storage: StorageClient,
    chat_model: String,
}

impl SeaOrmArtifactService {
    #[must_use]
    pub fn new(
        store: Store,
        id_worker: Arc<IdWorker>,
        chat: ChatClient,
        storage: StorageClient,
        chat_model: String,
    ) -> Self {
        Self {
            store,
            id_worker,
            chat,
            storage,
            chat_model,
        }
    }
}

#[async_trait]
impl ArtifactService for SeaOrmArtifactService {
    async fn find_by_id(&self, artifact_id: &str) -> Result<ArtifactWithOwner, ArtifactError> {
        self.store
            .get_artifact(artifact_id)
            .await?
            .ok_or_else(|| ArtifactError::NotFound(artifact_id.to_string()))
    }

    async fn find_all(
        &self,
        page: u64,
        size: u64,
    ) -> Result<(Vec<ArtifactWithOwner>, u64), ArtifactError> {
        Ok(self.store.list_artifacts_page(page, size).await?)
    }

    async fn save(&self, input: ArtifactInput) -> Result<artifacts::Model, ArtifactError> {
        let id = self.id_worker.next_id();
        let artifact = self
            .store
            .create_artifact(&id, &input.name, &input.description, &input.image_url)
            .await?;

        Ok(artifact)
    }

    async fn update(
        &self,
        artifact_id: &str,
        input: ArtifactInput,
    ) -> Result<ArtifactWithOwner, ArtifactError> {
        let (artifact, owner) = self
            .store
            .get_artifact(artifact_id)
            .await?
            .ok_or_else(|| ArtifactError::NotFound(artifact_id.to_string()))?;

        let updated = self
            .store
            .update_artifact_fields(artifact, &input.name, &input.description, &input.image_url)
            .await?;

        Ok((updated, owner))
    }

    async fn delete(&self, artifact_id: &str) -> Result<(), ArtifactError> {
        self.store
            .get_artifact(artifact_id)
            .await?
            .ok_or_else(|| ArtifactError::NotFound(artifact_id.to_string()))?;

        self.store.delete_artifact(artifact_id).await?;

        Ok(())
    }

    async fn find_by_criteria(
        &self,
        criteria: ArtifactCriteria,
        page: u64,
        size: u64,
    ) -> Result<(Vec<ArtifactWithOwner>, u64), ArtifactError> {
        Ok(self
            .store
            .search_artifacts(
                criteria.name.as_deref(),
                criteria.description.as_deref(),
                page,
                size,
            )
            .await?)
    }

    async fn summarize(&self) -> Result<String, ArtifactError> {
        let artifacts = self.store.list_artifacts().await?;

        // Ownership counts derived from the fetched set itself; the summary
        // payload mirrors what clients see on the wire.
        let mut counts: HashMap<i32, u64> = HashMap::new();
        for (_, owner) in &artifacts {
            if let Some(owner) = owner {
                *counts.entry(owner.id).or_insert(0) += 1;
            }
        }

        let payload: Vec<serde_json::Value> = artifacts
            .iter()
            .map(|(artifact, owner)| {
                json!({
                    "id": artifact.id,
                    "name": artifact.name,
                    "description": artifact.description,
                    "imageUrl": artifact.image_url,
                    "owner": owner.as_ref().map(|o| {
                        json!({
                            "id": o.id,
                            "name": o.name,
                            "numberOfArtifacts": counts.get(&o.id).copied().unwrap_or(0),
                        })
                    }),
                })
            })
            .collect();

        let json_array = serde_json::to_string(&payload)
            .map_err(|e| ArtifactError::Internal(e.to_string()))?;

        let request = ChatRequest {
            model: self.chat_model.clone(),
            messages: vec![
                ChatMessage::new("system", SUMMARY_INSTRUCTION),
                ChatMessage::new("user", json_array),
            ],
        };

        let response = self
            .chat
            .generate(&request)
            .await
            .map_err(|e| ArtifactError::ChatService(e.to_string()))?;

        let summary = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ArtifactError::ChatService("empty choices".to_string()))?;

        Ok(summary)
    }

    async fn upload_image(
        &self,
        container: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<String, ArtifactError> {
        self.storage
            .upload(container, filename, data)
            .await
            .map_err(|e| ArtifactError::StorageService(e.to_string()))
    }
}
