use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

use crate::entities::{artifacts, wizards};

/// An artifact together with its current owner, if any.
pub type ArtifactWithOwner = (artifacts::Model, Option<wizards::Model>);

pub struct ArtifactRepository {
    conn: DatabaseConnection,
}

impl ArtifactRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: &str) -> Result<Option<ArtifactWithOwner>> {
        artifacts::Entity::find_by_id(id)
            .find_also_related(wizards::Entity)
            .one(&self.conn)
            .await
            .context("Failed to query artifact by ID")
    }

    pub async fn list_all(&self) -> Result<Vec<ArtifactWithOwner>> {
        artifacts::Entity::find()
            .find_also_related(wizards::Entity)
            .all(&self.conn)
            .await
            .context("Failed to list artifacts")
    }

    /// One page of artifacts with their owners, plus the total page count.
    /// A zero page size would make the paginator panic, so it is clamped.
    pub async fn list_page(&self, page: u64, size: u64) -> Result<(Vec<ArtifactWithOwner>, u64)> {
        let paginator = artifacts::Entity::find()
            .find_also_related(wizards::Entity)
            .paginate(&self.conn, size.max(1));

        let total_pages = paginator
            .num_pages()
            .await
            .context("Failed to count artifact pages")?;
        let rows = paginator
            .fetch_page(page)
            .await
            .context("Failed to fetch artifact page")?;

        Ok((rows, total_pages))
    }

    /// Search by partial name and/or description match, combined with AND
    /// semantics, paginated.
    pub async fn search(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        page: u64,
        size: u64,
    ) -> Result<(Vec<ArtifactWithOwner>, u64)> {
        let mut condition = Condition::all();
        if let Some(name) = name {
            condition = condition.add(artifacts::Column::Name.contains(name));
        }
        if let Some(description) = description {
            condition = condition.add(artifacts::Column::Description.contains(description));
        }

        let paginator = artifacts::Entity::find()
            .filter(condition)
            .find_also_related(wizards::Entity)
            .paginate(&self.conn, size.max(1));

        let total_pages = paginator
            .num_pages()
            .await
            .context("Failed to count search pages")?;
        let rows = paginator
            .fetch_page(page)
            .await
            .context("Failed to fetch search page")?;

        Ok((rows, total_pages))
    }

    pub async fn create(
        &self,
        id: &str,
        name: &str,
        description: &str,
        image_url: &str,
    ) -> Result<artifacts::Model> {
        let active = artifacts::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            image_url: Set(image_url.to_string()),
            owner_id: Set(None),
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert artifact")
    }

    pub async fn update_fields(
        &self,
        artifact: artifacts::Model,
        name: &str,
        description: &str,
        image_url: &str,
    ) -> Result<artifacts::Model> {
        let mut active: artifacts::ActiveModel = artifact.into();
        active.name = Set(name.to_string());
        active.description = Set(description.to_string());
        active.image_url = Set(image_url.to_string());

        active
            .update(&self.conn)
            .await
            .context("Failed to update artifact")
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        artifacts::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete artifact")?;
        Ok(())
    }

    /// Reassign an artifact to a new owner. With ownership stored as a
    /// foreign key, detaching from the previous owner and attaching to the
    /// new one is a single write; reassigning to the current owner is a
    /// no-op at the row level.
    pub async fn set_owner(&self, artifact: artifacts::Model, owner_id: i32) -> Result<()> {
        let mut active: artifacts::ActiveModel = artifact.into();
        active.owner_id = Set(Some(owner_id));

        active
            .update(&self.conn)
            .await
            .context("Failed to assign artifact owner")?;
        Ok(())
    }
}
