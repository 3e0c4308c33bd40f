use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};

use crate::entities::{artifacts, wizards};

pub struct WizardRepository {
    conn: DatabaseConnection,
}

impl WizardRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_all(&self) -> Result<Vec<wizards::Model>> {
        wizards::Entity::find()
            .all(&self.conn)
            .await
            .context("Failed to list wizards")
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<wizards::Model>> {
        wizards::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query wizard by ID")
    }

    pub async fn create(&self, name: &str) -> Result<wizards::Model> {
        let active = wizards::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert wizard")
    }

    pub async fn update_name(&self, wizard: wizards::Model, name: &str) -> Result<wizards::Model> {
        let mut active: wizards::ActiveModel = wizard.into();
        active.name = Set(name.to_string());

        active
            .update(&self.conn)
            .await
            .context("Failed to update wizard")
    }

    /// Delete a wizard, releasing ownership of all their artifacts first.
    /// Both steps run inside one transaction so a failure leaves the
    /// ownership links intact.
    pub async fn delete(&self, id: i32) -> Result<()> {
        let txn = self.conn.begin().await?;

        artifacts::Entity::update_many()
            .col_expr(artifacts::Column::OwnerId, sea_orm::sea_query::Expr::value(Option::<i32>::None))
            .filter(artifacts::Column::OwnerId.eq(id))
            .exec(&txn)
            .await
            .context("Failed to detach artifacts from wizard")?;

        wizards::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("Failed to delete wizard")?;

        txn.commit().await?;
        Ok(())
    }

    /// Number of artifacts currently owned by a wizard (derived, not stored).
    pub async fn artifact_count(&self, id: i32) -> Result<u64> {
        artifacts::Entity::find()
            .filter(artifacts::Column::OwnerId.eq(id))
            .count(&self.conn)
            .await
            .context("Failed to count artifacts for wizard")
    }

    pub async fn owned_artifacts(&self, id: i32) -> Result<Vec<artifacts::Model>> {
        artifacts::Entity::find()
            .filter(artifacts::Column::OwnerId.eq(id))
            .all(&self.conn)
            .await
            .context("Failed to list artifacts for wizard")
    }
}
