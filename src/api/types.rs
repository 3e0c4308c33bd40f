use serde::{Deserialize, Serialize};

use crate::db::ArtifactWithOwner;
use crate::entities::{users, wizards};
use crate::services::WizardRecord;

/// Uniform response envelope. Every endpoint, success or failure, wraps
/// its payload in this shape.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub success: bool,
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<serde_json::Value> {
    pub fn ok_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: 200,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn failure_with_data(
        code: u16,
        message: impl Into<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            success: false,
            code,
            message: message.into(),
            data: Some(data),
        }
    }
}

// ========== Response DTOs ==========

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i32,
    pub username: String,
    pub enabled: bool,
    pub roles: String,
}

impl From<users::Model> for UserDto {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            enabled: user.enabled,
            roles: user.roles,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardDto {
    pub id: i32,
    pub name: String,
    pub number_of_artifacts: u64,
}

impl From<WizardRecord> for WizardDto {
    fn from(record: WizardRecord) -> Self {
        Self {
            id: record.wizard.id,
            name: record.wizard.name,
            number_of_artifacts: record.number_of_artifacts,
        }
    }
}

/// Owner as embedded in an artifact response. The artifact count is not
/// carried here; ownership is a foreign key and the count is a derived
/// figure only the wizard endpoints report.
#[derive(Debug, Serialize)]
pub struct OwnerDto {
    pub id: i32,
    pub name: String,
}

impl From<wizards::Model> for OwnerDto {
    fn from(wizard: wizards::Model) -> Self {
        Self {
            id: wizard.id,
            name: wizard.name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub owner: Option<OwnerDto>,
}

impl From<ArtifactWithOwner> for ArtifactDto {
    fn from((artifact, owner): ArtifactWithOwner) -> Self {
        Self {
            id: artifact.id,
            name: artifact.name,
            description: artifact.description,
            image_url: artifact.image_url,
            owner: owner.map(OwnerDto::from),
        }
    }
}

/// One page of results in the shape paging clients expect.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_pages: u64,
}

// ========== Request DTOs ==========

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct WizardRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub roles: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub roles: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub confirm_new_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query-string paging parameters with catalog-friendly defaults.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub size: u64,
}

fn default_page_size() -> u64 {
    20
}
