use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::collections::BTreeMap;
use std::fmt;

use super::ApiResponse;
use crate::services::{ArtifactError, AuthError, UserError, WizardError};

#[derive(Debug)]
pub enum ApiError {
    /// Message carries the entity kind and id verbatim.
    NotFound(String),

    /// Policy or single-field validation failure; message is surfaced as-is.
    BadRequest(String),

    /// Request-body validation failure; the field→reason map is returned
    /// as the envelope data.
    InvalidArguments(BTreeMap<String, String>),

    Unauthorized {
        message: String,
        detail: Option<String>,
    },

    Forbidden,

    DatabaseError(String),

    ExternalApiError { service: String, message: String },

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::InvalidArguments(_) => write!(f, "Invalid arguments"),
            ApiError::Unauthorized { message, .. } => write!(f, "Unauthorized: {}", message),
            ApiError::Forbidden => write!(f, "Forbidden"),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ExternalApiError { service, message } => {
                write!(f, "{} error: {}", service, message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, ApiResponse::failure(404, msg))
            }
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiResponse::failure(400, msg))
            }
            ApiError::InvalidArguments(fields) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::failure_with_data(
                    400,
                    "Provided arguments are invalid, see data for details.",
                    serde_json::to_value(fields).unwrap_or_default(),
                ),
            ),
            ApiError::Unauthorized { message, detail } => {
                let body = match detail {
                    Some(detail) => ApiResponse::failure_with_data(
                        401,
                        message,
                        serde_json::Value::String(detail),
                    ),
                    None => ApiResponse::failure(401, message),
                };
                (StatusCode::UNAUTHORIZED, body)
            }
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                ApiResponse::failure(403, "No Permission."),
            ),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failure(500, "A server internal error occurs."),
                )
            }
            ApiError::ExternalApiError { service, message } => {
                tracing::warn!("{} API error: {}", service, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failure(500, "A server internal error occurs."),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::failure(500, "A server internal error occurs."),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::BadCredentials(detail) => ApiError::Unauthorized {
                message: "username or password is incorrect.".to_string(),
                detail: Some(detail),
            },
            UserError::Validation(msg) => ApiError::BadRequest(msg),
            UserError::Database(msg) => ApiError::DatabaseError(msg),
            UserError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::WizardNotFound(_) | WizardError::ArtifactNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            WizardError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<ArtifactError> for ApiError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ArtifactError::ChatService(message) => ApiError::ExternalApiError {
                service: "chat".to_string(),
                message,
            },
            ArtifactError::StorageService(message) => ApiError::ExternalApiError {
                service: "storage".to_string(),
                message,
            },
            ArtifactError::Database(msg) => ApiError::DatabaseError(msg),
            ArtifactError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::Unauthorized {
                message: "username or password is incorrect.".to_string(),
                detail: None,
            },
            AuthError::AccountDisabled => ApiError::Unauthorized {
                message: "user account is abnormal".to_string(),
                detail: None,
            },
            AuthError::InvalidToken => ApiError::Unauthorized {
                message: "The access token provided is expired, revoked, or invalid for other reasons."
                    .to_string(),
                detail: Some("Invalid token".to_string()),
            },
            AuthError::Database(msg) => ApiError::DatabaseError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}
