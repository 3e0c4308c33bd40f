//! Handlers for wizard endpoints, including artifact ownership transfer.

use axum::{
    Json,
    extract::{Path, State},
};

use super::ApiResponse;
use super::error::ApiError;
use super::types::{WizardDto, WizardRequest};
use super::validation;
use crate::state::SharedState;

pub async fn find_all(
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<Vec<WizardDto>>>, ApiError> {
    let records = state.wizard_service.find_all().await?;
    let dtos: Vec<WizardDto> = records.into_iter().map(WizardDto::from).collect();

    Ok(Json(ApiResponse::ok("Find All Wizard Success", dtos)))
}

pub async fn find_by_id(
    State(state): State<SharedState>,
    Path(wizard_id): Path<i32>,
) -> Result<Json<ApiResponse<WizardDto>>, ApiError> {
    let record = state.wizard_service.find_by_id(wizard_id).await?;

    Ok(Json(ApiResponse::ok(
        "Find Wizard Success",
        WizardDto::from(record),
    )))
}

pub async fn add(
    State(state): State<SharedState>,
    Json(request): Json<WizardRequest>,
) -> Result<Json<ApiResponse<WizardDto>>, ApiError> {
    validation::validate_wizard(&request)?;

    let record = state.wizard_service.add(&request.name).await?;

    Ok(Json(ApiResponse::ok(
        "Add Wizard Success",
        WizardDto::from(record),
    )))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(wizard_id): Path<i32>,
    Json(request): Json<WizardRequest>,
) -> Result<Json<ApiResponse<WizardDto>>, ApiError> {
    validation::validate_wizard(&request)?;

    let record = state.wizard_service.update(wizard_id, &request.name).await?;

    Ok(Json(ApiResponse::ok(
        "Update Wizard Success",
        WizardDto::from(record),
    )))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(wizard_id): Path<i32>,
) -> Result<Json<ApiResponse>, ApiError> {
    state.wizard_service.delete(wizard_id).await?;

    Ok(Json(ApiResponse::ok_message("Delete Wizard Success")))
}

pub async fn assign_artifact(
    State(state): State<SharedState>,
    Path((wizard_id, artifact_id)): Path<(i32, String)>,
) -> Result<Json<ApiResponse>, ApiError> {
    state
        .wizard_service
        .assign_artifact(wizard_id, &artifact_id)
        .await?;

    Ok(Json(ApiResponse::ok_message("Artifact Assignment Success")))
}
