//! Handlers for artifact endpoints.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};

use super::ApiResponse;
use super::error::ApiError;
use super::types::{ArtifactDto, ArtifactRequest, PageDto, PageQuery, SearchCriteria};
use super::validation;
use crate::services::{ArtifactCriteria, ArtifactInput};
use crate::state::SharedState;

pub async fn find_by_id(
    State(state): State<SharedState>,
    Path(artifact_id): Path<String>,
) -> Result<Json<ApiResponse<ArtifactDto>>, ApiError> {
    let pair = state.artifact_service.find_by_id(&artifact_id).await?;

    Ok(Json(ApiResponse::ok(
        "Find One Success",
        ArtifactDto::from(pair),
    )))
}

pub async fn find_all(
    State(state): State<SharedState>,
    Query(paging): Query<PageQuery>,
) -> Result<Json<ApiResponse<PageDto<ArtifactDto>>>, ApiError> {
    let size = paging.size.max(1);
    let (pairs, total_pages) = state.artifact_service.find_all(paging.page, size).await?;

    let page = PageDto {
        content: pairs.into_iter().map(ArtifactDto::from).collect(),
        page: paging.page,
        size,
        total_pages,
    };

    Ok(Json(ApiResponse::ok("Find All Success", page)))
}

pub async fn add(
    State(state): State<SharedState>,
    Json(request): Json<ArtifactRequest>,
) -> Result<Json<ApiResponse<ArtifactDto>>, ApiError> {
    validation::validate_artifact(&request)?;

    let artifact = state
        .artifact_service
        .save(ArtifactInput {
            name: request.name,
            description: request.description,
            image_url: request.image_url,
        })
        .await?;

    Ok(Json(ApiResponse::ok(
        "Add Success",
        ArtifactDto::from((artifact, None)),
    )))
}

pub async fn update(
    State(state): State<SharedState>,
    Path(artifact_id): Path<String>,
    Json(request): Json<ArtifactRequest>,
) -> Result<Json<ApiResponse<ArtifactDto>>, ApiError> {
    validation::validate_artifact(&request)?;

    let pair = state
        .artifact_service
        .update(
            &artifact_id,
            ArtifactInput {
                name: request.name,
                description: request.description,
                image_url: request.image_url,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok(
        "Update Artifact Success",
        ArtifactDto::from(pair),
    )))
}

pub async fn delete(
    State(state): State<SharedState>,
    Path(artifact_id): Path<String>,
) -> Result<Json<ApiResponse>, ApiError> {
    state.artifact_service.delete(&artifact_id).await?;

    Ok(Json(ApiResponse::ok_message("Delete Artifact Success")))
}

pub async fn search(
    State(state): State<SharedState>,
    Query(paging): Query<PageQuery>,
    Json(criteria): Json<SearchCriteria>,
) -> Result<Json<ApiResponse<PageDto<ArtifactDto>>>, ApiError> {
    let size = paging.size.max(1);
    let (pairs, total_pages) = state
        .artifact_service
        .find_by_criteria(
            ArtifactCriteria {
                name: criteria.name,
                description: criteria.description,
            },
            paging.page,
            size,
        )
        .await?;

    let page = PageDto {
        content: pairs.into_iter().map(ArtifactDto::from).collect(),
        page: paging.page,
        size,
        total_pages,
    };

    Ok(Json(ApiResponse::ok("Search Success", page)))
}

pub async fn summarize(
    State(state): State<SharedState>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    let summary = state.artifact_service.summarize().await?;

    Ok(Json(ApiResponse::ok("Summarize Success", summary)))
}

/// POST /artifacts/images
///
/// Accepts a multipart upload under the `file` field and forwards it to
/// blob storage; the response data is the public URL.
pub async fn upload_image(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("upload.bin")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;

        let container = state.config.storage.default_container.clone();
        let url = state
            .artifact_service
            .upload_image(&container, &filename, data.to_vec())
            .await?;

        return Ok(Json(ApiResponse::ok("Upload Image Success", url)));
    }

    Err(ApiError::BadRequest(
        "Multipart field 'file' is required.".to_string(),
    ))
}
