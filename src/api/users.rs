//! Handlers for user account endpoints.
//!
//! Listing, creating, and deleting accounts is restricted to admins at the
//! routing layer. Updates are open to any authenticated caller; which
//! fields actually apply is decided by the service from the caller's roles.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use super::ApiResponse;
use super::error::ApiError;
use super::types::{CreateUserRequest, PasswordChangeRequest, UpdateUserRequest, UserDto};
use super::validation;
use crate::services::{NewUser, TokenClaims, UserUpdate, has_admin_role};
use crate::state::SharedState;

fn require_admin(claims: &TokenClaims) -> Result<(), ApiError> {
    if has_admin_role(&claims.authorities) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

pub async fn find_all(
    State(state): State<SharedState>,
    Extension(claims): Extension<TokenClaims>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    require_admin(&claims)?;

    let users = state.user_service.find_all().await?;
    let dtos: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();

    Ok(Json(ApiResponse::ok("Find All Users Success", dtos)))
}

pub async fn find_by_id(
    State(state): State<SharedState>,
    Extension(claims): Extension<TokenClaims>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_admin(&claims)?;

    let user = state.user_service.find_by_id(user_id).await?;

    Ok(Json(ApiResponse::ok(
        "Find User By Id Success",
        UserDto::from(user),
    )))
}

pub async fn add(
    State(state): State<SharedState>,
    Extension(claims): Extension<TokenClaims>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_admin(&claims)?;
    validation::validate_create_user(&request)?;

    let user = state
        .user_service
        .create(NewUser {
            username: request.username,
            password: request.password,
            enabled: request.enabled,
            roles: request.roles,
        })
        .await?;

    Ok(Json(ApiResponse::ok("Add Success", UserDto::from(user))))
}

pub async fn update(
    State(state): State<SharedState>,
    Extension(claims): Extension<TokenClaims>,
    Path(user_id): Path<i32>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    validation::validate_update_user(&request)?;

    let user = state
        .user_service
        .update(
            user_id,
            UserUpdate {
                username: request.username,
                enabled: request.enabled,
                roles: request.roles,
            },
            &claims.authorities,
        )
        .await?;

    Ok(Json(ApiResponse::ok(
        "Update User Success",
        UserDto::from(user),
    )))
}

pub async fn delete(
    State(state): State<SharedState>,
    Extension(claims): Extension<TokenClaims>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse>, ApiError> {
    require_admin(&claims)?;

    state.user_service.delete(user_id).await?;

    Ok(Json(ApiResponse::ok_message("Delete User Success")))
}

pub async fn change_password(
    State(state): State<SharedState>,
    Path(user_id): Path<i32>,
    Json(request): Json<PasswordChangeRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    validation::validate_password_change(&request)?;

    state
        .user_service
        .change_password(
            user_id,
            &request.old_password,
            &request.new_password,
            &request.confirm_new_password,
        )
        .await?;

    Ok(Json(ApiResponse::ok_message("Change Password Success")))
}
