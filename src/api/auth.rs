//! Login endpoint and bearer-token middleware.

use axum::{
    Json,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;

use super::ApiResponse;
use super::error::ApiError;
use super::types::UserDto;
use crate::state::SharedState;

fn missing_credentials() -> ApiError {
    ApiError::Unauthorized {
        message: "Login credentials are missing.".to_string(),
        detail: None,
    }
}

/// Pulls username and password out of an HTTP Basic `Authorization` header.
fn basic_credentials(request: &Request) -> Result<(String, String), ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(missing_credentials)?;

    let encoded = header
        .strip_prefix("Basic ")
        .ok_or_else(missing_credentials)?;

    let decoded = BASE64
        .decode(encoded)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(missing_credentials)?;

    let (username, password) = decoded.split_once(':').ok_or_else(missing_credentials)?;
    Ok((username.to_string(), password.to_string()))
}

/// POST /auth/login
///
/// Credentials arrive as HTTP Basic auth; the response carries the user
/// info and a fresh bearer token.
pub async fn login(
    State(state): State<SharedState>,
    request: Request,
) -> Result<Json<ApiResponse>, ApiError> {
    let (username, password) = basic_credentials(&request)?;

    let outcome = state.auth_service.login(&username, &password).await?;
    let user_info = UserDto::from(outcome.user);

    Ok(Json(ApiResponse::ok(
        "User Info and JSON Web Token",
        json!({
            "userInfo": user_info,
            "token": outcome.token,
        }),
    )))
}

/// Middleware guarding protected routes. Validates the bearer token
/// (signature, expiry, whitelist) and stashes the claims in request
/// extensions for downstream handlers.
pub async fn bearer_auth(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(missing_credentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(missing_credentials)?;

    let claims = state.auth_service.authorize(token).await?;
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
