use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode},
    middleware,
    routing::{delete, get, patch, post, put},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

mod artifacts;
pub mod auth;
mod error;
mod types;
mod users;
mod validation;
mod wizards;

pub use error::ApiError;
pub use types::*;

/// Builds the full application router.
///
/// Reads (artifact lookups, listing, search criteria aside) and login are
/// public; every mutating route sits behind the bearer-token middleware.
pub fn router(state: SharedState) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(protected_router(state.clone()))
        .route("/artifacts", get(artifacts::find_all))
        .route("/artifacts/summary", get(artifacts::summarize))
        .route("/artifacts/{artifact_id}", get(artifacts::find_by_id))
        .route("/auth/login", post(auth::login))
        .with_state(state);

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api/v1", api_router)
        .fallback(endpoint_not_found)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn protected_router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/artifacts", post(artifacts::add))
        .route("/artifacts/search", post(artifacts::search))
        .route("/artifacts/images", post(artifacts::upload_image))
        .route("/artifacts/{artifact_id}", put(artifacts::update))
        .route("/artifacts/{artifact_id}", delete(artifacts::delete))
        .route("/wizards", get(wizards::find_all))
        .route("/wizards", post(wizards::add))
        .route("/wizards/{wizard_id}", get(wizards::find_by_id))
        .route("/wizards/{wizard_id}", put(wizards::update))
        .route("/wizards/{wizard_id}", delete(wizards::delete))
        .route(
            "/wizards/{wizard_id}/artifacts/{artifact_id}",
            put(wizards::assign_artifact),
        )
        .route("/users", get(users::find_all))
        .route("/users", post(users::add))
        .route("/users/{user_id}", get(users::find_by_id))
        .route("/users/{user_id}", put(users::update))
        .route("/users/{user_id}", delete(users::delete))
        .route("/users/{user_id}/password", patch(users::change_password))
        .route_layer(middleware::from_fn_with_state(state, auth::bearer_auth))
}

async fn endpoint_not_found() -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure(
            404,
            "This API endpoint is not found.",
        )),
    )
}
