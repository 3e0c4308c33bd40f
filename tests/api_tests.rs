use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Admin account seeded by the initial migration.
const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "password";

async fn spawn_app() -> Router {
    let mut config = arcanum::Config::default();
    config.general.database_url = "sqlite::memory:".to_string();
    config.security.jwt_secret = "integration-test-secret".to_string();

    let state = arcanum::SharedState::new(config)
        .await
        .expect("Failed to create app state");
    arcanum::api::router(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn login(app: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    let credentials = BASE64.encode(format!("{username}:{password}"));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/auth/login")
        .header("Authorization", format!("Basic {credentials}"))
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();

    (status, json)
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = login(app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    body["data"]["token"].as_str().unwrap().to_string()
}

async fn create_artifact(app: &Router, token: &str, name: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/artifacts",
        Some(token),
        Some(json!({
            "name": name,
            "description": format!("Description of {name}"),
            "imageUrl": "imageUrl",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Add Success");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_wizard(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/wizards",
        Some(token),
        Some(json!({ "name": name })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Add Wizard Success");
    body["data"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_login_and_protected_access() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/v1/wizards", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Login credentials are missing.");

    let (status, body) = login(&app, ADMIN_USERNAME, "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "username or password is incorrect.");

    let (status, body) = login(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User Info and JSON Web Token");
    assert_eq!(body["data"]["userInfo"]["username"], "admin");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/v1/wizards", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Find All Wizard Success");

    let (status, body) = send(&app, "GET", "/api/v1/wizards", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "The access token provided is expired, revoked, or invalid for other reasons."
    );
}

#[tokio::test]
async fn test_artifact_crud() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let artifact_id = create_artifact(&app, &token, "Deluminator").await;
    // Snowflake ids are numeric strings.
    assert!(artifact_id.parse::<u64>().is_ok());

    let uri = format!("/api/v1/artifacts/{artifact_id}");
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Find One Success");
    assert_eq!(body["data"]["name"], "Deluminator");
    assert_eq!(body["data"]["imageUrl"], "imageUrl");
    assert!(body["data"]["owner"].is_null());

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&token),
        Some(json!({
            "name": "Deluminator",
            "description": "An updated description",
            "imageUrl": "imageUrl",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Update Artifact Success");
    assert_eq!(body["data"]["description"], "An updated description");

    let (status, body) = send(&app, "DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delete Artifact Success");

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_artifact_not_found_message() {
    let app = spawn_app().await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/v1/artifacts/1250808601744904199",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], 404);
    assert_eq!(
        body["message"],
        "Could not find artifact With Id 1250808601744904199 :("
    );
}

#[tokio::test]
async fn test_artifact_validation() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/artifacts",
        Some(&token),
        Some(json!({ "name": "", "description": "", "imageUrl": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Provided arguments are invalid, see data for details."
    );
    assert!(body["data"]["name"].is_string());
    assert!(body["data"]["description"].is_string());
    assert!(body["data"]["imageUrl"].is_string());
}

#[tokio::test]
async fn test_artifact_pagination_and_search() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    for i in 0..5 {
        create_artifact(&app, &token, &format!("Wand {i}")).await;
    }
    create_artifact(&app, &token, "Invisibility Cloak").await;

    let (status, body) = send(&app, "GET", "/api/v1/artifacts?page=0&size=4", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Find All Success");
    assert_eq!(body["data"]["content"].as_array().unwrap().len(), 4);
    assert_eq!(body["data"]["totalPages"], 2);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/artifacts/search?page=0&size=20",
        Some(&token),
        Some(json!({ "name": "Wand" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Search Success");
    assert_eq!(body["data"]["content"].as_array().unwrap().len(), 5);

    // Criteria combine with AND semantics.
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/artifacts/search?page=0&size=20",
        Some(&token),
        Some(json!({ "name": "Wand", "description": "Cloak" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_zero_page_size_is_clamped() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    create_artifact(&app, &token, "Deluminator").await;

    // A degenerate page size must not take the process down; the smallest
    // valid size is served instead.
    let (status, body) = send(&app, "GET", "/api/v1/artifacts?page=0&size=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Find All Success");
    assert_eq!(body["data"]["size"], 1);
    assert_eq!(body["data"]["content"].as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/artifacts/search?page=0&size=0",
        Some(&token),
        Some(json!({ "name": "Deluminator" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_artifact_assignment() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let albus = create_wizard(&app, &token, "Albus Dumbledore").await;
    let harry = create_wizard(&app, &token, "Harry Potter").await;
    let artifact_id = create_artifact(&app, &token, "Deluminator").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/wizards/{albus}/artifacts/{artifact_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Artifact Assignment Success");

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/artifacts/{artifact_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(body["data"]["owner"]["id"].as_i64().unwrap(), albus);

    // Reassignment detaches from the previous owner.
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/wizards/{harry}/artifacts/{artifact_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/artifacts/{artifact_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(body["data"]["owner"]["id"].as_i64().unwrap(), harry);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/wizards/{albus}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["numberOfArtifacts"], 0);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/wizards/{harry}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(body["data"]["numberOfArtifacts"], 1);
}

#[tokio::test]
async fn test_assignment_to_unknown_wizard_leaves_owner() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let albus = create_wizard(&app, &token, "Albus Dumbledore").await;
    let artifact_id = create_artifact(&app, &token, "Deluminator").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/wizards/{albus}/artifacts/{artifact_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/wizards/999/artifacts/{artifact_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Could not find wizard With Id 999 :(");

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/v1/artifacts/{artifact_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(body["data"]["owner"]["id"].as_i64().unwrap(), albus);
}

#[tokio::test]
async fn test_wizard_delete_detaches_artifacts() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let albus = create_wizard(&app, &token, "Albus Dumbledore").await;
    let artifact_id = create_artifact(&app, &token, "Deluminator").await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/wizards/{albus}/artifacts/{artifact_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/wizards/{albus}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delete Wizard Success");

    // The artifact survives, ownerless.
    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/artifacts/{artifact_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["owner"].is_null());
}

#[tokio::test]
async fn test_user_crud_requires_admin() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "username": "eru",
            "password": "Qwerty123",
            "enabled": true,
            "roles": "user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Add Success");
    // Password hashes never leave the service.
    assert!(body["data"]["password"].is_null());

    let (status, body) = login(&app, "eru", "Qwerty123").await;
    assert_eq!(status, StatusCode::OK);
    let user_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/v1/users", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "No Permission.");

    let (status, body) = send(&app, "GET", "/api/v1/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Find All Users Success");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_non_admin_update_only_changes_username() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "username": "eru",
            "password": "Qwerty123",
            "enabled": true,
            "roles": "user",
        })),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = login(&app, "eru", "Qwerty123").await;
    let user_token = body["data"]["token"].as_str().unwrap().to_string();

    // A non-admin attempting to grant themselves admin: the username
    // applies, enabled and roles are silently ignored.
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/users/{user_id}"),
        Some(&user_token),
        Some(json!({
            "username": "eru-renamed",
            "enabled": false,
            "roles": "admin",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Update User Success");
    assert_eq!(body["data"]["username"], "eru-renamed");
    assert_eq!(body["data"]["enabled"], true);
    assert_eq!(body["data"]["roles"], "user");

    // No revocation on the non-admin path; the token keeps working.
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/users/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_update_applies_all_fields_and_revokes() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "username": "eru",
            "password": "Qwerty123",
            "enabled": true,
            "roles": "user",
        })),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = login(&app, "eru", "Qwerty123").await;
    let user_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/users/{user_id}"),
        Some(&token),
        Some(json!({
            "username": "eru",
            "enabled": true,
            "roles": "admin user",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["roles"], "admin user");

    // The admin touched role-affecting fields, so the target's current
    // token is revoked.
    let (status, body) = send(&app, "GET", "/api/v1/wizards", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "The access token provided is expired, revoked, or invalid for other reasons."
    );

    // Logging in again picks up the new roles.
    let (status, body) = login(&app, "eru", "Qwerty123").await;
    assert_eq!(status, StatusCode::OK);
    let user_token = body["data"]["token"].as_str().unwrap().to_string();
    let (status, _) = send(&app, "GET", "/api/v1/users", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_flow() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "username": "eru",
            "password": "Qwerty123",
            "enabled": true,
            "roles": "user",
        })),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = login(&app, "eru", "Qwerty123").await;
    let user_token = body["data"]["token"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/users/{user_id}/password");

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&user_token),
        Some(json!({
            "oldPassword": "wrong",
            "newPassword": "Abcdefg1",
            "confirmNewPassword": "Abcdefg1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "username or password is incorrect.");
    assert_eq!(body["data"], "Old password is incorrect");

    // Mismatch is reported before policy conformance is checked.
    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&user_token),
        Some(json!({
            "oldPassword": "Qwerty123",
            "newPassword": "short",
            "confirmNewPassword": "different",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "New password and confirm new password do not match."
    );

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&user_token),
        Some(json!({
            "oldPassword": "Qwerty123",
            "newPassword": "short",
            "confirmNewPassword": "short",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "New password does not conform to password policy."
    );

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(&user_token),
        Some(json!({
            "oldPassword": "Qwerty123",
            "newPassword": "Abcdefg1",
            "confirmNewPassword": "Abcdefg1",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Change Password Success");

    // The old token was revoked by the password change.
    let (status, _) = send(&app, "GET", "/api/v1/wizards", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = login(&app, "eru", "Qwerty123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = login(&app, "eru", "Abcdefg1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_disabled_account_cannot_login() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "username": "eru",
            "password": "Qwerty123",
            "enabled": false,
            "roles": "user",
        })),
    )
    .await;
    assert_eq!(body["data"]["enabled"], false);

    let (status, body) = login(&app, "eru", "Qwerty123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "user account is abnormal");
}

#[tokio::test]
async fn test_delete_user_revokes_token() {
    let app = spawn_app().await;
    let token = admin_token(&app).await;

    let (_, body) = send(
        &app,
        "POST",
        "/api/v1/users",
        Some(&token),
        Some(json!({
            "username": "eru",
            "password": "Qwerty123",
            "enabled": true,
            "roles": "user",
        })),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = login(&app, "eru", "Qwerty123").await;
    let user_token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/v1/users/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Delete User Success");

    let (status, _) = send(&app, "GET", "/api/v1/wizards", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/users/{user_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"].as_str().unwrap(),
        format!("Could not find user With Id {user_id} :(")
    );
}

#[tokio::test]
async fn test_unknown_endpoint_message() {
    let app = spawn_app().await;

    let (status, body) = send(&app, "GET", "/api/v2/nothing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "This API endpoint is not found.");
}
