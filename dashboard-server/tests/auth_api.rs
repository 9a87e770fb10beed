//! End-to-end API tests driving the full router and middleware stack
//! through in-process oneshot calls.

use axum::body::Body;
use http::{Request, StatusCode, header};
use serde_json::{Value, json};

use dashboard_server::auth::JwtConfig;
use dashboard_server::db::repository::{role, section_permission, user};
use dashboard_server::routes::{OneshotRouter, build_app};
use dashboard_server::{Config, ServerState};
use shared::models::UserUpdate;

async fn test_state() -> (ServerState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        work_dir: dir.path().to_string_lossy().into_owned(),
        database_file: None,
        http_port: 0,
        jwt: JwtConfig {
            secret: "integration-test-secret-key-32-bytes!!".into(),
            algorithm: jsonwebtoken::Algorithm::HS256,
            expiration_minutes: 30,
        },
        environment: "development".into(),
        max_db_connections: 5,
    };
    let state = ServerState::initialize(&config).await;
    (state, dir)
}

async fn call(state: &ServerState, request: Request<Body>) -> http::Response<Body> {
    build_app(state).oneshot(state, request).await.unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: http::Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(state: &ServerState, name: &str, email: &str, password: &str) -> Value {
    let response = call(
        state,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({"name": name, "email": email, "password": password}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn register_issues_a_usable_session() {
    let (state, _dir) = test_state().await;

    let registered = register(&state, "Jane", "jane@example.com", "correct horse 1").await;
    let token = registered["access_token"].as_str().unwrap().to_string();
    let user_id = registered["user"]["id"].as_i64().unwrap();

    // Token subject decodes back to the principal id
    let claims = state.jwt_service.validate_token(&token).unwrap();
    assert_eq!(claims.sub.parse::<i64>().unwrap(), user_id);
    assert_eq!(claims.email, "jane@example.com");

    // Exactly one role, named "user" with case preserved
    let roles = user::roles_of(state.pool(), user_id).await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, "user");

    // The token resolves through the protected route
    let response = call(&state, get_request("/api/v1/auth/me", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["email"], "jane@example.com");
    assert!(me.get("hashed_password").is_none());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let (state, _dir) = test_state().await;

    register(&state, "Jane", "jane@example.com", "correct horse 1").await;

    let response = call(
        &state,
        json_request(
            "POST",
            "/api/v1/auth/register",
            json!({"name": "Other", "email": "jane@example.com", "password": "different pw 9"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let (state, _dir) = test_state().await;

    register(&state, "Jane", "jane@example.com", "correct horse 1").await;

    let wrong_password = call(
        &state,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"email": "jane@example.com", "password": "wrong password"}),
        ),
    )
    .await;
    let unknown_email = call(
        &state,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"email": "nobody@example.com", "password": "wrong password"}),
        ),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // Identical bodies: the response must not reveal whether the email exists
    let first = body_json(wrong_password).await;
    let second = body_json(unknown_email).await;
    assert_eq!(first, second);
    assert_eq!(first["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() {
    let (state, _dir) = test_state().await;

    register(&state, "Jane", "jane@example.com", "correct horse 1").await;

    let response = call(
        &state,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"email": "jane@example.com", "password": "correct horse 1"}),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    let claims = state
        .jwt_service
        .validate_token(body["access_token"].as_str().unwrap())
        .unwrap();
    assert_eq!(
        claims.sub.parse::<i64>().unwrap(),
        body["user"]["id"].as_i64().unwrap()
    );
}

#[tokio::test]
async fn missing_token_gets_bearer_challenge() {
    let (state, _dir) = test_state().await;

    let response = call(&state, get_request("/api/v1/auth/me", None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let garbage = call(&state, get_request("/api/v1/auth/me", Some("not.a.token"))).await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn disabled_account_is_forbidden_even_with_valid_token() {
    let (state, _dir) = test_state().await;

    let registered = register(&state, "Jane", "jane@example.com", "correct horse 1").await;
    let token = registered["access_token"].as_str().unwrap().to_string();
    let user_id = registered["user"]["id"].as_i64().unwrap();

    user::update(
        state.pool(),
        user_id,
        UserUpdate {
            name: None,
            email: None,
            password: None,
            is_active: Some(false),
            is_verified: None,
        },
    )
    .await
    .unwrap();

    // The token itself still verifies: disabling does not revoke it
    assert!(state.jwt_service.validate_token(&token).is_ok());

    // But session resolution now refuses the account
    let response = call(&state, get_request("/api/v1/auth/me", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // And a fresh login is rejected with the distinct inactive message
    let login = call(
        &state,
        json_request(
            "POST",
            "/api/v1/auth/login",
            json!({"email": "jane@example.com", "password": "correct horse 1"}),
        ),
    )
    .await;
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(login).await;
    assert_eq!(
        body["message"],
        "Account is inactive. Please contact an administrator."
    );
}

#[tokio::test]
async fn admin_gate_requires_admin_role() {
    let (state, _dir) = test_state().await;

    let registered = register(&state, "Jane", "jane@example.com", "correct horse 1").await;
    let token = registered["access_token"].as_str().unwrap().to_string();
    let user_id = registered["user"]["id"].as_i64().unwrap();

    // Plain user: administrative CRUD is off limits
    let response = call(&state, get_request("/api/v1/roles", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Admin access required");

    // Role name comparison is case-insensitive for the admin gate
    let admin_role = role::get_or_create(state.pool(), "Admin").await.unwrap();
    user::assign_role(state.pool(), user_id, admin_role.id)
        .await
        .unwrap();

    let response = call(&state, get_request("/api/v1/roles", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn section_access_is_or_across_roles() {
    let (state, _dir) = test_state().await;

    let registered = register(&state, "Jane", "jane@example.com", "correct horse 1").await;
    let token = registered["access_token"].as_str().unwrap().to_string();
    let user_id = registered["user"]["id"].as_i64().unwrap();

    // No grant anywhere: denied with the section named in the message
    let response = call(&state, get_request("/api/v1/sections/dashboard", Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("section 'dashboard'")
    );

    // Second role grants view only; the "user" role still grants nothing
    let analyst = role::get_or_create(state.pool(), "analyst").await.unwrap();
    user::assign_role(state.pool(), user_id, analyst.id)
        .await
        .unwrap();
    section_permission::set(state.pool(), analyst.id, "dashboard", true, false)
        .await
        .unwrap();

    let view = call(&state, get_request("/api/v1/sections/dashboard", Some(token.as_str()))).await;
    assert_eq!(view.status(), StatusCode::OK);
    let body = body_json(view).await;
    assert_eq!(body["granted"], true);

    let edit = call(
        &state,
        get_request("/api/v1/sections/dashboard/edit", Some(token.as_str())),
    )
    .await;
    assert_eq!(edit.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn permission_management_roundtrip() {
    let (state, _dir) = test_state().await;

    let registered = register(&state, "Root", "root@example.com", "correct horse 1").await;
    let token = registered["access_token"].as_str().unwrap().to_string();
    let user_id = registered["user"]["id"].as_i64().unwrap();

    let admin_role = role::get_or_create(state.pool(), "admin").await.unwrap();
    user::assign_role(state.pool(), user_id, admin_role.id)
        .await
        .unwrap();
    let viewer = role::get_or_create(state.pool(), "viewer").await.unwrap();

    // Upsert twice through the API; the second write wins in place
    let uri = format!("/api/v1/permissions/roles/{}/sections/dashboard", viewer.id);
    let mut request = json_request("PUT", &uri, json!({"can_view": true, "can_edit": false}));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let response = call(&state, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let mut request = json_request("PUT", &uri, json!({"can_view": false, "can_edit": false}));
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let response = call(&state, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["can_view"], false);

    let rows = section_permission::list_by_role(state.pool(), viewer.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);

    // Explicit check endpoint: unknown section is false, bad action is 400
    let check_uri = format!(
        "/api/v1/permissions/check?role_id={}&section=nonexistent_section&action=view",
        viewer.id
    );
    let response = call(&state, get_request(&check_uri, Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["granted"], false);

    let bad_uri = format!(
        "/api/v1/permissions/check?role_id={}&section=dashboard&action=delete",
        viewer.id
    );
    let response = call(&state, get_request(&bad_uri, Some(token.as_str()))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown role on set is a 404
    let mut request = json_request(
        "PUT",
        "/api/v1/permissions/roles/99999/sections/dashboard",
        json!({"can_view": true, "can_edit": true}),
    );
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let response = call(&state, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn role_deletion_guarded_by_assignments() {
    let (state, _dir) = test_state().await;

    let registered = register(&state, "Root", "root@example.com", "correct horse 1").await;
    let token = registered["access_token"].as_str().unwrap().to_string();
    let admin_id = registered["user"]["id"].as_i64().unwrap();
    let admin_role = role::get_or_create(state.pool(), "admin").await.unwrap();
    user::assign_role(state.pool(), admin_id, admin_role.id)
        .await
        .unwrap();

    // The registration above assigned "user" to the admin account too
    let user_role = role::find_by_name(state.pool(), "user").await.unwrap().unwrap();

    let uri = format!("/api/v1/roles/{}", user_role.id);
    let mut request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let response = call(&state, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Unassigning first makes the delete succeed
    user::remove_role(state.pool(), admin_id, user_role.id)
        .await
        .unwrap();
    let mut request = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, format!("Bearer {token}").parse().unwrap());
    let response = call(&state, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_is_public() {
    let (state, _dir) = test_state().await;

    let response = call(&state, get_request("/api/v1/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}
