//! HTTP-level integration tests for the `/auth` endpoints and bearer-token
//! extraction.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, signed_in};

// ---------------------------------------------------------------------------
// Login / register
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_then_login_returns_token_pair() {
    let (app, store) = common::build_test_app();
    let user_id = common::register(app.clone(), "amy", "pa55word", "warehouse worker").await;

    let json = common::login(app, "amy", "pa55word").await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 900);

    let (access, refresh) = store.token_pair(&user_id).expect("pair must be stored");
    assert_eq!(json["access_token"], access);
    assert_eq!(json["refresh_token"], refresh);
}

#[tokio::test]
async fn wrong_password_and_unknown_login_look_the_same() {
    let (app, _store) = common::build_test_app();
    common::register(app.clone(), "bob", "right", "product worker").await;

    let wrong = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "login": "bob", "password": "wrong" }),
    )
    .await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong = body_json(wrong).await;

    let unknown = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "login": "nobody", "password": "wrong" }),
    )
    .await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown = body_json(unknown).await;

    assert_eq!(wrong, unknown);
    assert_eq!(wrong["error"], "wrong login or password");
}

#[tokio::test]
async fn empty_login_is_rejected_before_the_service() {
    let (app, _store) = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "login": "", "password": "x" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn taken_login_is_a_conflict() {
    let (app, _store) = common::build_test_app();
    common::register(app.clone(), "carol", "pw", "admin").await;

    let response = post_json(
        app,
        "/api/v1/auth/register",
        serde_json::json!({ "login": "carol", "password": "pw2", "role": "admin" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_role_registers_as_product_worker() {
    let (app, _store) = common::build_test_app();
    let (id, access) = signed_in(&app, "dave", "forklift driver").await;

    let response = get_auth(app, &format!("/api/v1/auth/users/{id}/role"), &access).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "product worker");
    assert_eq!(json["data"]["code"], 0);
}

// ---------------------------------------------------------------------------
// Role lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn users_cannot_read_each_others_roles() {
    let (app, _store) = common::build_test_app();
    let (_erin, erin_token) = signed_in(&app, "erin", "product worker").await;
    let (frank, _) = signed_in(&app, "frank", "warehouse worker").await;

    let response = get_auth(
        app,
        &format!("/api/v1/auth/users/{frank}/role"),
        &erin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_reads_any_role() {
    let (app, _store) = common::build_test_app();
    let (_root, admin_token) = signed_in(&app, "root", "admin").await;
    let (gina, _) = signed_in(&app, "gina", "warehouse-worker").await;

    let response = get_auth(
        app,
        &format!("/api/v1/auth/users/{gina}/role"),
        &admin_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["role"], "warehouse worker");
}

// ---------------------------------------------------------------------------
// Bearer extraction and token lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _store) = common::build_test_app();
    let response = get(app, "/api/v1/auth/users/whoever/role").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    let (app, _store) = common::build_test_app();
    let (id, access) = signed_in(&app, "hank", "admin").await;
    let tampered = format!("{access}x");

    let response = get_auth(app, &format!("/api/v1/auth/users/{id}/role"), &tampered).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn expired_access_token_asks_to_log_in_again() {
    let mut config = common::test_config();
    config.jwt.access_token_expiry_mins = -5;
    let (app, _store) = common::build_test_app_with(config);
    let (id, access) = signed_in(&app, "ivy", "product worker").await;

    let response = get_auth(app, &format!("/api/v1/auth/users/{id}/role"), &access).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "TOKEN_TIMED_OUT");
    assert_eq!(json["error"], "login again");
}

#[tokio::test]
async fn refresh_issues_a_working_access_token() {
    let (app, store) = common::build_test_app();
    let id = common::register(app.clone(), "jack", "pw", "warehouse worker").await;
    let tokens = common::login(app.clone(), "jack", "pw").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": tokens["refresh_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let access = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let (stored_access, stored_refresh) = store.token_pair(&id).unwrap();
    assert_eq!(stored_access, access);
    assert_eq!(tokens["refresh_token"], stored_refresh);

    let response = get_auth(app, &format!("/api/v1/auth/users/{id}/role"), &access).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn refresh_token_cannot_be_used_as_bearer() {
    let (app, _store) = common::build_test_app();
    let id = common::register(app.clone(), "kim", "pw", "admin").await;
    let tokens = common::login(app.clone(), "kim", "pw").await;
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let response = get_auth(app, &format!("/api/v1/auth/users/{id}/role"), refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_matches!(body_json(response).await["code"].as_str(), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn access_token_cannot_be_refreshed() {
    let (app, _store) = common::build_test_app();
    common::register(app.clone(), "lee", "pw", "product worker").await;
    let tokens = common::login(app.clone(), "lee", "pw").await;

    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": tokens["access_token"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_matches!(body_json(response).await["code"].as_str(), Some("TOKEN_TIMED_OUT"));
}

#[tokio::test]
async fn garbage_refresh_token_times_out() {
    let (app, _store) = common::build_test_app();
    let response = post_json(
        app,
        "/api/v1/auth/refresh",
        serde_json::json!({ "refresh_token": "garbage" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "TOKEN_TIMED_OUT");
}
