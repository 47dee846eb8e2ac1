//! Registration, login, and profile flows.

use axum::http::StatusCode;
use serde_json::json;
use summit_integration_tests::TestApp;

#[tokio::test]
async fn register_then_fetch_profile() {
    let app = TestApp::new();
    let token = app.register("Avery Quinn", "avery@example.com").await;

    let (status, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Avery Quinn");
    assert_eq!(body["email"], "avery@example.com");
    assert_eq!(body["role"], "user");
    // The credential hash must never appear in any response.
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::new();
    app.register("First", "dup@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Second", "email": "DUP@example.com", "password": "trailhead-9x" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "An account with this email already exists");
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let app = TestApp::new();
    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "A", "email": "a@example.com", "password": "short" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let app = TestApp::new();
    app.register("Avery", "avery@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "avery@example.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    // Unknown email gets the identical response.
    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "wrong-password" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn login_is_case_insensitive_on_email() {
    let app = TestApp::new();
    app.register("Avery", "avery@example.com").await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "AVERY@Example.Com", "password": "trailhead-9x" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new();
    let (status, _) = app.get("/api/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/orders/my", Some("garbage-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_roundtrip() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;

    let (status, _) = app
        .put(
            "/api/auth/profile",
            Some(&token),
            json!({ "name": "Avery Q.", "phone": "555-0101", "address": "12 Ridge Road" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/auth/me", Some(&token)).await;
    assert_eq!(body["name"], "Avery Q.");
    assert_eq!(body["phone"], "555-0101");
    assert_eq!(body["address"], "12 Ridge Road");
}

#[tokio::test]
async fn change_password_invalidates_the_old_one() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;

    let (status, _) = app
        .put(
            "/api/auth/change-password",
            Some(&token),
            json!({ "oldPassword": "trailhead-9x", "newPassword": "summit-pass-22" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "avery@example.com", "password": "trailhead-9x" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "avery@example.com", "password": "summit-pass-22" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn change_password_requires_the_current_one() {
    let app = TestApp::new();
    let token = app.register("Avery", "avery@example.com").await;

    let (status, _) = app
        .put(
            "/api/auth/change-password",
            Some(&token),
            json!({ "oldPassword": "not-my-password", "newPassword": "summit-pass-22" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
