//! Router-level integration tests.
//!
//! Every request goes through the real router against an in-memory SQLite
//! database, so the envelope, language handling and auth extractors are all
//! exercised end to end. Elapsed time is simulated by rewriting stored
//! timestamps.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, SecondsFormat, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use steamup_server::{api, config::Config, db, AppState};

async fn test_state() -> Arc<AppState> {
    let pool = db::init_in_memory().await.expect("init db");
    db::seed_reference_data(&pool).await.expect("seed");

    let mut config = Config::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    Arc::new(AppState::new(config, pool))
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value, axum::http::HeaderMap) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value, headers)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let (status, value, _) = send(app, "POST", uri, Some(body), None).await;
    (status, value)
}

async fn register(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = post(
        app,
        "/api/auth/register/",
        json!({
            "email": email,
            "password": password,
            "confirm_password": password,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

/// Pull the latest issued OTP code straight from the table.
async fn latest_otp(state: &AppState, email: &str) -> String {
    let row: (String,) = sqlx::query_as(
        "SELECT c.code FROM otp_codes c
         JOIN users u ON u.id = c.user_id
         WHERE u.email = ?
         ORDER BY c.created_at DESC LIMIT 1",
    )
    .bind(email)
    .fetch_one(&state.db)
    .await
    .unwrap();
    row.0
}

/// Backdate every OTP row for a user by `seconds`.
async fn backdate_otps(state: &AppState, email: &str, seconds: i64) {
    let past = (Utc::now() - Duration::seconds(seconds))
        .to_rfc3339_opts(SecondsFormat::Micros, true);
    sqlx::query(
        "UPDATE otp_codes SET created_at = ?
         WHERE user_id = (SELECT id FROM users WHERE email = ?)",
    )
    .bind(past)
    .bind(email)
    .execute(&state.db)
    .await
    .unwrap();
}

// ==================== Registration ====================

#[tokio::test]
async fn register_creates_user_and_returns_tokens() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    let body = register(&app, "new@example.com", "password123").await;
    assert_eq!(body["code"], 201);
    assert_eq!(body["error"], Value::Null);
    assert_eq!(body["data"]["user"]["email"], "new@example.com");
    assert_eq!(body["data"]["user"]["is_verified"], false);
    assert_eq!(body["data"]["creds"]["email"], "new@example.com");
    assert!(body["data"]["creds"]["access"].is_string());
    assert!(body["data"]["creds"]["refresh"].is_string());

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn register_duplicate_email_fails() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    register(&app, "dup@example.com", "password123").await;
    let (status, body) = post(
        &app,
        "/api/auth/register/",
        json!({
            "email": "dup@example.com",
            "password": "password123",
            "confirm_password": "password123",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A user with this email already exists");
    assert_eq!(body["data"], Value::Null);

    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await
        .unwrap();
    assert_eq!(count.0, 1);
}

#[tokio::test]
async fn register_password_mismatch_fails() {
    let state = test_state().await;
    let app = api::create_router(state);

    let (status, body) = post(
        &app,
        "/api/auth/register/",
        json!({
            "email": "mismatch@example.com",
            "password": "password123",
            "confirm_password": "different456",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Passwords do not match");
}

#[tokio::test]
async fn register_field_errors_are_one_flat_string() {
    let state = test_state().await;
    let app = api::create_router(state);

    let (status, body) = post(
        &app,
        "/api/auth/register/",
        json!({
            "email": "not-an-email",
            "password": "short",
            "confirm_password": "short",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().expect("error must be a string");
    assert!(error.contains("email: Enter a valid email address"));
    assert!(error.contains("password: Password must be at least 8 characters long"));
    assert!(body["error"].is_string(), "never a nested object");
}

#[tokio::test]
async fn register_with_profile_fields_creates_profile() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    let (status, body) = post(
        &app,
        "/api/auth/register/",
        json!({
            "email": "onboard@example.com",
            "password": "password123",
            "confirm_password": "password123",
            "full_name": "Jamila Karimova",
            "age": 14,
            "interests": [1, 3],
            "motivation": 2,
            "daily_goal": 3,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let profile = &body["data"]["user"]["profile"];
    assert_eq!(profile["full_name"], "Jamila Karimova");
    assert_eq!(profile["age"], 14);
    assert_eq!(profile["interests"], json!([1, 3]));
    assert_eq!(profile["motivation"], 2);
    assert_eq!(profile["daily_goal"], 3);
}

// ==================== Login & tokens ====================

#[tokio::test]
async fn login_returns_tokens_and_verification_state() {
    let state = test_state().await;
    let app = api::create_router(state);

    register(&app, "login@example.com", "password123").await;
    let (status, body) = post(
        &app,
        "/api/auth/login/",
        json!({"email": "login@example.com", "password": "password123"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access"].is_string());
    assert!(body["data"]["refresh"].is_string());
    assert_eq!(body["data"]["is_verified"], false);
    assert_eq!(body["data"]["email"], "login@example.com");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let state = test_state().await;
    let app = api::create_router(state);

    register(&app, "secure@example.com", "password123").await;

    let (status, body) = post(
        &app,
        "/api/auth/login/",
        json!({"email": "secure@example.com", "password": "wrongpassword"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
    assert_eq!(body["code"], 401);

    let (status, _) = post(
        &app,
        "/api/auth/login/",
        json!({"email": "nobody@example.com", "password": "password123"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn refresh_issues_new_access_token() {
    let state = test_state().await;
    let app = api::create_router(state);

    let body = register(&app, "refresh@example.com", "password123").await;
    let refresh = body["data"]["creds"]["refresh"].as_str().unwrap().to_string();
    let access = body["data"]["creds"]["access"].as_str().unwrap().to_string();

    let (status, body) = post(&app, "/api/auth/token/refresh/", json!({"refresh": refresh})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access"].is_string());

    // An access token is not accepted in the refresh slot
    let (status, _) = post(&app, "/api/auth/token/refresh/", json!({"refresh": access})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(&app, "/api/auth/token/refresh/", json!({"refresh": "garbage"})).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ==================== OTP ====================

#[tokio::test]
async fn otp_request_is_throttled_then_allowed_again() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    register(&app, "otp@example.com", "password123").await;

    let (status, body) = post(
        &app,
        "/api/auth/request-otp/",
        json!({"email": "otp@example.com", "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "OTP sent to otp@example.com");

    // Immediate retry is throttled with the remaining wait in the message
    let (status, body) = post(
        &app,
        "/api/auth/request-otp/",
        json!({"email": "otp@example.com", "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Please wait "), "{}", error);
    let seconds: i64 = error
        .trim_start_matches("Please wait ")
        .split(' ')
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&seconds));

    // A different purpose has its own throttle window
    let (status, _) = post(
        &app,
        "/api/auth/request-otp/",
        json!({"email": "otp@example.com", "purpose": "reset"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Once the window has passed, issuance succeeds again
    backdate_otps(&state, "otp@example.com", 61).await;
    let (status, _) = post(
        &app,
        "/api/auth/request-otp/",
        json!({"email": "otp@example.com", "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn otp_request_unknown_email_fails() {
    let state = test_state().await;
    let app = api::create_router(state);

    let (status, body) = post(
        &app,
        "/api/auth/request-otp/",
        json!({"email": "ghost@example.com", "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User with this email does not exist.");
}

#[tokio::test]
async fn otp_verify_flips_user_and_consumes_code() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    register(&app, "verifyme@example.com", "password123").await;
    post(
        &app,
        "/api/auth/request-otp/",
        json!({"email": "verifyme@example.com", "purpose": "verify"}),
    )
    .await;
    let code = latest_otp(&state, "verifyme@example.com").await;

    // Wrong code first
    let wrong = if code == "000000" { "000001" } else { "000000" };
    let (status, body) = post(
        &app,
        "/api/auth/verify-otp/",
        json!({"email": "verifyme@example.com", "code": wrong, "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired OTP code.");

    // Right code verifies the email
    let (status, body) = post(
        &app,
        "/api/auth/verify-otp/",
        json!({"email": "verifyme@example.com", "code": code, "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "Email verified successfully.");

    let verified: (bool,) =
        sqlx::query_as("SELECT is_verified FROM users WHERE email = 'verifyme@example.com'")
            .fetch_one(&state.db)
            .await
            .unwrap();
    assert!(verified.0);

    // The code is single use
    let (status, _) = post(
        &app,
        "/api/auth/verify-otp/",
        json!({"email": "verifyme@example.com", "code": code, "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn otp_verify_rejects_expired_and_wrong_purpose() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    register(&app, "expired@example.com", "password123").await;
    post(
        &app,
        "/api/auth/request-otp/",
        json!({"email": "expired@example.com", "purpose": "verify"}),
    )
    .await;
    let code = latest_otp(&state, "expired@example.com").await;

    // Purpose must match
    let (status, _) = post(
        &app,
        "/api/auth/verify-otp/",
        json!({"email": "expired@example.com", "code": code, "purpose": "reset"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Older than five minutes is expired
    backdate_otps(&state, "expired@example.com", 6 * 60).await;
    let (status, body) = post(
        &app,
        "/api/auth/verify-otp/",
        json!({"email": "expired@example.com", "code": code, "purpose": "verify"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or expired OTP code.");
}

// ==================== Password reset ====================

#[tokio::test]
async fn password_reset_full_flow() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    register(&app, "reset@example.com", "oldpassword1").await;

    let (status, _) = post(
        &app,
        "/api/auth/forgot-password/",
        json!({"email": "reset@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let code = latest_otp(&state, "reset@example.com").await;

    // The reset code can be checked without consuming the flow
    let (status, body) = post(
        &app,
        "/api/auth/verify-reset-otp/",
        json!({"email": "reset@example.com", "code": code}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["message"], "OTP verified successfully.");

    // verify-reset-otp consumed the code; issue a fresh one for the reset
    backdate_otps(&state, "reset@example.com", 61).await;
    post(
        &app,
        "/api/auth/forgot-password/",
        json!({"email": "reset@example.com"}),
    )
    .await;
    let code = latest_otp(&state, "reset@example.com").await;

    let (status, _) = post(
        &app,
        "/api/auth/reset-password/",
        json!({
            "email": "reset@example.com",
            "code": code,
            "new_password": "newpassword2",
            "confirm_password": "newpassword2",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password is gone, new one works
    let (status, _) = post(
        &app,
        "/api/auth/login/",
        json!({"email": "reset@example.com", "password": "oldpassword1"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = post(
        &app,
        "/api/auth/login/",
        json!({"email": "reset@example.com", "password": "newpassword2"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The consumed OTP cannot reset again
    let (status, _) = post(
        &app,
        "/api/auth/reset-password/",
        json!({
            "email": "reset@example.com",
            "code": code,
            "new_password": "thirdpassword3",
            "confirm_password": "thirdpassword3",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn password_reset_mismatch_fails_before_touching_otp() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    register(&app, "careful@example.com", "oldpassword1").await;
    post(
        &app,
        "/api/auth/forgot-password/",
        json!({"email": "careful@example.com"}),
    )
    .await;
    let code = latest_otp(&state, "careful@example.com").await;

    let (status, body) = post(
        &app,
        "/api/auth/reset-password/",
        json!({
            "email": "careful@example.com",
            "code": code,
            "new_password": "newpassword2",
            "confirm_password": "different3",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Passwords do not match.");

    // The OTP is still unused and works afterwards
    let (status, _) = post(
        &app,
        "/api/auth/reset-password/",
        json!({
            "email": "careful@example.com",
            "code": code,
            "new_password": "newpassword2",
            "confirm_password": "newpassword2",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ==================== has-profile ====================

#[tokio::test]
async fn has_profile_reports_user_existence() {
    let state = test_state().await;
    let app = api::create_router(state);

    register(&app, "known@example.com", "password123").await;

    let (status, body) = post(
        &app,
        "/api/auth/has-profile/",
        json!({"email": "known@example.com"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["exists"], true);

    let (_, body) = post(
        &app,
        "/api/auth/has-profile/",
        json!({"email": "unknown@example.com"}),
    )
    .await;
    assert_eq!(body["data"]["exists"], false);

    let (status, body) = post(&app, "/api/auth/has-profile/", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email is required");
}

// ==================== Profile ====================

async fn access_token(app: &Router, email: &str) -> String {
    let (_, body) = post(
        app,
        "/api/auth/login/",
        json!({"email": email, "password": "password123"}),
    )
    .await;
    body["data"]["access"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn profile_get_creates_with_defaults() {
    let state = test_state().await;
    let app = api::create_router(state);

    register(&app, "fresh@example.com", "password123").await;
    let token = access_token(&app, "fresh@example.com").await;

    let (status, body, _) = send(&app, "GET", "/api/profile/", None, Some(&token)).await;
    assert_eq!(status, StatusCode::OK, "never 404: {}", body);
    assert_eq!(body["data"]["full_name"], "");
    assert_eq!(body["data"]["age"], 0);
    assert_eq!(body["data"]["discovery_source"], "google");
    assert_eq!(body["data"]["stem_level"], "beginner");
    assert_eq!(body["data"]["interests"], json!([]));
    assert_eq!(body["data"]["motivation"], Value::Null);
    assert_eq!(body["data"]["daily_goal"], Value::Null);
}

#[tokio::test]
async fn profile_requires_token() {
    let state = test_state().await;
    let app = api::create_router(state);

    let (status, body, _) = send(&app, "GET", "/api/profile/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _, _) = send(&app, "GET", "/api/profile/", None, Some("bogus")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_replaces_interests() {
    let state = test_state().await;
    let app = api::create_router(state);

    register(&app, "learner@example.com", "password123").await;
    let token = access_token(&app, "learner@example.com").await;

    let (status, body, _) = send(
        &app,
        "POST",
        "/api/profile/",
        Some(json!({
            "full_name": "Aziz Rahimov",
            "age": 16,
            "interests": [1, 2, 5],
            "discovery_source": "tiktok",
            "stem_level": "intermediate",
            "motivation": 1,
            "daily_goal": 2,
        })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["interests"], json!([1, 2, 5]));
    assert_eq!(body["data"]["discovery_source"], "tiktok");

    // PATCH with a new set replaces, never merges
    let (status, body, _) = send(
        &app,
        "PATCH",
        "/api/profile/",
        Some(json!({"interests": [3]})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["interests"], json!([3]));
    // Untouched fields survive a partial update
    assert_eq!(body["data"]["full_name"], "Aziz Rahimov");
    assert_eq!(body["data"]["motivation"], 1);
}

#[tokio::test]
async fn profile_update_rejects_unknown_catalog_ids() {
    let state = test_state().await;
    let app = api::create_router(state);

    register(&app, "strict@example.com", "password123").await;
    let token = access_token(&app, "strict@example.com").await;

    let (status, body, _) = send(
        &app,
        "PUT",
        "/api/profile/",
        Some(json!({"interests": [999], "motivation": 999})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("interests: Invalid learning domain id 999"));
    assert!(error.contains("motivation: Invalid motivation id 999"));
}

// ==================== Onboarding & config ====================

#[tokio::test]
async fn onboarding_options_are_localized() {
    let state = test_state().await;
    let app = api::create_router(state);

    let (status, body, _) = send(&app, "GET", "/api/onboarding/options/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["discovery_sources"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["stem_levels"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["motivations"].as_array().unwrap().len(), 5);
    assert_eq!(body["data"]["daily_goals"].as_array().unwrap().len(), 7);
    assert_eq!(body["data"]["learning_domains"].as_array().unwrap().len(), 11);

    let (_, body, _) = send(&app, "GET", "/api/onboarding/options/?lang=uz", None, None).await;
    let domains = body["data"]["learning_domains"].as_array().unwrap();
    assert!(domains.iter().any(|d| d["name"] == "Fizika"));
}

#[tokio::test]
async fn theme_returns_seeded_values_and_literal_fallbacks() {
    let state = test_state().await;
    let app = api::create_router(state.clone());

    let (status, body, _) = send(&app, "GET", "/api/config/theme/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["primary_color"], "#12D18E");
    assert_eq!(body["data"]["platform_name"], "SteamUp");

    // With the rows gone the literals still come back
    sqlx::query("DELETE FROM app_config")
        .execute(&state.db)
        .await
        .unwrap();
    let (status, body, _) = send(&app, "GET", "/api/config/theme/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["primary_color"], "#12D18E");
    assert_eq!(body["data"]["platform_name"], "SteamUp");
}

#[tokio::test]
async fn config_list_returns_entries() {
    let state = test_state().await;
    let app = api::create_router(state);

    let (status, body, _) = send(&app, "GET", "/api/config/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["data"].as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["key"] == "primary_color" && e["value"] == "#12D18E"));
    assert!(entries
        .iter()
        .any(|e| e["key"] == "platform_name" && e["value"] == "SteamUp"));
}

// ==================== Envelope & language ====================

#[tokio::test]
async fn content_language_header_reflects_resolution() {
    let state = test_state().await;
    let app = api::create_router(state);

    let (_, _, headers) = send(&app, "GET", "/api/config/theme/", None, None).await;
    assert_eq!(headers.get(header::CONTENT_LANGUAGE).unwrap(), "en");

    let (_, _, headers) = send(&app, "GET", "/api/config/theme/?lang=ru", None, None).await;
    assert_eq!(headers.get(header::CONTENT_LANGUAGE).unwrap(), "ru");

    let request = Request::builder()
        .method("GET")
        .uri("/api/config/theme/")
        .header(header::ACCEPT_LANGUAGE, "uz-Latn,en;q=0.5")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(header::CONTENT_LANGUAGE).unwrap(),
        "uz"
    );
}

#[tokio::test]
async fn malformed_json_body_yields_enveloped_400() {
    let state = test_state().await;
    let app = api::create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["data"], Value::Null);
    assert!(body["error"].is_string());
    assert_eq!(body["code"], 400);
}
