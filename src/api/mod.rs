mod app_config;
pub mod auth;
pub mod envelope;
pub mod error;
mod onboarding;
mod otp;
mod profile;
mod validation;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::i18n;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register/", post(auth::register))
        .route("/login/", post(auth::login))
        .route("/token/refresh/", post(auth::refresh_token))
        .route("/request-otp/", post(otp::request_otp))
        .route("/verify-otp/", post(otp::verify_otp))
        .route("/forgot-password/", post(otp::forgot_password))
        .route("/verify-reset-otp/", post(otp::verify_reset_otp))
        .route("/reset-password/", post(otp::reset_password))
        .route("/has-profile/", post(auth::has_profile));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        // Profile requires a bearer token, enforced by the CurrentUser extractor
        .route(
            "/profile/",
            get(profile::get_profile)
                .post(profile::create_profile)
                .put(profile::update_profile)
                .patch(profile::update_profile),
        )
        .route("/config/", get(app_config::list_config))
        .route("/config/theme/", get(app_config::theme))
        .route("/onboarding/options/", get(onboarding::options))
        // Resolves the request language and echoes Content-Language
        .layer(middleware::from_fn(i18n::language_middleware));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
