//! App configuration endpoints.

use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::db::{ConfigEntry, DEFAULT_PLATFORM_NAME, DEFAULT_PRIMARY_COLOR};
use crate::i18n::Lang;
use crate::AppState;

/// GET /api/config/
pub async fn list_config(
    State(state): State<Arc<AppState>>,
    lang: Lang,
) -> Result<ApiResponse<Vec<ConfigEntry>>, ApiError> {
    let entries = ConfigEntry::list(&state.db, lang).await?;
    Ok(ApiResponse::ok(entries))
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub primary_color: String,
    pub platform_name: String,
}

/// GET /api/config/theme/
///
/// Missing rows fall back to the shipped branding literals.
pub async fn theme(
    State(state): State<Arc<AppState>>,
    lang: Lang,
) -> Result<ApiResponse<ThemeResponse>, ApiError> {
    let primary_color = ConfigEntry::get_value(&state.db, "primary_color", lang)
        .await?
        .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string());
    let platform_name = ConfigEntry::get_value(&state.db, "platform_name", lang)
        .await?
        .unwrap_or_else(|| DEFAULT_PLATFORM_NAME.to_string());

    Ok(ApiResponse::ok(ThemeResponse {
        primary_color,
        platform_name,
    }))
}
