//! Profile endpoints.
//!
//! A GET for a user without a profile creates one with placeholder defaults
//! and returns it; clients rely on never seeing a 404 here. Updates replace
//! submitted associations wholesale (interests are set, not merged).

use axum::extract::State;
use serde::Deserialize;
use std::sync::Arc;

use crate::api::auth::CurrentUser;
use crate::api::envelope::{ApiJson, ApiResponse};
use crate::api::error::{ApiError, ValidationErrorBuilder};
use crate::db::{
    DailyGoalOption, DiscoverySource, LearningDomainOption, MotivationOption, ProfileResponse,
    StemLevel, UserProfile,
};
use crate::AppState;

async fn get_or_create(state: &AppState, user_id: &str) -> Result<UserProfile, ApiError> {
    if let Some(profile) = UserProfile::find_by_user(&state.db, user_id).await? {
        return Ok(profile);
    }

    let profile_id = uuid::Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO user_profiles
             (id, user_id, full_name, age, discovery_source, stem_level, motivation_id, daily_goal_id)
         VALUES (?, ?, '', 0, 'google', 'beginner', NULL, NULL)",
    )
    .bind(&profile_id)
    .bind(user_id)
    .execute(&state.db)
    .await?;

    tracing::info!(user_id = %user_id, "Created profile with placeholder defaults");

    UserProfile::find_by_user(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::internal("Profile disappeared after creation"))
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub interests: Option<Vec<i64>>,
    #[serde(default)]
    pub discovery_source: Option<DiscoverySource>,
    #[serde(default)]
    pub stem_level: Option<StemLevel>,
    #[serde(default)]
    pub motivation: Option<i64>,
    #[serde(default)]
    pub daily_goal: Option<i64>,
}

async fn apply_update(
    state: &AppState,
    profile: UserProfile,
    request: ProfileUpdateRequest,
) -> Result<ProfileResponse, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Some(interests) = &request.interests {
        for id in interests {
            if !LearningDomainOption::exists(&state.db, *id).await? {
                errors.add("interests", format!("Invalid learning domain id {}", id));
            }
        }
    }
    if let Some(id) = request.motivation {
        if !MotivationOption::exists(&state.db, id).await? {
            errors.add("motivation", format!("Invalid motivation id {}", id));
        }
    }
    if let Some(id) = request.daily_goal {
        if !DailyGoalOption::exists(&state.db, id).await? {
            errors.add("daily_goal", format!("Invalid daily goal id {}", id));
        }
    }
    errors.finish()?;

    let full_name = request.full_name.unwrap_or(profile.full_name);
    let age = request.age.unwrap_or(profile.age);
    let discovery_source = request
        .discovery_source
        .map(|s| s.as_str().to_string())
        .unwrap_or(profile.discovery_source);
    let stem_level = request
        .stem_level
        .map(|s| s.as_str().to_string())
        .unwrap_or(profile.stem_level);
    let motivation = request.motivation.or(profile.motivation_id);
    let daily_goal = request.daily_goal.or(profile.daily_goal_id);

    let mut tx = state.db.begin().await?;
    sqlx::query(
        "UPDATE user_profiles
         SET full_name = ?, age = ?, discovery_source = ?, stem_level = ?,
             motivation_id = ?, daily_goal_id = ?
         WHERE id = ?",
    )
    .bind(&full_name)
    .bind(age)
    .bind(&discovery_source)
    .bind(&stem_level)
    .bind(motivation)
    .bind(daily_goal)
    .bind(&profile.id)
    .execute(&mut *tx)
    .await?;

    if let Some(interests) = &request.interests {
        sqlx::query("DELETE FROM profile_interests WHERE profile_id = ?")
            .bind(&profile.id)
            .execute(&mut *tx)
            .await?;
        for domain_id in interests {
            sqlx::query("INSERT INTO profile_interests (profile_id, domain_id) VALUES (?, ?)")
                .bind(&profile.id)
                .bind(domain_id)
                .execute(&mut *tx)
                .await?;
        }
    }
    tx.commit().await?;

    let updated = UserProfile::find_by_user(&state.db, &profile.user_id)
        .await?
        .ok_or_else(|| ApiError::internal("Profile disappeared during update"))?;
    let interests = updated.interest_ids(&state.db).await?;
    Ok(ProfileResponse::from_profile(updated, interests))
}

/// GET /api/profile/
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<ApiResponse<ProfileResponse>, ApiError> {
    let profile = get_or_create(&state, &user.id).await?;
    let interests = profile.interest_ids(&state.db).await?;
    Ok(ApiResponse::ok(ProfileResponse::from_profile(
        profile, interests,
    )))
}

/// POST /api/profile/
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<ProfileUpdateRequest>,
) -> Result<ApiResponse<ProfileResponse>, ApiError> {
    let profile = get_or_create(&state, &user.id).await?;
    let response = apply_update(&state, profile, request).await?;
    Ok(ApiResponse::created(response))
}

/// PUT/PATCH /api/profile/
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiJson(request): ApiJson<ProfileUpdateRequest>,
) -> Result<ApiResponse<ProfileResponse>, ApiError> {
    let profile = get_or_create(&state, &user.id).await?;
    let response = apply_update(&state, profile, request).await?;
    Ok(ApiResponse::ok(response))
}
