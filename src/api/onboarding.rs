//! Read-only onboarding reference data.

use axum::extract::State;
use serde::Serialize;
use std::sync::Arc;

use crate::api::envelope::ApiResponse;
use crate::api::error::ApiError;
use crate::db::{
    DailyGoalOption, DiscoverySource, LearningDomainOption, MotivationOption, StemLevel,
};
use crate::i18n::Lang;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ChoiceOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct OnboardingOptions {
    pub discovery_sources: Vec<ChoiceOption>,
    pub stem_levels: Vec<ChoiceOption>,
    pub motivations: Vec<MotivationOption>,
    pub daily_goals: Vec<DailyGoalOption>,
    pub learning_domains: Vec<LearningDomainOption>,
}

/// GET /api/onboarding/options/
pub async fn options(
    State(state): State<Arc<AppState>>,
    lang: Lang,
) -> Result<ApiResponse<OnboardingOptions>, ApiError> {
    let discovery_sources = DiscoverySource::ALL
        .iter()
        .map(|s| ChoiceOption {
            value: s.as_str(),
            label: s.label(),
        })
        .collect();
    let stem_levels = StemLevel::ALL
        .iter()
        .map(|s| ChoiceOption {
            value: s.as_str(),
            label: s.label(),
        })
        .collect();

    let motivations = MotivationOption::list(&state.db, lang).await?;
    let daily_goals = DailyGoalOption::list(&state.db, lang).await?;
    let learning_domains = LearningDomainOption::list(&state.db, lang).await?;

    Ok(ApiResponse::ok(OnboardingOptions {
        discovery_sources,
        stem_levels,
        motivations,
        daily_goals,
        learning_domains,
    }))
}
