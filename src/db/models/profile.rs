//! User profile and its onboarding choice enums.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoverySource {
    Google,
    Facebook,
    Tiktok,
    Playstore,
    Tv,
}

impl DiscoverySource {
    pub const ALL: [DiscoverySource; 5] = [
        DiscoverySource::Google,
        DiscoverySource::Facebook,
        DiscoverySource::Tiktok,
        DiscoverySource::Playstore,
        DiscoverySource::Tv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoverySource::Google => "google",
            DiscoverySource::Facebook => "facebook",
            DiscoverySource::Tiktok => "tiktok",
            DiscoverySource::Playstore => "playstore",
            DiscoverySource::Tv => "tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiscoverySource::Google => "Google",
            DiscoverySource::Facebook => "Facebook",
            DiscoverySource::Tiktok => "TikTok",
            DiscoverySource::Playstore => "Play Store",
            DiscoverySource::Tv => "TV",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StemLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl StemLevel {
    pub const ALL: [StemLevel; 3] = [
        StemLevel::Beginner,
        StemLevel::Intermediate,
        StemLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StemLevel::Beginner => "beginner",
            StemLevel::Intermediate => "intermediate",
            StemLevel::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StemLevel::Beginner => "Beginner",
            StemLevel::Intermediate => "Intermediate",
            StemLevel::Advanced => "Advanced",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub age: i64,
    pub discovery_source: String,
    pub stem_level: String,
    pub motivation_id: Option<i64>,
    pub daily_goal_id: Option<i64>,
}

impl UserProfile {
    pub async fn find_by_user(
        pool: &crate::db::DbPool,
        user_id: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM user_profiles WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn interest_ids(
        &self,
        pool: &crate::db::DbPool,
    ) -> Result<Vec<i64>, sqlx::Error> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT domain_id FROM profile_interests WHERE profile_id = ? ORDER BY domain_id",
        )
        .bind(&self.id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}

/// Profile representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub full_name: String,
    pub age: i64,
    pub interests: Vec<i64>,
    pub discovery_source: String,
    pub stem_level: String,
    pub motivation: Option<i64>,
    pub daily_goal: Option<i64>,
}

impl ProfileResponse {
    pub fn from_profile(profile: UserProfile, interests: Vec<i64>) -> Self {
        Self {
            full_name: profile.full_name,
            age: profile.age,
            interests,
            discovery_source: profile.discovery_source,
            stem_level: profile.stem_level,
            motivation: profile.motivation_id,
            daily_goal: profile.daily_goal_id,
        }
    }
}
