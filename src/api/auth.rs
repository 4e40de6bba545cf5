//! Registration, login and token handling.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::envelope::{ApiJson, ApiResponse};
use crate::api::error::{ApiError, ValidationErrorBuilder};
use crate::api::validation::{validate_email, validate_password};
use crate::config::AuthConfig;
use crate::db::{
    self, DailyGoalOption, LearningDomainOption, MotivationOption, ProfileResponse, User,
    UserResponse,
};
use crate::AppState;

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
}

fn issue_token(
    auth: &AuthConfig,
    user_id: &str,
    email: &str,
    token_type: &str,
    lifetime: Duration,
) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        token_type: token_type.to_string(),
        exp: (now + lifetime).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_token(auth: &AuthConfig, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::unauthorized("Token is invalid or expired"))
}

/// Credentials block returned by login and registration.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub access: String,
    pub refresh: String,
    pub user_id: String,
    pub email: String,
    pub is_verified: bool,
}

/// Issue an access/refresh pair for a user. `remember_me` only stretches the
/// refresh lifetime; access tokens always use the fixed default.
pub fn issue_token_pair(
    auth: &AuthConfig,
    user: &User,
    remember_me: bool,
) -> Result<LoginData, ApiError> {
    let access = issue_token(
        auth,
        &user.id,
        &user.email,
        "access",
        Duration::minutes(auth.access_token_minutes),
    )?;
    let refresh_days = if remember_me {
        auth.remember_me_refresh_days
    } else {
        auth.refresh_token_days
    };
    let refresh = issue_token(
        auth,
        &user.id,
        &user.email,
        "refresh",
        Duration::days(refresh_days),
    )?;
    Ok(LoginData {
        access,
        refresh,
        user_id: user.id.clone(),
        email: user.email.clone(),
        is_verified: user.is_verified,
    })
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    // Optional onboarding payload collected by newer clients
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub interests: Option<Vec<i64>>,
    #[serde(default)]
    pub motivation: Option<i64>,
    #[serde(default)]
    pub daily_goal: Option<i64>,
}

impl RegisterRequest {
    fn has_profile_fields(&self) -> bool {
        self.full_name.is_some()
            || self.age.is_some()
            || self.interests.is_some()
            || self.motivation.is_some()
            || self.daily_goal.is_some()
    }
}

#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    #[serde(flatten)]
    pub user: UserResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileResponse>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: RegisteredUser,
    pub creds: LoginData,
}

/// POST /api/auth/register/
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<ApiResponse<RegisterResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(message) = validate_email(&request.email) {
        errors.add("email", message);
    }
    if let Err(message) = validate_password(&request.password) {
        errors.add("password", message);
    }
    errors.finish()?;

    if request.password != request.confirm_password {
        return Err(ApiError::validation("Passwords do not match"));
    }

    if User::find_by_email(&state.db, &request.email).await?.is_some() {
        return Err(ApiError::validation("A user with this email already exists"));
    }

    // Catalog references are checked before anything is written
    if let Some(interests) = &request.interests {
        for id in interests {
            if !LearningDomainOption::exists(&state.db, *id).await? {
                return Err(ApiError::validation(format!(
                    "interests: Invalid learning domain id {}",
                    id
                )));
            }
        }
    }
    if let Some(id) = request.motivation {
        if !MotivationOption::exists(&state.db, id).await? {
            return Err(ApiError::validation(format!(
                "motivation: Invalid motivation id {}",
                id
            )));
        }
    }
    if let Some(id) = request.daily_goal {
        if !DailyGoalOption::exists(&state.db, id).await? {
            return Err(ApiError::validation(format!(
                "daily_goal: Invalid daily goal id {}",
                id
            )));
        }
    }

    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let created_at = db::now_rfc3339();

    let mut tx = state.db.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, is_active, is_verified, is_staff, created_at)
         VALUES (?, ?, ?, 1, 0, 0, ?)",
    )
    .bind(&user_id)
    .bind(&request.email)
    .bind(&password_hash)
    .bind(&created_at)
    .execute(&mut *tx)
    .await?;

    let profile = if request.has_profile_fields() {
        let profile_id = uuid::Uuid::new_v4().to_string();
        let full_name = request.full_name.clone().unwrap_or_default();
        let age = request.age.unwrap_or(0);
        sqlx::query(
            "INSERT INTO user_profiles
                 (id, user_id, full_name, age, discovery_source, stem_level, motivation_id, daily_goal_id)
             VALUES (?, ?, ?, ?, 'google', 'beginner', ?, ?)",
        )
        .bind(&profile_id)
        .bind(&user_id)
        .bind(&full_name)
        .bind(age)
        .bind(request.motivation)
        .bind(request.daily_goal)
        .execute(&mut *tx)
        .await?;

        let interests = request.interests.clone().unwrap_or_default();
        for domain_id in &interests {
            sqlx::query("INSERT INTO profile_interests (profile_id, domain_id) VALUES (?, ?)")
                .bind(&profile_id)
                .bind(domain_id)
                .execute(&mut *tx)
                .await?;
        }

        Some(ProfileResponse {
            full_name,
            age,
            interests,
            discovery_source: "google".to_string(),
            stem_level: "beginner".to_string(),
            motivation: request.motivation,
            daily_goal: request.daily_goal,
        })
    } else {
        None
    };

    tx.commit().await?;

    tracing::info!(email = %request.email, "Registered new user");

    let user = User {
        id: user_id,
        email: request.email,
        password_hash,
        is_active: true,
        is_verified: false,
        is_staff: false,
        created_at,
    };
    let creds = issue_token_pair(&state.config.auth, &user, false)?;

    Ok(ApiResponse::created(RegisterResponse {
        user: RegisteredUser {
            user: UserResponse::from(user),
            profile,
        },
        creds,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// POST /api/auth/login/
///
/// Tokens are returned even for unverified users; `is_verified` lets the
/// client decide what such a session may do.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<ApiResponse<LoginData>, ApiError> {
    let user = User::find_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    if !user.is_active || !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let data = issue_token_pair(&state.config.auth, &user, request.remember_me)?;
    Ok(ApiResponse::ok(data))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// POST /api/auth/token/refresh/
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> Result<ApiResponse<RefreshResponse>, ApiError> {
    let claims = decode_token(&state.config.auth, &request.refresh)?;
    if claims.token_type != "refresh" {
        return Err(ApiError::unauthorized("Token is invalid or expired"));
    }

    let access = issue_token(
        &state.config.auth,
        &claims.sub,
        &claims.email,
        "access",
        Duration::minutes(state.config.auth.access_token_minutes),
    )?;
    Ok(ApiResponse::ok(RefreshResponse { access }))
}

#[derive(Debug, Deserialize)]
pub struct HasProfileRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HasProfileResponse {
    pub exists: bool,
}

/// POST /api/auth/has-profile/
pub async fn has_profile(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<HasProfileRequest>,
) -> Result<ApiResponse<HasProfileResponse>, ApiError> {
    let email = request
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::validation("Email is required"))?;

    let exists = User::find_by_email(&state.db, &email).await?.is_some();
    Ok(ApiResponse::ok(HasProfileResponse { exists }))
}

/// The authenticated user, extracted from a bearer access token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Authentication credentials were not provided"))?;

        let claims = decode_token(&state.config.auth, token)?;
        if claims.token_type != "access" {
            return Err(ApiError::unauthorized("Token is invalid or expired"));
        }

        let user = User::find_by_id(&state.db, &claims.sub)
            .await?
            .filter(|u| u.is_active)
            .ok_or_else(|| ApiError::unauthorized("User not found or inactive"))?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_minutes: 60,
            refresh_token_days: 1,
            remember_me_refresh_days: 30,
        }
    }

    fn test_user() -> User {
        User {
            id: "u-1".to_string(),
            email: "user@example.com".to_string(),
            password_hash: String::new(),
            is_active: true,
            is_verified: false,
            is_staff: false,
            created_at: db::now_rfc3339(),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn test_token_pair_claims() {
        let auth = test_auth_config();
        let user = test_user();
        let pair = issue_token_pair(&auth, &user, false).unwrap();

        let access = decode_token(&auth, &pair.access).unwrap();
        assert_eq!(access.token_type, "access");
        assert_eq!(access.sub, "u-1");
        assert_eq!(access.email, "user@example.com");

        let refresh = decode_token(&auth, &pair.refresh).unwrap();
        assert_eq!(refresh.token_type, "refresh");
    }

    #[test]
    fn test_remember_me_stretches_refresh_only() {
        let auth = test_auth_config();
        let user = test_user();

        let short = issue_token_pair(&auth, &user, false).unwrap();
        let long = issue_token_pair(&auth, &user, true).unwrap();

        let short_claims = decode_token(&auth, &short.refresh).unwrap();
        let long_claims = decode_token(&auth, &long.refresh).unwrap();
        // ~29 extra days on the remember_me refresh token
        assert!(long_claims.exp - short_claims.exp > 28 * 24 * 3600);

        let short_access = decode_token(&auth, &short.access).unwrap();
        let long_access = decode_token(&auth, &long.access).unwrap();
        assert!((long_access.exp - short_access.exp).abs() < 5);
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let auth = test_auth_config();
        let user = test_user();
        let pair = issue_token_pair(&auth, &user, false).unwrap();

        let other = AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..test_auth_config()
        };
        assert!(decode_token(&other, &pair.access).is_err());
    }
}
