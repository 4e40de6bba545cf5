//! OTP issuance, verification and the password-reset flow.

use axum::extract::State;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::auth::hash_password;
use crate::api::envelope::{ApiJson, ApiResponse};
use crate::api::error::ApiError;
use crate::api::validation::validate_password;
use crate::db::{
    self, generate_otp_code, OtpCode, OtpPurpose, User, OTP_EXPIRY_MINUTES, OTP_THROTTLE_SECONDS,
};
use crate::i18n::Lang;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Seconds since the OTP row was created.
fn age_seconds(otp: &OtpCode) -> Result<i64, ApiError> {
    let created_at = db::parse_timestamp(&otp.created_at)
        .map_err(|e| ApiError::internal(format!("Corrupt OTP timestamp: {}", e)))?;
    Ok((Utc::now() - created_at).num_seconds())
}

/// Issue a fresh OTP for (email, purpose), enforcing the 60 second throttle,
/// and email it. The row is persisted before the send, so a failed delivery
/// leaves the code usable.
async fn issue_otp(
    state: &AppState,
    lang: Lang,
    email: &str,
    purpose: OtpPurpose,
) -> Result<String, ApiError> {
    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::validation("User with this email does not exist."))?;

    if let Some(recent) = OtpCode::latest_unused(&state.db, &user.id, purpose).await? {
        let elapsed = age_seconds(&recent)?;
        if elapsed < OTP_THROTTLE_SECONDS {
            return Err(ApiError::validation(format!(
                "Please wait {} seconds before requesting another OTP.",
                OTP_THROTTLE_SECONDS - elapsed
            )));
        }
    }

    let code = generate_otp_code();
    sqlx::query(
        "INSERT INTO otp_codes (id, user_id, code, purpose, is_used, created_at)
         VALUES (?, ?, ?, ?, 0, ?)",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(&user.id)
    .bind(&code)
    .bind(purpose.as_str())
    .bind(db::now_rfc3339())
    .execute(&state.db)
    .await?;

    tracing::info!(email = %user.email, purpose = purpose.as_str(), "Issued OTP");

    state
        .mailer
        .send_otp_email(&user.email, purpose, &code, lang)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, email = %user.email, "Failed to send OTP email");
            ApiError::internal(e.to_string())
        })?;

    Ok(format!("OTP sent to {}", user.email))
}

/// Check (email, code, purpose) against the most recent unused row and
/// consume it. Returns the verified user for callers that need follow-up
/// writes.
async fn verify_code(
    state: &AppState,
    email: &str,
    code: &str,
    purpose: OtpPurpose,
) -> Result<User, ApiError> {
    let user = User::find_by_email(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::validation("User with this email does not exist."))?;

    let otp = OtpCode::latest_matching(&state.db, &user.id, code, purpose)
        .await?
        .ok_or_else(|| ApiError::validation("Invalid or expired OTP code."))?;

    if age_seconds(&otp)? >= OTP_EXPIRY_MINUTES * 60 {
        return Err(ApiError::validation("Invalid or expired OTP code."));
    }

    let mut tx = state.db.begin().await?;
    sqlx::query("UPDATE otp_codes SET is_used = 1 WHERE id = ?")
        .bind(&otp.id)
        .execute(&mut *tx)
        .await?;
    if purpose == OtpPurpose::Verify {
        sqlx::query("UPDATE users SET is_verified = 1 WHERE id = ?")
            .bind(&user.id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(user)
}

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub email: String,
    pub purpose: OtpPurpose,
}

/// POST /api/auth/request-otp/
pub async fn request_otp(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    ApiJson(request): ApiJson<OtpRequest>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let message = issue_otp(&state, lang, &request.email, request.purpose).await?;
    Ok(ApiResponse::ok(MessageResponse { message }))
}

#[derive(Debug, Deserialize)]
pub struct OtpVerificationRequest {
    pub email: String,
    pub code: String,
    pub purpose: OtpPurpose,
}

/// POST /api/auth/verify-otp/
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<OtpVerificationRequest>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    verify_code(&state, &request.email, &request.code, request.purpose).await?;
    let message = match request.purpose {
        OtpPurpose::Verify => "Email verified successfully.",
        OtpPurpose::Reset => "OTP verified successfully.",
    };
    Ok(ApiResponse::ok(MessageResponse {
        message: message.to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/auth/forgot-password/
///
/// Same as request-otp with the purpose pinned to reset.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    lang: Lang,
    ApiJson(request): ApiJson<ForgotPasswordRequest>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    let message = issue_otp(&state, lang, &request.email, OtpPurpose::Reset).await?;
    Ok(ApiResponse::ok(MessageResponse { message }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyResetOtpRequest {
    pub email: String,
    pub code: String,
}

/// POST /api/auth/verify-reset-otp/
pub async fn verify_reset_otp(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<VerifyResetOtpRequest>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    verify_code(&state, &request.email, &request.code, OtpPurpose::Reset).await?;
    Ok(ApiResponse::ok(MessageResponse {
        message: "OTP verified successfully.".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// POST /api/auth/reset-password/
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<PasswordResetRequest>,
) -> Result<ApiResponse<MessageResponse>, ApiError> {
    // Cheap checks come before any database work
    if request.new_password != request.confirm_password {
        return Err(ApiError::validation("Passwords do not match."));
    }
    if let Err(message) = validate_password(&request.new_password) {
        return Err(ApiError::validation(format!("new_password: {}", message)));
    }

    let user = User::find_by_email(&state.db, &request.email)
        .await?
        .ok_or_else(|| ApiError::validation("User with this email does not exist."))?;

    let otp = OtpCode::latest_matching(&state.db, &user.id, &request.code, OtpPurpose::Reset)
        .await?
        .ok_or_else(|| ApiError::validation("Invalid or expired OTP code."))?;
    if age_seconds(&otp)? >= OTP_EXPIRY_MINUTES * 60 {
        return Err(ApiError::validation("Invalid or expired OTP code."));
    }

    let password_hash = hash_password(&request.new_password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    // New password and consumed OTP land together or not at all
    let mut tx = state.db.begin().await?;
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(&password_hash)
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE otp_codes SET is_used = 1 WHERE id = ?")
        .bind(&otp.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(email = %user.email, "Password reset");

    Ok(ApiResponse::ok(MessageResponse {
        message: "Password reset successfully.".to_string(),
    }))
}
