//! One-time codes for email verification and password reset.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Seconds a user must wait between OTP requests for the same purpose.
pub const OTP_THROTTLE_SECONDS: i64 = 60;

/// Minutes before an issued code expires.
pub const OTP_EXPIRY_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OtpPurpose {
    Verify,
    Reset,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::Verify => "verify",
            OtpPurpose::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OtpCode {
    pub id: String,
    pub user_id: String,
    pub code: String,
    pub purpose: String,
    pub is_used: bool,
    pub created_at: String,
}

impl OtpCode {
    /// Most recent unused code for a (user, purpose) pair, regardless of age.
    /// Issuance uses this for the throttle window.
    pub async fn latest_unused(
        pool: &crate::db::DbPool,
        user_id: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpCode>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM otp_codes
             WHERE user_id = ? AND purpose = ? AND is_used = 0
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(purpose.as_str())
        .fetch_optional(pool)
        .await
    }

    /// Most recent unused row matching an exact code. Verification applies
    /// the expiry window on top of this.
    pub async fn latest_matching(
        pool: &crate::db::DbPool,
        user_id: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpCode>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM otp_codes
             WHERE user_id = ? AND code = ? AND purpose = ? AND is_used = 0
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(code)
        .bind(purpose.as_str())
        .fetch_optional(pool)
        .await
    }
}

/// Generate a 6-digit code, each digit independently uniform over 0-9.
/// Leading zeros are allowed, so the result is kept as a string.
pub fn generate_otp_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..6).map(|_| rng.random_range(0..10u8).to_string()).collect()
}
