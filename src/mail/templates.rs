//! Localized OTP email templates.

use crate::db::OtpPurpose;
use crate::i18n::Lang;

/// Subject and plain-text body for an OTP email.
pub fn otp_email(purpose: OtpPurpose, code: &str, lang: Lang) -> (String, String) {
    let subject = match (purpose, lang) {
        (OtpPurpose::Verify, Lang::En) => "SteamUp - Your OTP for email verification",
        (OtpPurpose::Verify, Lang::Uz) => "SteamUp - Elektron pochtani tasdiqlash uchun bir martalik kod",
        (OtpPurpose::Verify, Lang::Ru) => "SteamUp - Одноразовый код для подтверждения почты",
        (OtpPurpose::Reset, Lang::En) => "SteamUp - Your OTP for password reset",
        (OtpPurpose::Reset, Lang::Uz) => "SteamUp - Parolni tiklash uchun bir martalik kod",
        (OtpPurpose::Reset, Lang::Ru) => "SteamUp - Одноразовый код для сброса пароля",
    };

    let body = match (purpose, lang) {
        (OtpPurpose::Verify, Lang::En) => format!(
            "Hello,\n\n\
             Your one-time password (OTP) for email verification is: {code}\n\n\
             This OTP will expire in 5 minutes.\n\n\
             Best regards,\n\
             The SteamUp Team"
        ),
        (OtpPurpose::Reset, Lang::En) => format!(
            "Hello,\n\n\
             Your one-time password (OTP) for password reset is: {code}\n\n\
             This OTP will expire in 5 minutes.\n\n\
             Best regards,\n\
             The SteamUp Team"
        ),
        (OtpPurpose::Verify, Lang::Uz) => format!(
            "Assalomu alaykum,\n\n\
             Elektron pochtangizni tasdiqlash uchun bir martalik kod: {code}\n\n\
             Kod 5 daqiqadan so'ng eskiradi.\n\n\
             Hurmat bilan,\n\
             SteamUp jamoasi"
        ),
        (OtpPurpose::Reset, Lang::Uz) => format!(
            "Assalomu alaykum,\n\n\
             Parolni tiklash uchun bir martalik kod: {code}\n\n\
             Kod 5 daqiqadan so'ng eskiradi.\n\n\
             Hurmat bilan,\n\
             SteamUp jamoasi"
        ),
        (OtpPurpose::Verify, Lang::Ru) => format!(
            "Здравствуйте,\n\n\
             Ваш одноразовый код для подтверждения почты: {code}\n\n\
             Код действителен 5 минут.\n\n\
             С уважением,\n\
             Команда SteamUp"
        ),
        (OtpPurpose::Reset, Lang::Ru) => format!(
            "Здравствуйте,\n\n\
             Ваш одноразовый код для сброса пароля: {code}\n\n\
             Код действителен 5 минут.\n\n\
             С уважением,\n\
             Команда SteamUp"
        ),
    };

    (subject.to_string(), body)
}
