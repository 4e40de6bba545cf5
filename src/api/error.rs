//! Unified API error handling.
//!
//! Every failure leaving the API is rendered as the standard envelope
//! `{"data": null, "error": "<message>", "code": <status>}` with a single
//! flat string message. Field-level validation errors are flattened to
//! `"field: message"` pairs joined by `". "`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::envelope::Envelope;

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Validation or business-rule failure (400)
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Bad request (400)
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Authentication failure (401)
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Missing resource (404)
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error (500)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Envelope::<()>::error(self.status, self.message);
        (self.status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {}", err);

        match &err {
            sqlx::Error::RowNotFound => ApiError::not_found("Resource not found"),
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed") {
                    ApiError::validation("A resource with this identifier already exists")
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    ApiError::bad_request("Referenced resource does not exist")
                } else {
                    ApiError::internal("A database error occurred")
                }
            }
            _ => ApiError::internal("A database error occurred"),
        }
    }
}

/// Collects field-level validation errors and flattens them into one string.
///
/// `{"password": ["Too short", "Too simple"], "email": ["Invalid format"]}`
/// becomes `"password: Too short. password: Too simple. email: Invalid format"`.
#[derive(Debug, Default)]
pub struct ValidationErrorBuilder {
    errors: Vec<(String, String)>,
}

impl ValidationErrorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors.push((field.into(), message.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn build(self) -> Option<ApiError> {
        if self.errors.is_empty() {
            None
        } else {
            let message = self
                .errors
                .iter()
                .map(|(field, msg)| format!("{}: {}", field, msg))
                .collect::<Vec<_>>()
                .join(". ");
            Some(ApiError::validation(message))
        }
    }

    /// Ok(()) when no errors were collected, Err(ApiError) otherwise.
    pub fn finish(self) -> Result<(), ApiError> {
        match self.build() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_statuses() {
        assert_eq!(
            ApiError::validation("nope").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("nope").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_builder_flattens_in_order() {
        let mut builder = ValidationErrorBuilder::new();
        builder.add("password", "Too short");
        builder.add("password", "Too simple");
        builder.add("email", "Invalid format");

        let err = builder.build().unwrap();
        assert_eq!(
            err.message(),
            "password: Too short. password: Too simple. email: Invalid format"
        );
    }

    #[test]
    fn test_empty_builder_finishes_ok() {
        assert!(ValidationErrorBuilder::new().finish().is_ok());
    }

}
