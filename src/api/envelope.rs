//! The standard response envelope.
//!
//! Every endpoint answers `{"data": ..., "error": ..., "code": ...}`. The
//! envelope is constructed explicitly at the handler boundary rather than
//! sniffed out of response bodies after the fact.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub code: u16,
}

impl<T: Serialize> Envelope<T> {
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            code: status.as_u16(),
        }
    }
}

impl Envelope<()> {
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            data: None,
            error: Some(message.into()),
            code: status.as_u16(),
        }
    }
}

/// A successful enveloped response with its HTTP status.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize>(StatusCode, Envelope<T>);

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self(StatusCode::OK, Envelope::success(StatusCode::OK, data))
    }

    pub fn created(data: T) -> Self {
        Self(
            StatusCode::CREATED,
            Envelope::success(StatusCode::CREATED, data),
        )
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

/// `Json` wrapper whose rejection is rendered as a 400 envelope instead of
/// axum's plain-text error.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
