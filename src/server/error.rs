//! HTTP error responses
//!
//! Every failure leaves a handler as an `ApiError`, rendered as
//! `{"error": "<message>", "code": "<code>"}` with the matching status.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;
use thiserror::Error;

use crate::data::error::StorageError;
use crate::entity::EntityKind;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body absent, not JSON, or of the wrong shape.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{0} not found")]
    NotFound(EntityKind),

    #[error("no {} found", .0.plural())]
    EmptyCollection(EntityKind),

    #[error("{0} is already in favorites")]
    AlreadyFavorited(EntityKind),

    #[error("email is already registered")]
    EmailTaken,

    #[error("could not hash password")]
    PasswordHash,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::MissingField(_)
            | ApiError::AlreadyFavorited(_)
            | ApiError::EmailTaken
            | ApiError::Storage(StorageError::UniqueViolation(_)) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::EmptyCollection(_) => StatusCode::NOT_FOUND,
            ApiError::PasswordHash | ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for clients to branch on.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::MissingField(_) => "missing_field",
            ApiError::NotFound(_) | ApiError::EmptyCollection(_) => "not_found",
            ApiError::AlreadyFavorited(_) => "already_favorited",
            ApiError::EmailTaken => "email_taken",
            ApiError::PasswordHash => "internal_error",
            ApiError::Storage(StorageError::UniqueViolation(_)) => "conflict",
            ApiError::Storage(_) => "storage_error",
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {self}");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::MissingField("user_id").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound(EntityKind::Planet).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::AlreadyFavorited(EntityKind::Planet).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Storage(StorageError::NotConnected).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Storage(StorageError::UniqueViolation("email".to_string())).code(),
            "conflict"
        );
    }

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(
            ApiError::NotFound(EntityKind::User).to_string(),
            "User not found"
        );
        assert_eq!(
            ApiError::EmptyCollection(EntityKind::Person).to_string(),
            "no people found"
        );
        assert_eq!(
            ApiError::AlreadyFavorited(EntityKind::Person).to_string(),
            "Person is already in favorites"
        );
    }
}
