//! Error taxonomy for the authentication core
//!
//! Every failure the core returns is one of these kinds. Storage adapters
//! report [`StoreError`], which the services translate before returning so
//! that driver messages never reach callers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// A single failing input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors returned by the authentication core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed input, one entry per offending field
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Email already registered
    #[error("email is already registered")]
    Conflict,

    /// Unknown resource. Sign-in also uses this for a wrong password.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Token failed its integrity check, was malformed or was absent
    #[error("invalid session token")]
    InvalidToken,

    /// Token is authentic but past its expiry
    #[error("session token has expired")]
    ExpiredToken,

    /// No valid session was presented
    #[error("authentication required")]
    Unauthenticated,

    /// Authenticated, but not the owner of the resource
    #[error("access to this resource is forbidden")]
    Forbidden,

    /// The storage collaborator failed or missed its deadline
    #[error("storage is temporarily unavailable")]
    StorageUnavailable,

    /// Hashing was asked to process an empty password
    #[error("password must not be empty")]
    InvalidInput,

    /// Stored hash is not a recognised encoding
    #[error("stored password hash is not recognised")]
    CorruptHash,

    /// Hashing or signing backend failure
    #[error("internal error: {0}")]
    Internal(String),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AuthError {
    /// Stable machine-readable code for the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::Conflict => "conflict",
            AuthError::NotFound(_) => "not_found",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden => "forbidden",
            AuthError::StorageUnavailable => "storage_unavailable",
            AuthError::InvalidInput => "invalid_input",
            AuthError::CorruptHash => "corrupt_hash",
            AuthError::Internal(_) => "internal",
        }
    }

    /// HTTP status the transport layer should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) | AuthError::InvalidInput => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthError::InvalidToken | AuthError::ExpiredToken | AuthError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::StorageUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::CorruptHash | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Fields that failed validation, empty for every other kind
    pub fn fields(&self) -> &[FieldError] {
        match self {
            AuthError::Validation(fields) => fields,
            _ => &[],
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AuthError::CorruptHash | AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let mut body = json!({
            "error": self.kind(),
            "message": message,
        });
        if let AuthError::Validation(fields) = &self {
            body["fields"] = json!(fields);
        }

        (status, Json(body)).into_response()
    }
}

/// Errors reported by storage adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness rule rejected the write
    #[error("record already exists")]
    Conflict,

    /// The backend could not complete the operation
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<common::error::DatabaseError> for StoreError {
    fn from(err: common::error::DatabaseError) -> Self {
        match err {
            common::error::DatabaseError::UniqueViolation { .. } => StoreError::Conflict,
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Type alias for results of the authentication core
pub type AuthResult<T> = Result<T, AuthError>;
