// HTTP error types for the page-rendering handlers
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use std::collections::BTreeMap;

use crate::auth::{OidcError, SessionError};
use crate::database::DatabaseError;
use crate::directory::DirectoryError;
use crate::pages;

/// Route that renders the not-found page
pub const NOT_FOUND_PATH: &str = "/404";

/// Field name -> message for rejected form submissions
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Request failure with its user-facing outcome
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        field_errors: FieldErrors,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found, also used for resources the caller does not own
    NotFound(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 502 Bad Gateway (identity provider or directory failures)
    BadGateway(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::BadGateway(msg) => msg,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn validation_error(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            field_errors,
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        ApiError::BadGateway(message.into())
    }
}

// Convert other error types to ApiError
impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        // Log the real error but return generic message
        tracing::error!(error = %err, "Database error");
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        tracing::error!(error = %err, "Directory lookup failed");
        ApiError::bad_gateway("The user directory is unavailable")
    }
}

impl From<OidcError> for ApiError {
    fn from(err: OidcError) -> Self {
        tracing::error!(error = %err, "Identity provider error");
        ApiError::bad_gateway("The identity provider is unavailable")
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidToken(_) => {
                tracing::warn!(error = %err, "Rejected login state");
                ApiError::unauthorized("Login could not be completed")
            }
            _ => {
                tracing::error!(error = %err, "Session signing failed");
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Not-found and unhandled server errors both land on the /404 page; the
// original path never answers with the error status itself.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(_) | ApiError::InternalServerError(_) => {
                Redirect::to(NOT_FOUND_PATH).into_response()
            }
            ApiError::ValidationError { message, field_errors } => {
                let body = pages::error_page(StatusCode::BAD_REQUEST, &message, &field_errors);
                (StatusCode::BAD_REQUEST, Html(body)).into_response()
            }
            other => {
                let status = other.status_code();
                let body = pages::error_page(status, other.message(), &FieldErrors::new());
                (status, Html(body)).into_response()
            }
        }
    }
}
