//!
//! # Error Handling
//!
//! `AppError` is the one error type handlers return; `?` converts storage and
//! validation failures into it. Client-caused errors carry their message into
//! the JSON body. Server-side failures are logged and answered with a generic
//! body, so connection strings, SQL and other internals never reach a client.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    /// Authentication failed or was missing (HTTP 401).
    Unauthorized(String),
    /// The request was well-formed but cannot be honored (HTTP 400).
    BadRequest(String),
    /// The resource does not exist for this caller (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Storage-layer failure, wrapping `sqlx` errors (HTTP 500).
    DatabaseError(String),
    /// Field-level input rejection from `validator` (HTTP 422).
    ValidationError(String),
}

impl AppError {
    /// The uniform 401 returned for every token-path failure.
    ///
    /// Missing header, malformed header, tampered/expired token and deleted user
    /// all produce this same response, so a caller cannot tell them apart.
    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized("Could not validate credentials".into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "internal error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "database error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (mut response, body) = match self {
            AppError::Unauthorized(msg) => (HttpResponse::Unauthorized(), msg.clone()),
            AppError::BadRequest(msg) => (HttpResponse::BadRequest(), msg.clone()),
            AppError::NotFound(msg) => (HttpResponse::NotFound(), msg.clone()),
            AppError::ValidationError(msg) => (HttpResponse::UnprocessableEntity(), msg.clone()),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                (
                    HttpResponse::InternalServerError(),
                    "An internal error occurred".to_string(),
                )
            }
        };
        response.json(json!({ "error": body }))
    }
}

/// Returns true when a database error was caused by a unique constraint.
///
/// Handlers that race concurrent inserts on a unique column use this to
/// answer with a client error instead of a 500.
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

/// `RowNotFound` becomes a 404; everything else from the storage layer is a
/// generic 500.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Keeps validator's per-field messages so the client learns which field
/// to fix.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}
