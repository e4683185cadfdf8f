//!
//! # Error Handling
//!
//! `AppError` is the single failure type of the service. Every request handler,
//! store operation and auth helper returns it, and it implements
//! `actix_web::error::ResponseError` so a handler can simply propagate it with `?`.
//!
//! Responses always carry a JSON body with a human-readable `message`. Input
//! errors additionally carry an `errors` object with field-level detail.
//! Internal errors are logged in full and answered with a generic message.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for every duplicate registration, whichever constraint fired.
pub const CONFLICT_MESSAGE: &str = "User already exists";

const INTERNAL_MESSAGE: &str = "Internal server error";

/// All failures a request can end in.
#[derive(Debug)]
pub enum AppError {
    /// Schema or shape violation (HTTP 400).
    /// `errors` holds field-level detail when it is available.
    InvalidInput {
        message: String,
        errors: Option<serde_json::Value>,
    },
    /// A user with the same email already exists (HTTP 400).
    Conflict(String),
    /// Missing, malformed or expired session, or rejected credentials (HTTP 401).
    Unauthorized(String),
    /// The session subject no longer resolves to a user (HTTP 404).
    NotFound(String),
    /// Store, hashing or signing failure (HTTP 500).
    /// The detail is logged and never sent to the client.
    Internal(String),
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            message: message.into(),
            errors: None,
        }
    }

    pub fn conflict() -> Self {
        AppError::Conflict(CONFLICT_MESSAGE.into())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::InvalidInput { message, .. } => write!(f, "Invalid input: {}", message),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput { .. } | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::InvalidInput {
                message,
                errors: Some(errors),
            } => json!({ "message": message, "errors": errors }),
            AppError::InvalidInput { message, .. } => json!({ "message": message }),
            AppError::Conflict(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                json!({ "message": msg })
            }
            AppError::Internal(detail) => {
                log::error!("internal error: {}", detail);
                json!({ "message": INTERNAL_MESSAGE })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Maps `sqlx` failures onto the taxonomy.
///
/// A unique violation (`23505`) can only come from the email constraint, so it
/// becomes the same `Conflict` the registration pre-check reports. A foreign key
/// violation (`23503`) means the owning user row is gone.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("User not found".into()),
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                Some("23505") => AppError::conflict(),
                Some("23503") => AppError::NotFound("User not found".into()),
                _ => AppError::Internal(format!("database error: {}", error)),
            },
            _ => AppError::Internal(format!("database error: {}", error)),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        AppError::InvalidInput {
            message: "Invalid input data".into(),
            errors: serde_json::to_value(&errors).ok(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("session token rejected: {}", error);
        AppError::Unauthorized("Unauthorized".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("password hashing failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(error: AppError) -> serde_json::Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(AppError::invalid_input("bad").status_code(), 400);
        assert_eq!(AppError::conflict().status_code(), 400);
        assert_eq!(AppError::Unauthorized("no".into()).status_code(), 401);
        assert_eq!(AppError::NotFound("gone".into()).status_code(), 404);
        assert_eq!(AppError::Internal("boom".into()).status_code(), 500);
    }

    #[actix_rt::test]
    async fn test_internal_detail_is_not_leaked() {
        let json = body_json(AppError::Internal("connection refused on 10.0.0.3".into())).await;
        assert_eq!(json["message"], INTERNAL_MESSAGE);
        assert!(json.get("errors").is_none());
    }

    #[actix_rt::test]
    async fn test_invalid_input_carries_errors() {
        let error = AppError::InvalidInput {
            message: "Invalid input data".into(),
            errors: Some(json!({ "email": ["email"] })),
        };
        let json = body_json(error).await;
        assert_eq!(json["message"], "Invalid input data");
        assert!(json["errors"]["email"].is_array());
    }

    #[actix_rt::test]
    async fn test_conflict_message_is_generic() {
        let json = body_json(AppError::conflict()).await;
        assert_eq!(json["message"], CONFLICT_MESSAGE);
    }
}
