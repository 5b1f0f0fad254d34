//! Unified error handling for the HTTP boundary.
//!
//! Wraps [`DomainError`] and maps each kind to a status code and a JSON body.
//! Internal details are logged and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    /// Failure reported by the domain or service layer
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Request could not be decoded
    #[error("Invalid input: {0}")]
    BadRequest(String),

    /// Database failure outside the repository boundary (pool setup, migrations)
    #[cfg(feature = "database")]
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Error response body for HTTP
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(e) => e.code(),
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => domain_status(e),
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            #[cfg(feature = "database")]
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Domain(DomainError::Storage(msg)) => {
                tracing::error!("Storage error: {}", msg);
                "A database error occurred".to_string()
            }
            AppError::Domain(DomainError::HashingFailure(msg)) => {
                tracing::error!("Hashing error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Domain(DomainError::UserNotFound | DomainError::NotFound) => {
                "User not found".to_string()
            }
            AppError::Domain(DomainError::UserAlreadyExists) => "User already exists".to_string(),
            AppError::Domain(e) => e.to_string(),
            AppError::BadRequest(msg) => msg.clone(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
        }
    }
}

fn domain_status(err: &DomainError) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_duplicate() {
        StatusCode::CONFLICT
    } else if err.is_invalid_input() {
        StatusCode::BAD_REQUEST
    } else {
        match err {
            DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DomainError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::NotFound, StatusCode::NOT_FOUND),
            (DomainError::UserNotFound, StatusCode::NOT_FOUND),
            (DomainError::UserAlreadyExists, StatusCode::CONFLICT),
            (DomainError::DuplicateEmail, StatusCode::CONFLICT),
            (DomainError::DuplicateId, StatusCode::CONFLICT),
            (DomainError::InvalidEmail, StatusCode::BAD_REQUEST),
            (DomainError::InvalidUpdateInput, StatusCode::BAD_REQUEST),
            (DomainError::invalid_input("check"), StatusCode::BAD_REQUEST),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Cancelled, StatusCode::GATEWAY_TIMEOUT),
            (DomainError::storage("boom"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::hashing("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err.clone()).status(), expected, "{err:?}");
        }
    }

    #[test]
    fn test_code_uses_domain_code() {
        assert_eq!(AppError::from(DomainError::DuplicateEmail).code(), "E012");
        assert_eq!(AppError::bad_request("x").code(), "BAD_REQUEST");
    }

    #[test]
    fn test_storage_details_hidden() {
        let err = AppError::from(DomainError::storage("password=secret host=db"));
        assert_eq!(err.user_message(), "A database error occurred");
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_database_error_hidden() {
        let err = AppError::from(sea_orm::DbErr::Custom(
            "relation \"users\" does not exist".into(),
        ));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert_eq!(err.user_message(), "A database error occurred");
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = AppError::from(DomainError::InvalidName).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "E002");
        assert_eq!(body.error.message, "invalid name");
    }
}
