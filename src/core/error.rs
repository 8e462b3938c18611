//! Typed error handling for the invoice actions
//!
//! Every failure that can leave an action (or the HTTP boundary around it)
//! is one of the variants below, so callers can match on the category rather
//! than inspect strings.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: the submitted form does not satisfy the invoice rules
//! - [`StoreError`]: the relational store rejected or never received a statement
//! - [`AuthFailure`]: the identity provider failed in a way the sign-in action
//!   does not recognize
//! - [`RequestError`]: the HTTP request itself is malformed (bad id, body
//!   that is not a form)
//!
//! [`ConfigError`] lives here too but is raised by configuration loading,
//! which reports through `anyhow` rather than through an action.
//!
//! # Example
//!
//! ```rust,ignore
//! match actions.create_invoice(form).await {
//!     Ok(outcome) => boundary.apply(outcome).await,
//!     Err(ActionError::Validation(ValidationError::FieldErrors(errors))) => {
//!         println!("first problem: {:?}", errors.first());
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

use crate::core::auth::AuthFailure;
use crate::core::store::StoreError;
use crate::core::validation::FieldErrors;

/// The main error type for the actions and their HTTP boundary
#[derive(Debug)]
pub enum ActionError {
    /// Form validation errors
    Validation(ValidationError),

    /// Store errors
    Storage(StoreError),

    /// Identity provider failures that were not recognized
    Auth(AuthFailure),

    /// HTTP/Request errors
    Request(RequestError),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Validation(e) => write!(f, "{}", e),
            ActionError::Storage(e) => write!(f, "{}", e),
            ActionError::Auth(e) => write!(f, "{}", e),
            ActionError::Request(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActionError::Validation(e) => Some(e),
            ActionError::Storage(e) => Some(e),
            ActionError::Auth(e) => Some(e),
            ActionError::Request(e) => Some(e),
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ActionError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ActionError::Request(e) => e.status_code(),
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ActionError::Validation(_) => "VALIDATION_ERROR",
            ActionError::Storage(_) => "STORAGE_ERROR",
            ActionError::Auth(_) => "AUTH_ERROR",
            ActionError::Request(e) => e.error_code(),
        }
    }

    /// Convert to an error response
    ///
    /// Store and auth failures are reported by category only; their
    /// underlying cause stays in the logs.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            ActionError::Storage(_) => "database error".to_string(),
            ActionError::Auth(_) => "something went wrong".to_string(),
            other => other.to_string(),
        };
        ErrorResponse {
            code: self.error_code().to_string(),
            message,
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ActionError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ActionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        ActionError::Storage(err)
    }
}

impl From<AuthFailure> for ActionError {
    fn from(err: AuthFailure) -> Self {
        ActionError::Auth(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to form validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more fields failed their rules
    FieldErrors(FieldErrors),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        ActionError::Validation(err)
    }
}

impl From<FieldErrors> for ActionError {
    fn from(errors: FieldErrors) -> Self {
        ActionError::Validation(ValidationError::FieldErrors(errors))
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    FileNotFound { path: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::FileNotFound { path } => {
                write!(f, "Configuration file not found: {}", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP request processing
#[derive(Debug)]
pub enum RequestError {
    /// The path identifier is not a valid invoice id
    InvalidId { value: String },

    /// The request body is not a usable form
    InvalidBody { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidId { value } => {
                write!(f, "Invalid invoice id: {}", value)
            }
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidId { .. } => "INVALID_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
        }
    }
}

impl From<RequestError> for ActionError {
    fn from(err: RequestError) -> Self {
        ActionError::Request(err)
    }
}
