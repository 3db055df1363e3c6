//! Application error types

use serde::Serialize;
use thiserror::Error;

/// Failure of a single backend call.
///
/// The backend contract only ever exposes a message string to the user, so
/// every variant carries one and [`ApiError::message`] returns it unchanged.
/// The variant records *why* the call failed for code that needs to branch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused,
    /// DNS failure, malformed header or URL).
    #[error("{message}")]
    Transport { message: String },

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Application { status: u16, message: String },

    /// The backend answered successfully but the body could not be decoded.
    #[error("{message}")]
    Decode {
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
        }
    }

    pub fn application(status: u16, message: impl Into<String>) -> Self {
        ApiError::Application {
            status,
            message: message.into(),
        }
    }

    pub fn decode(status: Option<u16>, message: impl Into<String>) -> Self {
        ApiError::Decode {
            status,
            message: message.into(),
        }
    }

    /// Human-readable message, suitable for inline display.
    pub fn message(&self) -> &str {
        match self {
            ApiError::Transport { message }
            | ApiError::Application { message, .. }
            | ApiError::Decode { message, .. } => message,
        }
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { .. } => None,
            ApiError::Application { status, .. } => Some(*status),
            ApiError::Decode { status, .. } => *status,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }

    pub fn is_application(&self) -> bool {
        matches!(self, ApiError::Application { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, ApiError::Decode { .. })
    }
}

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message without the category prefix, for display next to a form or panel.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) => e.message().to_string(),
            AppError::Auth(m)
            | AppError::Validation(m)
            | AppError::NotFound(m)
            | AppError::Config(m)
            | AppError::Internal(m) => m.clone(),
            other => other.to_string(),
        }
    }
}

/// Serializable error record embedded in view state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        let code = match err {
            ApiError::Transport { .. } => "TRANSPORT_ERROR",
            ApiError::Application { .. } => "APPLICATION_ERROR",
            ApiError::Decode { .. } => "DECODE_ERROR",
        };
        ErrorResponse::new(code, err.message())
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let code = match err {
            AppError::Api(e) => return ErrorResponse::from(e),
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Auth(_) => "AUTH_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        };

        ErrorResponse::new(code, err.user_message())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Result of a backend call
pub type ApiResult<T> = std::result::Result<T, ApiError>;
