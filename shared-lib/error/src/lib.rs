//! Common error types for the token function.
//!
//! Every error a request can hit maps to the HTTP status code the caller sees.
//! Responses for errors never carry a body.

use thiserror::Error;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Unsupported content type: {0}")]
    UnsupportedMediaType(String),

    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status code reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Auth(err) => err.status_code(),
            AppError::UnsupportedMediaType(_) => 415,
            AppError::InvalidJson(_) => 422,
            AppError::MalformedEvent(_) => 400,
            AppError::Internal(_) => 500,
        }
    }
}

/// Authentication-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing or malformed bearer credentials")]
    MissingBearer,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token creation failed")]
    TokenCreationFailed,
}

impl AuthError {
    /// HTTP status code reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingBearer => 403,
            AuthError::InvalidToken | AuthError::TokenExpired | AuthError::TokenNotYetValid => 401,
            AuthError::TokenCreationFailed => 500,
        }
    }
}

/// Configuration errors. These are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Signing secret is not set ({0})")]
    MissingSecret(&'static str),

    #[error("Validity window is empty: not-before {not_before_secs}s must be earlier than expiry {expires_in_secs}s")]
    EmptyValidityWindow {
        not_before_secs: i64,
        expires_in_secs: i64,
    },

    #[error("Validity window out of range: offsets must be within 0..={max_secs}s, got not-before {not_before_secs}s and expiry {expires_in_secs}s")]
    WindowOutOfRange {
        not_before_secs: i64,
        expires_in_secs: i64,
        max_secs: i64,
    },

    #[error("Unknown token data encoding: {0}")]
    UnknownDataEncoding(String),
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
