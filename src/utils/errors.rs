//! Error handling for AsanaBuddy
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for AsanaBuddy application
#[derive(Error, Debug)]
pub enum AsanaBuddyError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Catalog store error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Usage store request to /{table} failed: HTTP {status}")]
    UsageStore { table: &'static str, status: u16 },

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Catalog REST store specific errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog request timed out")]
    Timeout,

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for AsanaBuddy operations
pub type Result<T> = std::result::Result<T, AsanaBuddyError>;

impl AsanaBuddyError {
    /// Check if the error is recoverable by retrying the user action
    pub fn is_recoverable(&self) -> bool {
        match self {
            AsanaBuddyError::Telegram(_) => true,
            AsanaBuddyError::Catalog(_) => true,
            AsanaBuddyError::Http(_) => true,
            AsanaBuddyError::UsageStore { .. } => true,
            AsanaBuddyError::Config(_) => false,
            AsanaBuddyError::UrlParse(_) => false,
            AsanaBuddyError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AsanaBuddyError::Config(_) => ErrorSeverity::Critical,
            AsanaBuddyError::Catalog(CatalogError::Timeout) => ErrorSeverity::Warning,
            AsanaBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            AsanaBuddyError::UsageStore { .. } => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
