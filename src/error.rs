// src/error.rs
//! Application error types with structured error handling.
//!
//! Every failure here is fatal to the enclosing read or write: there is no
//! retry and no partial-success mode. Field-lookup misses in the JSON
//! scanner are deliberately *not* errors and never show up in this module.

use crate::auth::AuthError;
use crate::types::ValidationError;
use std::fmt;
use thiserror::Error;

/// The `"code"` of a Notion error body, as far as this crate acts on it.
///
/// Only the codes that change what a bind reports get their own variant.
/// Anything else keeps its raw code; a body without one keeps the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    ObjectNotFound,
    Unauthorized,
    RestrictedResource,
    HttpStatus(u16),
    Other(String),
}

impl NotionErrorCode {
    /// Classifies an error response body, falling back to its status.
    pub fn from_error_body(body: &str, status: u16) -> Self {
        match crate::json::find_string(body, "code") {
            Some("object_not_found") => Self::ObjectNotFound,
            Some("unauthorized") => Self::Unauthorized,
            Some("restricted_resource") => Self::RestrictedResource,
            Some(code) if !code.is_empty() => Self::Other(code.to_string()),
            _ => Self::HttpStatus(status),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }

    /// Token rejected, or the database is not shared with the integration.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::RestrictedResource | Self::HttpStatus(401 | 403)
        )
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectNotFound => f.write_str("object_not_found"),
            Self::Unauthorized => f.write_str("unauthorized"),
            Self::RestrictedResource => f.write_str("restricted_resource"),
            Self::HttpStatus(status) => write!(f, "http_{}", status),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No response at all: TLS/connection failure or no parseable status line.
    #[error("{context}: {message}")]
    Transport {
        context: &'static str,
        message: String,
    },

    /// A response arrived with a status outside 200-299.
    #[error("{context}: {body}")]
    Http {
        context: &'static str,
        status: u16,
        code: NotionErrorCode,
        body: String,
    },

    /// The bind-time schema fetch was rejected by the service.
    #[error("Failed to get Notion database schema: {body}")]
    RemoteSchema {
        status: u16,
        code: NotionErrorCode,
        body: String,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl AppError {
    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::RemoteSchema { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Re-labels a failed schema fetch as a bind-time schema error.
    pub fn into_schema_error(self) -> Self {
        match self {
            Self::Http {
                status, code, body, ..
            } => Self::RemoteSchema { status, code, body },
            other => other,
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
