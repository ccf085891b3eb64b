//! Error types and result aliases for gallery operations.
//!
//! Provides a unified error type that covers every failure the client can
//! surface, from caller input validation through transport failures to
//! configuration problems, with actionable error messages.

use std::fmt;
use thiserror::Error;

/// Classification of a request that never produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkFailureKind {
    /// The request did not complete within its timeout
    Timeout,
    /// The connection could not be established (refused, DNS, TLS)
    Connect,
    /// Any other failure before a response arrived
    Other,
}

impl fmt::Display for NetworkFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkFailureKind::Timeout => "timeout",
            NetworkFailureKind::Connect => "connection failed",
            NetworkFailureKind::Other => "network error",
        };
        f.write_str(label)
    }
}

/// A request that failed without receiving any response.
///
/// This is the only failure the request pipeline retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct NetworkFailure {
    pub kind: NetworkFailureKind,
    pub message: String,
}

impl NetworkFailure {
    pub fn new(kind: NetworkFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(NetworkFailureKind::Timeout, message)
    }

    pub fn connect(message: impl Into<String>) -> Self {
        Self::new(NetworkFailureKind::Connect, message)
    }
}

/// Client-facing operation names used as stable error prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchArtworks,
    SearchArtworks,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::FetchArtworks => f.write_str("fetch artworks"),
            Operation::SearchArtworks => f.write_str("search artworks"),
        }
    }
}

/// Unified error type for all gallery operations
#[derive(Error, Debug)]
pub enum GalleryError {
    // Caller input errors
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    // Transport errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Request failed after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: NetworkFailure,
    },

    #[error("Request failed with status code {status}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid response payload: {message}")]
    InvalidResponse { message: String },

    // Cache errors
    #[error("Cached payload is malformed: {message}")]
    Cache { message: String },

    // Config errors
    #[error("Failed to parse gallery.toml: {message}")]
    TomlParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    // Client-facing wrapper
    #[error("Failed to {operation}: {source}")]
    Operation {
        operation: Operation,
        #[source]
        source: Box<GalleryError>,
    },
}

/// Result type alias for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;

impl GalleryError {
    /// Create a validation error for a named parameter
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Wrap this error with a client-facing operation prefix
    pub fn within(self, operation: Operation) -> Self {
        Self::Operation {
            operation,
            source: Box::new(self),
        }
    }

    /// The innermost gallery error, looking through operation wrappers
    pub fn root_cause(&self) -> &GalleryError {
        match self {
            GalleryError::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Whether this failure was raised by input validation, before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(self.root_cause(), GalleryError::Validation { .. })
    }

    /// Check if this error is recoverable by trying again later
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.root_cause(),
            GalleryError::Network { .. }
                | GalleryError::RetryExhausted { .. }
                | GalleryError::Io { .. }
        )
    }

    /// HTTP status carried by this error, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self.root_cause() {
            GalleryError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.root_cause() {
            GalleryError::Validation { .. } => {
                Some(concat!(
                    "Pages start at 1, limits must be between 1 and 100, ",
                    "and searches need a query"
                ))
            }
            GalleryError::Network { .. } | GalleryError::RetryExhausted { .. } => {
                Some("Check your internet connection and try again")
            }
            GalleryError::HttpStatus { status: 404, .. } => {
                Some("Check the configured base_url points at the artworks API")
            }
            GalleryError::HttpStatus { status: 429, .. } => {
                Some("The API is rate limiting requests; wait a moment before retrying")
            }
            GalleryError::HttpStatus { status, .. } if *status >= 500 => {
                Some("The artworks API is having trouble; try again later")
            }
            GalleryError::ConfigValidation { .. } | GalleryError::TomlParse { .. } => {
                Some("Fix gallery.toml or the GALLERY_* environment overrides")
            }
            _ => None,
        }
    }
}
