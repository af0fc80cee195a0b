//! Error taxonomy shared by every storefront layer.
//!
//! Client-facing failures ([`Error::InvalidInput`], [`Error::NotFound`]) are
//! raised as-is. Storage and database failures are raised by the lower layers
//! and folded into [`Error::Internal`] by the product service once the open
//! transaction has been rolled back.

use std::fmt;
use std::path::PathBuf;

/// Boxed error used to carry an underlying cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Common error type for storefront.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or missing input (bad price, no images, bad file name).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "product").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Writing an uploaded file to local storage failed.
    #[error("Failed to write file {}: {source}", path.display())]
    StorageWrite {
        /// Destination the write was aimed at.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        #[source]
        source: BoxError,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other unexpected failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Short description of the operation that failed.
        message: String,
        /// The original cause, kept for diagnostics.
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a new StorageWrite error.
    pub fn storage_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a new Database error from a message or an underlying error.
    pub fn database(source: impl Into<BoxError>) -> Self {
        Self::Database {
            source: source.into(),
        }
    }

    /// Create a new Internal error without an underlying cause.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal {
            message: msg.into(),
            source: None,
        }
    }

    /// Wrap `cause` as an Internal error, keeping it as the error source.
    pub fn internal_from(msg: impl Into<String>, cause: impl Into<BoxError>) -> Self {
        Self::Internal {
            message: msg.into(),
            source: Some(cause.into()),
        }
    }

    /// Whether this error is the caller's fault and should not be retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::NotFound { .. })
    }

    /// Map this error to an HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound { .. } => 404,
            Self::StorageWrite { .. } => 500,
            Self::Database { .. } => 500,
            Self::Io(_) => 500,
            Self::Internal { .. } => 500,
        }
    }

    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound { .. } => "not_found",
            Self::StorageWrite { .. } => "storage_write_failure",
            Self::Database { .. } => "database_error",
            Self::Io(_) => "io_error",
            Self::Internal { .. } => "internal_failure",
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
