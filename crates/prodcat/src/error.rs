//! Error types for prodcat.
//!
//! Business-rule violations (duplicate code, unknown id) and infrastructure
//! failures (file I/O, JSON parsing, configuration) share one error type so
//! every catalog operation reports failures the same way.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for prodcat operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Catalog Errors ===
    /// A product with the same business key already exists.
    #[error("product code already exists: {code}")]
    DuplicateCode {
        /// The conflicting product code.
        code: String,
    },

    /// No product has the requested id.
    #[error("product not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: u64,
    },

    /// A product field holds a value that cannot be stored.
    #[error("invalid product: {message}")]
    InvalidProduct {
        /// Description of the rejected value.
        message: String,
    },

    /// Every product id has been handed out.
    #[error("no product ids left to assign")]
    IdsExhausted,

    // === Storage Errors ===
    /// Reading or writing the products file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path to the products file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The products file does not contain a valid JSON product array.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path to the products file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The product collection could not be encoded as JSON.
    #[error("failed to serialize products: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not bind or stopped unexpectedly.
    #[error("server error: {0}")]
    Server(#[source] std::io::Error),
}

/// A specialized Result type for prodcat operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate code error.
    #[must_use]
    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::DuplicateCode { code: code.into() }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: u64) -> Self {
        Self::NotFound { id }
    }

    /// Create an invalid product error.
    #[must_use]
    pub fn invalid_product(message: impl Into<String>) -> Self {
        Self::InvalidProduct {
            message: message.into(),
        }
    }

    /// Create an I/O error for the given file.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error means the product does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a business key conflict.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateCode { .. })
    }

    /// Check if this error rejects the product's contents.
    #[must_use]
    pub fn is_invalid_product(&self) -> bool {
        matches!(self, Self::InvalidProduct { .. })
    }

    /// Check if this error came from reading or writing the products file.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::Parse { .. } | Self::Serialize(_) | Self::DirectoryCreate { .. }
        )
    }
}
