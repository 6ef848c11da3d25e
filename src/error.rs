//! Error types for the compsim library.
//!
//! All fallible operations return [`CompsimError`] through the crate-wide
//! [`Result`] alias. Conditions the scorers treat as non-fatal (a document
//! without vectors, a token outside every noun chunk) never surface here;
//! they are logged and produce empty link lists instead.
//!
//! # Examples
//!
//! ```
//! use compsim::error::{CompsimError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(CompsimError::invalid_document("span is empty"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for compsim operations.
#[derive(Error, Debug)]
pub enum CompsimError {
    /// I/O errors (reading documents or configuration files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed annotator output (bad spans, heads, vectors)
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Two vectors that must be compared have different dimensions
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A link was constructed with an empty side
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with CompsimError.
pub type Result<T> = std::result::Result<T, CompsimError>;

impl CompsimError {
    /// Create a new invalid document error.
    pub fn invalid_document<S: Into<String>>(msg: S) -> Self {
        CompsimError::InvalidDocument(msg.into())
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        CompsimError::DimensionMismatch { expected, actual }
    }

    /// Create a new invalid link error.
    pub fn invalid_link<S: Into<String>>(msg: S) -> Self {
        CompsimError::InvalidLink(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CompsimError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        CompsimError::Other(format!("Invalid argument: {}", msg.into()))
    }
}
