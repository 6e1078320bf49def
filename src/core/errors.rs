//! Error types for the inspection pipeline.
//!
//! Whole-image failures (unreadable input, unknown product code, corrupt
//! variant data) surface as typed errors. Failures scoped to a single field
//! or label never appear here: the pipeline degrades those to FAIL verdicts
//! or omitted labels and keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Convenient result alias used throughout the crate.
pub type InspectResult<T> = Result<T, InspectError>;

/// Errors that abort processing of the current image or the store.
#[derive(Error, Debug)]
pub enum InspectError {
    /// The source image could not be read or decoded.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// The specification catalog has no entry for the product code.
    #[error("unknown product code: {code}")]
    UnknownProduct {
        /// The code that was looked up.
        code: String,
    },

    /// An injected capability (detector, recognizer, decoder) failed at a
    /// point where the whole image cannot proceed.
    #[error("{capability} failed: {context}")]
    Capability {
        /// Which capability failed.
        capability: &'static str,
        /// Additional context about the call.
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The persisted variant document exists but cannot be parsed.
    ///
    /// Distinct from an absent document, which is an empty store.
    #[error("variant store corrupt: {path}")]
    StoreCorrupt {
        /// Location of the unreadable document.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// A configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl InspectError {
    /// Creates a capability error with call context.
    pub fn capability(
        capability: &'static str,
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Capability {
            capability,
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates an unknown-product error.
    pub fn unknown_product(code: impl Into<String>) -> Self {
        Self::UnknownProduct { code: code.into() }
    }
}

impl From<image::ImageError> for InspectError {
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}
