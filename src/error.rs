//! Error types for coherency-stats
//!
//! Nothing in this crate is fatal to an ingestion pass: a file whose name is
//! unrecognized is skipped, a file whose content is corrupted is discarded,
//! and the rest of the batch proceeds.

use thiserror::Error;

use crate::extract::ExtractionError;
use crate::key::SkipReason;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// coherency-stats error types
#[derive(Error, Debug)]
pub enum Error {
    /// File name did not decode into an experiment key
    #[error("Skipped {file}: {reason}")]
    Skipped {
        /// Bare file name
        file: String,
        /// Why the codec rejected it
        reason: SkipReason,
    },

    /// File content violated its family's line format; its contribution is discarded
    #[error("Extraction failed for {file}: {source}")]
    Extraction {
        /// Bare file name
        file: String,
        /// Line-level cause
        #[source]
        source: ExtractionError,
    },

    /// Invalid caller-supplied input (configuration, query arguments)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be decoded
    #[error("Config error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow export error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

impl Error {
    /// Bare name of the file this error is about, if any.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Skipped { file, .. } | Self::Extraction { file, .. } => Some(file),
            _ => None,
        }
    }
}
