//! Error types for oracle operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while consulting an oracle
///
/// Every variant except [`OracleError::Manifest`] is recoverable at the
/// pipeline level: the affected page or claim is left unmodified and
/// processing continues.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Network or API communication failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// The oracle replied, but not with parseable, schema-conforming JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The call exceeded its deadline
    #[error("Oracle call timed out")]
    Timeout,

    /// The page's visual resource does not exist
    #[error("Image missing for page {page}: {path}")]
    ImageMissing {
        /// Page number the image was requested for
        page: u32,
        /// Path that was probed
        path: PathBuf,
    },

    /// The page image exists but could not be read
    #[error("Cannot read image: {0}")]
    Io(#[from] std::io::Error),

    /// The image manifest is missing or malformed (fatal for the stage)
    #[error("Invalid image manifest: {0}")]
    Manifest(String),
}
