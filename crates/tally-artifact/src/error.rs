//! Error types for artifact IO

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing stage artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// The artifact file could not be read or written
    #[error("Cannot access artifact {path}: {source}")]
    Io {
        /// Path that was being accessed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The artifact exists but is not valid JSON for the expected record
    #[error("Malformed artifact {path}: {source}")]
    Malformed {
        /// Path of the offending artifact
        path: PathBuf,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// A record could not be serialized (should not happen for our types)
    #[error("Cannot serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}
