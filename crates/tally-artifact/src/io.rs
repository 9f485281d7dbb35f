//! Artifact file IO

use crate::error::ArtifactError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load a stage artifact from a JSON file
///
/// # Errors
///
/// Returns [`ArtifactError::Io`] when the file cannot be read and
/// [`ArtifactError::Malformed`] when it does not parse into the expected
/// record. Both are fatal for the calling stage.
pub fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = contents.len(), "loaded artifact");

    serde_json::from_str(&contents).map_err(|source| ArtifactError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a stage artifact as pretty-printed JSON
///
/// The record is serialized in full before the file is touched, so a
/// serialization failure never leaves a partial artifact on disk. Parent
/// directories are created as needed.
pub fn save_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<(), ArtifactError> {
    let contents = serde_json::to_string_pretty(artifact)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ArtifactError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), "saved artifact");
    Ok(())
}

/// Build the canonical output path for a stage: `<dir>/<document_id>_<stage>.json`
pub fn stage_output_path(output_dir: &Path, document_id: &str, stage: &str) -> PathBuf {
    output_dir.join(format!("{}_{}.json", document_id, stage))
}
