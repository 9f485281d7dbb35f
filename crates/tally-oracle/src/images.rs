//! Page image resolution via the rendering stage's manifest

use crate::error::OracleError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// An in-memory page rendering, ready to attach to an oracle request
#[derive(Debug, Clone)]
pub struct PageImage {
    /// 1-based page number
    pub page: u32,

    /// Raw PNG bytes
    pub png: Vec<u8>,
}

/// Manifest written by the out-of-scope page-rendering step
#[derive(Debug, Deserialize)]
struct ImageManifest {
    output_directory: PathBuf,
}

/// Resolves page numbers to rendered page images
///
/// Images live in one directory and follow the rendering step's
/// `page_{page:03}.png` naming convention. A missing file surfaces as
/// [`OracleError::ImageMissing`] and is handled like any other oracle
/// failure for that unit of work.
#[derive(Debug, Clone)]
pub struct PageImageStore {
    images_dir: PathBuf,
}

impl PageImageStore {
    /// Build a store from the rendering stage's manifest file
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Manifest`] when the manifest is missing or
    /// malformed; that is fatal for the calling stage.
    pub fn from_manifest(manifest_path: &Path) -> Result<Self, OracleError> {
        let contents = fs::read_to_string(manifest_path).map_err(|e| {
            OracleError::Manifest(format!("{}: {}", manifest_path.display(), e))
        })?;
        let manifest: ImageManifest = serde_json::from_str(&contents).map_err(|e| {
            OracleError::Manifest(format!("{}: {}", manifest_path.display(), e))
        })?;

        Ok(Self {
            images_dir: manifest.output_directory,
        })
    }

    /// Build a store directly from an image directory
    pub fn from_dir(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    /// Path the rendering step would have used for a page
    pub fn image_path(&self, page: u32) -> PathBuf {
        self.images_dir.join(format!("page_{:03}.png", page))
    }

    /// Read a page image into memory
    pub fn read_page(&self, page: u32) -> Result<PageImage, OracleError> {
        let path = self.image_path(page);

        if !path.exists() {
            return Err(OracleError::ImageMissing { page, path });
        }

        let png = fs::read(&path)?;
        Ok(PageImage { page, png })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_image_path_zero_padding() {
        let store = PageImageStore::from_dir("/images");
        assert_eq!(store.image_path(7), PathBuf::from("/images/page_007.png"));
        assert_eq!(store.image_path(123), PathBuf::from("/images/page_123.png"));
    }

    #[test]
    fn test_read_existing_page() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page_012.png"), b"png-bytes").unwrap();

        let store = PageImageStore::from_dir(dir.path());
        let image = store.read_page(12).unwrap();
        assert_eq!(image.page, 12);
        assert_eq!(image.png, b"png-bytes");
    }

    #[test]
    fn test_missing_page_is_image_missing() {
        let dir = TempDir::new().unwrap();
        let store = PageImageStore::from_dir(dir.path());
        let result = store.read_page(99);
        assert!(matches!(result, Err(OracleError::ImageMissing { page: 99, .. })));
    }

    #[test]
    fn test_manifest_round_trip() {
        let dir = TempDir::new().unwrap();
        let manifest_path = dir.path().join("manifest.json");
        fs::write(
            &manifest_path,
            format!(
                "{{\"output_directory\": \"{}\", \"total_pages\": 3}}",
                dir.path().display()
            ),
        )
        .unwrap();
        fs::write(dir.path().join("page_001.png"), b"x").unwrap();

        let store = PageImageStore::from_manifest(&manifest_path).unwrap();
        assert!(store.read_page(1).is_ok());
    }

    #[test]
    fn test_missing_manifest_is_fatal() {
        let result = PageImageStore::from_manifest(Path::new("/nonexistent/manifest.json"));
        assert!(matches!(result, Err(OracleError::Manifest(_))));
    }
}
