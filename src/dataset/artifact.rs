//! JSON artifact persistence for the canonical dataset.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use super::CanonicalDataset;

/// Errors reading or writing the dataset artifact.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset artifact not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read dataset artifact {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write dataset artifact {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CanonicalDataset {
    /// Parse an artifact. Sections missing from the document default to empty.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed artifact text with `base`, `variable`, `currency` and
    /// `selfGoverning` as top-level keys.
    pub fn to_json_pretty(&self) -> Result<String, DatasetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                DatasetError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DatasetError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        debug!(path = %path.display(), bytes = content.len(), "Read dataset artifact");
        Self::from_json(&content)
    }

    /// Write the artifact through a sibling temp file so readers never see a
    /// half-written document.
    pub fn save(&self, path: &Path) -> Result<(), DatasetError> {
        let json = self.to_json_pretty()?;
        let write_err = |source| DatasetError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json.as_bytes()).map_err(write_err)?;
        std::fs::rename(&tmp, path).map_err(write_err)?;

        info!(path = %path.display(), bytes = json.len(), "Saved dataset artifact");
        Ok(())
    }
}
