use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("import manifest not found: {path}")]
    NotFound { path: String },

    #[error("failed to read import manifest {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse import manifest {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Sidecar manifest enumerating a third-party source tree to pull into the
/// build, e.g. `ntp-file-import.json`. The listed files are compiled
/// unmodified; the manifest is the only contact point with that tree.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(rename = "source-files-to-import")]
    pub source_files: Vec<String>,

    #[serde(rename = "header-paths-to-import")]
    pub header_paths: Vec<String>,
}

/// Manifest entries resolved against the directory the third-party tree was
/// unpacked to.
#[derive(Debug, Clone)]
pub struct ResolvedImport {
    pub sources: Vec<PathBuf>,
    pub header_dirs: Vec<PathBuf>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        debug!(
            path = %path.display(),
            sources = manifest.source_files.len(),
            header_dirs = manifest.header_paths.len(),
            "import manifest loaded"
        );
        Ok(manifest)
    }

    /// Pure mapping from manifest entries to file paths under `root`.
    pub fn resolve(&self, root: &Path) -> ResolvedImport {
        ResolvedImport {
            sources: self.source_files.iter().map(|f| root.join(f)).collect(),
            header_dirs: self.header_paths.iter().map(|f| root.join(f)).collect(),
        }
    }
}
