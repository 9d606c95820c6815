//! Manifest - Static listing of the transcripts shipped with the connector

use crate::error::{ConnectorError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default manifest file name inside the data directory
pub const MANIFEST_FILE: &str = "transcriptListings.json";

/// One transcript listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Data set id, used as the selectable data set name
    #[serde(rename = "transcript_id")]
    pub id: String,

    pub winner: String,

    pub party: String,

    pub location: String,

    /// Content file, relative to the data directory
    #[serde(rename = "transcript")]
    pub content_file: String,
}

#[derive(Debug, Clone)]
pub struct Manifest {
    data_dir: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Read and parse `<data_dir>/<file_name>`.
    pub fn load(data_dir: &Path, file_name: &str) -> Result<Self> {
        let path = data_dir.join(file_name);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConnectorError::CatalogLoad(format!("{}: {}", path.display(), e)))?;
        let entries: Vec<ManifestEntry> = serde_json::from_str(&content)
            .map_err(|e| ConnectorError::CatalogLoad(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            entries,
        })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// First entry with a matching id. Ids are expected to be unique but this is not checked.
    pub fn find(&self, id: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn content_path(&self, entry: &ManifestEntry) -> PathBuf {
        self.data_dir.join(&entry.content_file)
    }

    /// True when the entry's content file exists and is a regular file.
    pub fn has_content(&self, entry: &ManifestEntry) -> bool {
        std::fs::metadata(self.content_path(entry))
            .map(|meta| !meta.is_dir())
            .unwrap_or(false)
    }
}
