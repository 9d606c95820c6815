//! Staging Store - Local destination for records of a pipe run
//!
//! One JSON Lines file per data set, named `<prefix>_<data set>.jsonl`.

use crate::error::Result;
use crate::record::Record;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct StagingStore {
    output_dir: PathBuf,
}

impl StagingStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn path_for(&self, prefix: &str, data_set: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{}.jsonl", prefix, data_set))
    }

    /// Create the output directory. With `recreate`, drop files staged earlier under `prefix`.
    pub fn prepare(&self, prefix: &str, recreate: bool) -> Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        if !recreate {
            return Ok(());
        }

        let stem = format!("{}_", prefix);
        for entry in fs::read_dir(&self.output_dir)? {
            let path = entry?.path();
            let staged = path.is_file()
                && path.extension().map(|ext| ext == "jsonl").unwrap_or(false)
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(|name| name.starts_with(&stem))
                    .unwrap_or(false);
            if staged {
                debug!("Removing staged file {}", path.display());
                fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    /// Append records of one data set, one JSON object per line.
    pub fn write(&self, prefix: &str, data_set: &str, records: &[Record]) -> Result<PathBuf> {
        let path = self.path_for(prefix, data_set);
        let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        info!("Staged {} record(s) in {}", records.len(), path.display());
        Ok(path)
    }

    pub fn read(&self, prefix: &str, data_set: &str) -> Result<Vec<Record>> {
        let content = fs::read_to_string(self.path_for(prefix, data_set))?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| Ok(serde_json::from_str::<Record>(line)?))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(text: &str) -> Record {
        let mut record = Record::default();
        record.insert("text", serde_json::json!(text));
        record
    }

    #[test]
    fn test_write_one_line_per_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = StagingStore::new(temp_dir.path().join("out"));
        store.prepare("conn", false).unwrap();

        let path = store.write("conn", "sp1", &[record("a"), record("b")]).unwrap();
        assert_eq!(path.file_name().unwrap(), "conn_sp1.jsonl");

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(store.read("conn", "sp1").unwrap(), vec![record("a"), record("b")]);
    }

    #[test]
    fn test_recreate_clears_only_own_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let store = StagingStore::new(temp_dir.path());
        store.prepare("conn", false).unwrap();
        store.write("conn", "sp1", &[record("old")]).unwrap();
        store.write("other", "sp1", &[record("keep")]).unwrap();

        store.prepare("conn", true).unwrap();
        assert!(!store.path_for("conn", "sp1").exists());
        assert!(store.path_for("other", "sp1").exists());
    }

    #[test]
    fn test_without_recreate_appends() {
        let temp_dir = TempDir::new().unwrap();
        let store = StagingStore::new(temp_dir.path());
        store.prepare("conn", false).unwrap();
        store.write("conn", "sp1", &[record("first")]).unwrap();
        store.prepare("conn", false).unwrap();
        store.write("conn", "sp1", &[record("second")]).unwrap();

        assert_eq!(store.read("conn", "sp1").unwrap().len(), 2);
    }
}
