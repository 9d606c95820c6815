//! Data Set Catalog - Lists the data sets a user can pick from

use crate::manifest::Manifest;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, warn};

/// Label of the synthetic "all data sets" entry
pub const ALL_DATA_SETS_LABEL: &str = "All victory speeches";

/// Selectable data set. `name` is absent for the aggregate entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataSetDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "labelPlural")]
    pub label: String,
}

impl DataSetDescriptor {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            label: name.to_string(),
        }
    }

    pub fn aggregate() -> Self {
        Self {
            name: None,
            label: ALL_DATA_SETS_LABEL.to_string(),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.name.is_none()
    }
}

/// Aggregate first, then by name.
fn catalog_order(a: &DataSetDescriptor, b: &DataSetDescriptor) -> Ordering {
    match (&a.name, &b.name) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y),
    }
}

/// Enumerate data sets whose transcript is present on disk.
///
/// Never fails: an unreadable manifest produces an empty list.
pub fn list_data_sets(data_dir: &Path, manifest_file: &str) -> Vec<DataSetDescriptor> {
    let manifest = match Manifest::load(data_dir, manifest_file) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!("{}", e);
            return Vec::new();
        }
    };

    let mut data_sets: Vec<DataSetDescriptor> = manifest
        .entries()
        .iter()
        .filter(|entry| {
            let present = manifest.has_content(entry);
            if !present {
                debug!(
                    "Skipping data set {}: {} is not a readable file",
                    entry.id,
                    manifest.content_path(entry).display()
                );
            }
            present
        })
        .map(|entry| DataSetDescriptor::named(&entry.id))
        .collect();

    data_sets.push(DataSetDescriptor::aggregate());
    data_sets.sort_by(catalog_order);
    data_sets
}
