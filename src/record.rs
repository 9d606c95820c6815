//! Record - Value handed to the host for persistence

use crate::manifest::ManifestEntry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered field map. Enrichment adds fields whose names are only known at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Base record: static listing fields plus the transcript as `text`.
    pub fn from_listing(entry: &ManifestEntry, text: String) -> Self {
        let mut fields = Map::new();
        fields.insert("winner".to_string(), Value::String(entry.winner.clone()));
        fields.insert("party".to_string(), Value::String(entry.party.clone()));
        fields.insert("location".to_string(), Value::String(entry.location.clone()));
        fields.insert("text".to_string(), Value::String(text));
        Self(fields)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn text(&self) -> &str {
        self.0.get("text").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Host side of record delivery.
pub trait RecordSink {
    fn push(&mut self, record: Record);
}

impl RecordSink for Vec<Record> {
    fn push(&mut self, record: Record) {
        Vec::push(self, record);
    }
}
