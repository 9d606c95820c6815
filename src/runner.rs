//! Pipe Runner - Minimal host harness around a connector
//!
//! Expands the aggregate selection into one fetch per named data set and
//! collects the outcome of each fetch.

use crate::connector::PipeConnector;
use crate::record::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

/// What the user picked in the catalog
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSetSelection {
    Named(String),
    All,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Partial,
    Failed,
}

/// Outcome of one data set within a run
#[derive(Clone, Debug)]
pub struct DataSetRun {
    pub data_set: String,
    pub outcome: std::result::Result<Vec<Record>, String>,
}

impl DataSetRun {
    pub fn record_count(&self) -> usize {
        self.outcome.as_ref().map(Vec::len).unwrap_or(0)
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }
}

#[derive(Clone, Debug)]
pub struct RunStats {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub data_sets: Vec<DataSetRun>,
}

impl RunStats {
    pub fn status(&self) -> RunStatus {
        let failed = self.data_sets.iter().filter(|run| run.outcome.is_err()).count();
        if self.data_sets.is_empty() || failed == self.data_sets.len() {
            RunStatus::Failed
        } else if failed > 0 {
            RunStatus::Partial
        } else {
            RunStatus::Success
        }
    }

    pub fn total_records(&self) -> usize {
        self.data_sets.iter().map(DataSetRun::record_count).sum()
    }
}

pub struct PipeRunner {
    connector: Arc<dyn PipeConnector>,
}

impl PipeRunner {
    pub fn new(connector: Arc<dyn PipeConnector>) -> Self {
        Self { connector }
    }

    /// Names a selection expands to, in catalog order.
    pub fn expand(&self, selection: &DataSetSelection) -> Vec<String> {
        match selection {
            DataSetSelection::Named(name) => vec![name.clone()],
            DataSetSelection::All => self
                .connector
                .list_data_sets()
                .into_iter()
                .filter_map(|descriptor| descriptor.name)
                .collect(),
        }
    }

    /// Run one pipe. Each data set is fetched on its own task.
    pub async fn run(&self, selection: &DataSetSelection) -> RunStats {
        let run_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        let names = self.expand(selection);
        info!("Pipe run {} started for {} data set(s)", run_id, names.len());

        let mut tasks = JoinSet::new();
        for (index, name) in names.iter().cloned().enumerate() {
            let connector = Arc::clone(&self.connector);
            tasks.spawn(async move {
                let mut records: Vec<Record> = Vec::new();
                let outcome = connector
                    .fetch_records(&name, &mut records)
                    .await
                    .map(|_| records)
                    .map_err(|e| e.to_string());
                (index, DataSetRun { data_set: name, outcome })
            });
        }

        let mut slots: Vec<Option<DataSetRun>> = vec![None; names.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, run)) => slots[index] = Some(run),
                Err(e) => warn!("Fetch task aborted: {}", e),
            }
        }

        let data_sets = slots
            .into_iter()
            .zip(names)
            .map(|(slot, data_set)| {
                slot.unwrap_or_else(|| DataSetRun {
                    data_set,
                    outcome: Err("Fetch task did not complete".to_string()),
                })
            })
            .collect();

        let stats = RunStats {
            run_id,
            started_at,
            finished_at: Utc::now(),
            data_sets,
        };
        info!(
            "Pipe run {} finished: {:?}, {} record(s)",
            stats.run_id,
            stats.status(),
            stats.total_records()
        );
        stats
    }
}
