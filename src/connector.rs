//! Pipe Connector Trait - Interface the host pipeline drives
//!
//! Implementations:
//! - ToneConnector: static transcripts enriched with tone scores

use crate::catalog::{self, DataSetDescriptor};
use crate::config::{ConnectorConfig, ConnectorInfo};
use crate::error::{ConnectorError, Result};
use crate::manifest::Manifest;
use crate::record::{Record, RecordSink};
use crate::tone::ToneAnalyzerClient;
use async_trait::async_trait;
use tracing::{debug, error, info};

#[async_trait]
pub trait PipeConnector: Send + Sync {
    /// Connector identity and load options
    fn info(&self) -> &ConnectorInfo;

    /// Prefix for the staging destination of each data set
    fn name_prefix(&self) -> &str {
        &self.info().id
    }

    /// Data sets the user can choose from
    fn list_data_sets(&self) -> Vec<DataSetDescriptor>;

    /// Fetch the records of one named data set into `sink`.
    ///
    /// `Err` means nothing was pushed.
    async fn fetch_records(&self, data_set: &str, sink: &mut (dyn RecordSink + Send)) -> Result<()>;
}

/// Sample connector over the bundled victory speech transcripts
pub struct ToneConnector {
    info: ConnectorInfo,
    config: ConnectorConfig,
    tone_analyzer: Option<ToneAnalyzerClient>,
}

impl ToneConnector {
    pub fn new(config: ConnectorConfig) -> Result<Self> {
        Self::with_info(ConnectorInfo::default(), config)
    }

    pub fn with_info(info: ConnectorInfo, config: ConnectorConfig) -> Result<Self> {
        let tone_analyzer = match &config.tone_analyzer {
            Some(credentials) => Some(ToneAnalyzerClient::new(
                credentials.clone(),
                config.request_timeout,
            )?),
            None => None,
        };

        Ok(Self {
            info,
            config,
            tone_analyzer,
        })
    }

    async fn build_record(&self, data_set: &str) -> Result<Record> {
        let manifest = Manifest::load(&self.config.data_dir, &self.config.manifest_file)?;
        let entry = manifest
            .find(data_set)
            .ok_or_else(|| ConnectorError::DataSetNotFound(data_set.to_string()))?;

        let path = manifest.content_path(entry);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConnectorError::ContentRead(format!("{}: {}", path.display(), e)))?;

        let mut record = Record::from_listing(entry, text);

        match &self.tone_analyzer {
            Some(client) => {
                if let Some(scores) = client.analyze(record.text()).await? {
                    debug!("Attaching {} tone scores to {}", scores.len(), data_set);
                    for (name, score) in scores {
                        record.insert(name, score);
                    }
                }
            }
            None => debug!("No tone analyzer configured, skipping enrichment"),
        }

        Ok(record)
    }
}

#[async_trait]
impl PipeConnector for ToneConnector {
    fn info(&self) -> &ConnectorInfo {
        &self.info
    }

    fn list_data_sets(&self) -> Vec<DataSetDescriptor> {
        catalog::list_data_sets(&self.config.data_dir, &self.config.manifest_file)
    }

    async fn fetch_records(&self, data_set: &str, sink: &mut (dyn RecordSink + Send)) -> Result<()> {
        debug!("Fetching data set {} from {}", data_set, self.config.data_dir.display());

        match self.build_record(data_set).await {
            Ok(record) => {
                sink.push(record);
                info!("Fetched data set {}", data_set);
                Ok(())
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }
}
