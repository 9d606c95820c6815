pub mod catalog;
pub mod config;
pub mod connector;
pub mod error;
pub mod manifest;
pub mod record;
pub mod runner;
pub mod staging;
pub mod tone;

pub use catalog::{list_data_sets, DataSetDescriptor};
pub use config::{ConnectorConfig, ConnectorInfo, ToneAnalyzerCredentials};
pub use connector::{PipeConnector, ToneConnector};
pub use error::{ConnectorError, Result};
pub use record::{Record, RecordSink};
pub use runner::{DataSetSelection, PipeRunner, RunStats, RunStatus};
pub use staging::StagingStore;
