//! Connector configuration
//!
//! Tone analyzer credentials are resolved from explicit `TONE_ANALYZER_*`
//! variables first, then from a bound service instance in `VCAP_SERVICES`.

use crate::error::{ConnectorError, Result};
use crate::manifest::MANIFEST_FILE;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_DIR: &str = "sample_data";
pub const DEFAULT_SERVICE_INSTANCE: &str = "tone analyzer";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Identity and load options of the connector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorInfo {
    /// Internal connector id, also used as staging prefix
    pub id: String,

    /// Display name of the data source
    pub name: String,

    /// Remove previously staged data before a load
    pub recreate_target: bool,
}

impl Default for ConnectorInfo {
    fn default() -> Self {
        Self {
            id: "template_with_service".to_string(),
            name: "Another Sample Data Source".to_string(),
            recreate_target: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToneAnalyzerCredentials {
    pub url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    pub data_dir: PathBuf,
    pub manifest_file: String,
    /// `None` disables enrichment
    pub tone_analyzer: Option<ToneAnalyzerCredentials>,
    pub request_timeout: Duration,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            manifest_file: MANIFEST_FILE.to_string(),
            tone_analyzer: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ConnectorConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            ..Self::default()
        }
    }

    pub fn with_tone_analyzer(mut self, credentials: ToneAnalyzerCredentials) -> Self {
        self.tone_analyzer = Some(credentials);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Resolve tone analyzer credentials from the process environment.
    pub fn tone_analyzer_from_env() -> Result<Option<ToneAnalyzerCredentials>> {
        let lookup = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("TONE_ANALYZER_URL") {
            return Ok(Some(ToneAnalyzerCredentials {
                url,
                username: lookup("TONE_ANALYZER_USERNAME").unwrap_or_default(),
                password: lookup("TONE_ANALYZER_PASSWORD").unwrap_or_default(),
            }));
        }

        let instance = lookup("WATSON_TONE_ANALYZER")
            .unwrap_or_else(|| DEFAULT_SERVICE_INSTANCE.to_string());

        match lookup("VCAP_SERVICES") {
            Some(vcap) => credentials_from_vcap(&vcap, &instance),
            None => Ok(None),
        }
    }
}

/// Find the first bound service instance whose name contains `instance`.
///
/// `vcap` has the Cloud Foundry shape
/// `{"<offering>": [{"name": "...", "credentials": {"url", "username", "password"}}]}`.
pub fn credentials_from_vcap(vcap: &str, instance: &str) -> Result<Option<ToneAnalyzerCredentials>> {
    let services: Value = serde_json::from_str(vcap)
        .map_err(|e| ConnectorError::Config(format!("VCAP_SERVICES is not valid JSON: {}", e)))?;
    let offerings = services
        .as_object()
        .ok_or_else(|| ConnectorError::Config("VCAP_SERVICES must be a JSON object".to_string()))?;

    let bound = offerings
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .find(|service| {
            service
                .get("name")
                .and_then(Value::as_str)
                .map(|name| name.contains(instance))
                .unwrap_or(false)
        });

    let Some(service) = bound else {
        return Ok(None);
    };

    let credentials = service.get("credentials").cloned().ok_or_else(|| {
        ConnectorError::Config(format!("Service instance '{}' has no credentials", instance))
    })?;
    let credentials: ToneAnalyzerCredentials = serde_json::from_value(credentials).map_err(|e| {
        ConnectorError::Config(format!("Invalid credentials for '{}': {}", instance, e))
    })?;

    Ok(Some(credentials))
}
