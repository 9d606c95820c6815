//! Tone Analyzer Client - Enriches transcripts with tone scores
//!
//! Talks to a Tone Analyzer v3 compatible endpoint:
//! `POST <url>/v3/tone?version=2016-02-11` with HTTP Basic auth and `{"text": ...}`.

use crate::config::ToneAnalyzerCredentials;
use crate::error::{ConnectorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

const TONE_API_PATH: &str = "/v3/tone";
const TONE_API_VERSION: &str = "2016-02-11";

/// `document_tone` section of a tone analysis response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTone {
    #[serde(default)]
    pub tone_categories: Vec<ToneCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneCategory {
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub tones: Vec<Tone>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tone {
    #[serde(default)]
    pub tone_id: Option<String>,
    pub tone_name: String,
    /// Fraction in 0..1
    pub score: f64,
}

/// Normalized tone name -> score on a 0-100 scale, in response order.
pub type ToneScores = Map<String, Value>;

/// Field name for a tone: spaces become underscores, case is kept.
pub fn normalize_tone_name(name: &str) -> String {
    name.replace(' ', "_")
}

/// Scale a 0..1 score to 0..100 with two decimals.
pub fn scale_score(score: f64) -> f64 {
    (score * 100.0 * 100.0).round() / 100.0
}

impl DocumentTone {
    pub fn scores(&self) -> ToneScores {
        let mut scores = Map::new();
        for category in &self.tone_categories {
            for tone in &category.tones {
                let scaled = serde_json::Number::from_f64(scale_score(tone.score))
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                scores.insert(normalize_tone_name(&tone.tone_name), scaled);
            }
        }
        scores
    }
}

/// Extract tone scores from a response body.
///
/// A body that is not JSON is an error; an empty body or JSON without a usable
/// `document_tone` yields `None`.
pub fn parse_tone_response(body: &str) -> Result<Option<ToneScores>> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ConnectorError::EnrichmentResponse(e.to_string()))?;

    let document_tone = match value.get("document_tone") {
        Some(document_tone) if !document_tone.is_null() => document_tone.clone(),
        _ => return Ok(None),
    };

    match serde_json::from_value::<DocumentTone>(document_tone) {
        Ok(document_tone) => Ok(Some(document_tone.scores())),
        Err(e) => {
            warn!("Ignoring unrecognized document_tone payload: {}", e);
            Ok(None)
        }
    }
}

#[derive(Clone)]
pub struct ToneAnalyzerClient {
    client: reqwest::Client,
    credentials: ToneAnalyzerCredentials,
}

impl ToneAnalyzerClient {
    pub fn new(credentials: ToneAnalyzerCredentials, timeout: Duration) -> Result<Self> {
        // Redirects are not followed: a 3xx is a service error, not a new target
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ConnectorError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, credentials })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{}?version={}",
            self.credentials.url.trim_end_matches('/'),
            TONE_API_PATH,
            TONE_API_VERSION
        )
    }

    /// Analyze `text`. Exactly one request, no retries.
    pub async fn analyze(&self, text: &str) -> Result<Option<ToneScores>> {
        let url = self.endpoint();
        debug!("Requesting tone analysis from {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(|e| ConnectorError::EnrichmentTransport(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 300 {
            let body = response.text().await.unwrap_or_default();
            return Err(ConnectorError::EnrichmentService {
                url,
                status: status.as_u16(),
                detail: service_error_detail(&body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ConnectorError::EnrichmentTransport(e.to_string()))?;

        parse_tone_response(&body)
    }
}

/// ` (<error>)` when the service reported an `error` field.
fn service_error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| match v.get("error") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        })
        .map(|e| format!(" ({})", e))
        .unwrap_or_default()
}
