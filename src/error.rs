use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("Manifest could not be loaded: {0}")]
    CatalogLoad(String),

    #[error("The data set cannot be found: {0}")]
    DataSetNotFound(String),

    #[error("The data set could not be loaded: {0}")]
    ContentRead(String),

    #[error("Error querying tone analyzer service: {0}")]
    EnrichmentTransport(String),

    #[error("Call to tone analyzer URL {url} returned status {status}{detail}")]
    EnrichmentService {
        url: String,
        status: u16,
        detail: String,
    },

    #[error("Tone analyzer returned an unreadable response: {0}")]
    EnrichmentResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
