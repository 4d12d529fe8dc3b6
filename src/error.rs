use thiserror::Error;

/// Failures raised by a [`PageTransport`](crate::transport::PageTransport).
///
/// These are always recovered by the pipeline: a failed listing fetch reads as
/// an empty page, a failed detail fetch reads as an empty body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Whether another attempt at the same request might succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => *status >= 500 || *status == 429,
            TransportError::Timeout { .. } | TransportError::Network(_) => true,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let url = err.url().map(|u| u.to_string()).unwrap_or_default();
        if err.is_timeout() {
            TransportError::Timeout { url }
        } else if let Some(status) = err.status() {
            TransportError::Status {
                status: status.as_u16(),
                url,
            }
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// A letter with this locator is already stored
    #[error("letter already exists: {0}")]
    Duplicate(String),

    #[error("no letter with id {0}")]
    NotFound(i64),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Aborting failure of an ingestion run.
///
/// Letters persisted before the failure stay committed.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("store failure during ingestion: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid URL in config: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid selector: {0}")]
    Selector(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("letter {0} not found")]
    LetterNotFound(i64),

    #[error("question must be between 1 and {max} characters")]
    InvalidQuestion { max: usize },

    #[error("answer service failed: {0}")]
    Service(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
