pub mod config;
pub mod discovery;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod insight;
pub mod parsers;
pub mod results;
pub mod store;
pub mod transport;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::ScoutConfig;
pub use discovery::Discovery;
pub use error::{IngestError, StoreError, TransportError};
pub use results::{CandidateLetter, FetchOutcome, StoredLetter};

use std::path::Path;
use store::JsonFileStore;
use transport::HttpTransport;

/// Builder wiring the HTTP transport and JSON store into a [`Discovery`]
pub struct Scout {
    config: ScoutConfig,
}

impl Scout {
    /// Create a new builder from a configuration
    pub fn new(config: ScoutConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a JSON file
    pub fn from_config_file(
        path: impl AsRef<Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(ScoutConfig::from_file(path)?))
    }

    /// Override where the letter store lives
    pub fn with_store_path(mut self, path: impl Into<String>) -> Self {
        self.config.store_path = path.into();
        self
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.timeout_secs = timeout_seconds;
        self
    }

    /// Override how many pages "fetch more" probes
    pub fn with_fetch_more_attempts(mut self, attempts: u32) -> Self {
        self.config.fetch_more_attempts = attempts;
        self
    }

    pub fn config(&self) -> &ScoutConfig {
        &self.config
    }

    /// Open the store and build the pipeline
    pub fn build(
        self,
    ) -> Result<Discovery<HttpTransport, JsonFileStore>, Box<dyn std::error::Error>> {
        let transport = HttpTransport::new(&self.config)?;
        let store = JsonFileStore::open(&self.config.store_path)?;
        Ok(Discovery::new(&self.config, transport, store)?)
    }
}
