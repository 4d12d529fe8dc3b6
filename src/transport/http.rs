use crate::config::ScoutConfig;
use crate::error::{ConfigError, TransportError};
use crate::transport::PageTransport;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Redirect hops followed before giving up
const MAX_REDIRECTS: usize = 10;

/// Delay before the first retry; doubles on each further retry
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for a single backoff sleep
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Backoff before retry number `attempt + 1`, capped at [`MAX_RETRY_DELAY`]
fn retry_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt)).min(MAX_RETRY_DELAY)
}

/// Plain HTTP transport: bounded timeout, redirect following, retry with backoff
pub struct HttpTransport {
    client: Client,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl HttpTransport {
    pub fn new(config: &ScoutConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    async fn get_once(&self, url: &str) -> Result<String, TransportError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, TransportError> {
        let mut attempt = 0;
        loop {
            ::log::debug!("GET {} (attempt {})", url, attempt + 1);
            match self.get_once(url).await {
                Ok(html) => return Ok(html),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = retry_delay(self.retry_base_delay, attempt);
                    ::log::warn!("GET {} failed ({}), retrying in {:?}", url, e, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
