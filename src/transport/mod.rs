pub mod http;

pub use http::HttpTransport;

use crate::error::TransportError;
use async_trait::async_trait;

/// Fetches the HTML text of a page
///
/// Implementations own timeouts and retries. Any non-2xx status, timeout or
/// connection failure comes back as a [`TransportError`].
#[async_trait]
pub trait PageTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<String, TransportError>;
}
