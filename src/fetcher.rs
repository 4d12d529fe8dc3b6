use crate::error::ConfigError;
use crate::parsers::BodyExtractor;
use crate::transport::PageTransport;
use std::sync::Arc;

/// Retrieves a letter's detail page and extracts its full text
///
/// Best effort: any transport or extraction failure yields an empty string,
/// leaving the candidate's excerpt/title fallback in place.
pub struct DetailFetcher<T> {
    transport: Arc<T>,
    extractor: BodyExtractor,
}

impl<T: PageTransport> DetailFetcher<T> {
    pub fn new(transport: Arc<T>) -> Result<Self, ConfigError> {
        Ok(Self {
            transport,
            extractor: BodyExtractor::new()?,
        })
    }

    pub async fn fetch_body(&self, locator: &str) -> String {
        ::log::info!("Fetching letter content from {}", locator);

        match self.transport.get(locator).await {
            Ok(html) => {
                let body = self.extractor.extract(&html);
                if body.is_empty() {
                    ::log::warn!("No letter body found at {}", locator);
                }
                body
            }
            Err(e) => {
                ::log::warn!("Failed to fetch letter content from {}: {}", locator, e);
                String::new()
            }
        }
    }
}
