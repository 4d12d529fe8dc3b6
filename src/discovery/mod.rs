//! Drives listing pagination, deduplicates against the store, and persists new letters.
//!
//! Two entry points share one primitive, [`Discovery::ingest_page`]:
//!
//! - [`Discovery::run_fetch_new`] ingests the first listing page once.
//! - [`Discovery::run_fetch_more`] walks forward from a starting page for at most
//!   `fetch_more_attempts` pages. It stops at the first page that yields a new
//!   letter, or at the first page with no candidates at all. Pages whose
//!   candidates are all known are passed over.
//!
//! Pages and candidates are processed strictly in order. Transport and parse
//! problems are absorbed at the smallest scope; only store failures abort a
//! run, and letters inserted before the failure stay inserted.

#[cfg(test)]
mod tests;

use crate::config::ScoutConfig;
use crate::error::{ConfigError, IngestError, StoreError};
use crate::fetcher::DetailFetcher;
use crate::parsers::ListingParser;
use crate::results::{CandidateLetter, CandidateOutcome, FetchOutcome, PageReport, StopReason};
use crate::store::LetterStore;
use crate::transport::PageTransport;
use crate::utils::listing_page_url;
use std::sync::Arc;

pub struct Discovery<T, S> {
    base_url: String,
    transport: Arc<T>,
    store: S,
    parser: ListingParser,
    fetcher: DetailFetcher<T>,
    fetch_more_attempts: u32,
}

impl<T: PageTransport, S: LetterStore> Discovery<T, S> {
    pub fn new(config: &ScoutConfig, transport: T, store: S) -> Result<Self, ConfigError> {
        let transport = Arc::new(transport);
        Ok(Self {
            base_url: config.base_url.clone(),
            fetcher: DetailFetcher::new(Arc::clone(&transport))?,
            transport,
            store,
            parser: ListingParser::new(config)?,
            fetch_more_attempts: config.fetch_more_attempts,
        })
    }

    /// Override the number of pages one "fetch more" run may probe
    pub fn with_fetch_more_attempts(mut self, attempts: u32) -> Self {
        self.fetch_more_attempts = attempts;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Candidates on listing page `page`; a failed fetch reads as an empty page
    pub async fn fetch_listing(&self, page: u32) -> Vec<CandidateLetter> {
        let url = listing_page_url(&self.base_url, page);
        ::log::info!("Fetching letters from page {}: {}", page, url);

        match self.transport.get(&url).await {
            Ok(html) => {
                let candidates = self.parser.parse_listing(&html);
                ::log::info!("Found {} letters on page {}", candidates.len(), page);
                candidates
            }
            Err(e) => {
                ::log::warn!("Error fetching page {}: {}", page, e);
                Vec::new()
            }
        }
    }

    /// Store every candidate on `page` that is not already known
    pub async fn ingest_page(&mut self, page: u32) -> Result<PageReport, IngestError> {
        let candidates = self.fetch_listing(page).await;
        if candidates.is_empty() {
            return Ok(PageReport::empty(page));
        }

        let mut report = PageReport {
            page,
            candidates: candidates.len(),
            outcomes: Vec::with_capacity(candidates.len()),
        };

        for candidate in candidates {
            let outcome = self.ingest_candidate(candidate).await?;
            report.outcomes.push(outcome);
        }

        ::log::info!(
            "Page {}: {} candidates, {} new",
            page,
            report.candidates,
            report.new_count()
        );
        Ok(report)
    }

    async fn ingest_candidate(
        &mut self,
        mut candidate: CandidateLetter,
    ) -> Result<CandidateOutcome, IngestError> {
        if self.store.exists(&candidate.locator)? {
            ::log::debug!("Already stored: {}", candidate.locator);
            return Ok(CandidateOutcome::AlreadyKnown {
                locator: candidate.locator,
            });
        }

        let body = self.fetcher.fetch_body(&candidate.locator).await;
        candidate.attach_body(body);

        match self.store.insert(candidate.into_new_letter()) {
            Ok(stored) => Ok(CandidateOutcome::Stored(stored)),
            Err(StoreError::Duplicate(locator)) => {
                ::log::warn!("Letter already exists with URL {}", locator);
                Ok(CandidateOutcome::LostInsertRace { locator })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check the first listing page for letters not yet stored
    pub async fn run_fetch_new(&mut self) -> Result<FetchOutcome, IngestError> {
        let report = self.ingest_page(1).await?;
        let new_letters = report.new_letters();

        let message = if new_letters.is_empty() {
            "No new letters found".to_string()
        } else {
            format!("Added {} new letter(s)", new_letters.len())
        };

        Ok(FetchOutcome {
            new_letters,
            message,
            pages_visited: vec![1],
            stop: StopReason::FirstPageOnly,
        })
    }

    /// Search pages after `starting_page` for older letters not yet stored
    pub async fn run_fetch_more(&mut self, starting_page: u32) -> Result<FetchOutcome, IngestError> {
        let mut new_letters = Vec::new();
        let mut pages_visited = Vec::new();

        for attempt in 1..=self.fetch_more_attempts {
            let page = starting_page.saturating_add(attempt);
            pages_visited.push(page);

            let report = self.ingest_page(page).await?;

            if report.candidates == 0 {
                ::log::info!("No letters found on page {}", page);
                let message = if new_letters.is_empty() {
                    format!("Reached the end of the letter listing at page {page}; no new letters found")
                } else {
                    format!("Added {} new letter(s)", new_letters.len())
                };
                return Ok(FetchOutcome {
                    new_letters,
                    message,
                    pages_visited,
                    stop: StopReason::EndOfListing { page },
                });
            }

            let added = report.new_letters();
            if !added.is_empty() {
                ::log::info!("Found {} new letters on page {}", added.len(), page);
                new_letters.extend(added);
                return Ok(FetchOutcome {
                    message: format!(
                        "Added {} new letter(s) from page {}",
                        new_letters.len(),
                        page
                    ),
                    new_letters,
                    pages_visited,
                    stop: StopReason::FoundNew { page },
                });
            }

            ::log::info!(
                "Page {} had {} letters but all already exist",
                page,
                report.candidates
            );
        }

        let attempts = self.fetch_more_attempts;
        Ok(FetchOutcome {
            message: format!(
                "Checked {attempts} pages but all letters already exist. You may have reached the end of available letters."
            ),
            new_letters,
            pages_visited,
            stop: StopReason::AttemptsExhausted { attempts },
        })
    }
}
