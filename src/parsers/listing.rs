use crate::config::ScoutConfig;
use crate::error::ConfigError;
use crate::filter::{LetterFilterConfig, LetterLinkFilter};
use crate::parsers::selector;
use crate::parsers::text::collapse_whitespace;
use crate::results::{CandidateLetter, SkipReason, SkippedLink};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;

/// Candidates found on one listing page, plus every link that was turned down
#[derive(Debug, Clone, Default)]
pub struct ListingReport {
    pub candidates: Vec<CandidateLetter>,
    pub skipped: Vec<SkippedLink>,
}

/// Turns listing-page HTML into candidate letters
#[derive(Debug)]
pub struct ListingParser {
    filter: LetterLinkFilter,
    min_title_len: usize,
    boilerplate_titles: Vec<String>,
    anchors: Selector,
    paragraphs: Selector,
}

impl ListingParser {
    pub fn new(config: &ScoutConfig) -> Result<Self, ConfigError> {
        let filter = LetterLinkFilter::new(LetterFilterConfig::from_scout_config(config))?;
        Ok(Self {
            filter,
            min_title_len: config.min_title_len,
            boilerplate_titles: config
                .boilerplate_titles
                .iter()
                .map(|t| t.trim().to_lowercase())
                .collect(),
            anchors: selector("a[href]")?,
            paragraphs: selector("p")?,
        })
    }

    /// Candidate letters in document order, unique by locator
    ///
    /// Never fails: markup that yields no qualifying links gives an empty list,
    /// which callers read as the end of pagination.
    pub fn parse_listing(&self, html: &str) -> Vec<CandidateLetter> {
        self.parse_report(html).candidates
    }

    /// Like [`parse_listing`](Self::parse_listing), keeping the reason for each skipped link
    pub fn parse_report(&self, html: &str) -> ListingReport {
        let doc = Html::parse_document(html);
        let mut report = ListingReport::default();
        let mut seen = HashSet::new();

        for link in doc.select(&self.anchors) {
            let href = link.value().attr("href").unwrap_or_default();
            match self.candidate_from_link(link, href, &seen) {
                Ok(candidate) => {
                    seen.insert(candidate.locator.clone());
                    report.candidates.push(candidate);
                }
                Err(reason) => {
                    ::log::debug!("Skipping link {:?}: {:?}", href, reason);
                    report.skipped.push(SkippedLink {
                        href: href.to_string(),
                        reason,
                    });
                }
            }
        }

        ::log::debug!(
            "Listing parse kept {} candidates, skipped {} links",
            report.candidates.len(),
            report.skipped.len()
        );
        report
    }

    /// Only a link that passes the title rules claims its locator in `seen`
    fn candidate_from_link(
        &self,
        link: ElementRef<'_>,
        href: &str,
        seen: &HashSet<String>,
    ) -> Result<CandidateLetter, SkipReason> {
        let locator = self.filter.qualify(href)?;
        let title = self.title_of(link)?;

        if seen.contains(&locator) {
            return Err(SkipReason::DuplicateLocator);
        }

        let period = self.filter.period_of(&locator);
        let excerpt = self.excerpt_near(link);
        Ok(CandidateLetter::new(title, locator, period, excerpt))
    }

    fn title_of(&self, link: ElementRef<'_>) -> Result<String, SkipReason> {
        let title = collapse_whitespace(&link.text().collect::<String>());
        if title.is_empty() {
            return Err(SkipReason::EmptyTitle);
        }

        let len = title.chars().count();
        if len < self.min_title_len {
            return Err(SkipReason::TitleTooShort { len });
        }

        let lowered = title.to_lowercase();
        if self.boilerplate_titles.iter().any(|b| *b == lowered) {
            return Err(SkipReason::BoilerplateTitle);
        }

        Ok(title)
    }

    /// First paragraph in the link's nearest div/section/li that does not wrap the link
    fn excerpt_near(&self, link: ElementRef<'_>) -> Option<String> {
        let container = link
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| matches!(el.value().name(), "div" | "section" | "li"))?;

        container
            .select(&self.paragraphs)
            .find(|p| !p.descendants().any(|node| node == *link))
            .map(|p| collapse_whitespace(&p.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    }
}
