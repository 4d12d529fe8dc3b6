use crate::config::ScoutConfig;
use crate::error::ConfigError;
use crate::results::SkipReason;
use regex::Regex;
use url::Url;

/// Configuration for deciding which listing links point at letters
#[derive(Debug, Clone)]
pub struct LetterFilterConfig {
    /// Origin relative hrefs are resolved against
    pub site_origin: String,

    /// Path segment every letter locator contains
    pub topic_marker: String,

    /// Regex patterns for locator paths that are never letters (pagination and the like)
    pub exclude_patterns: Vec<String>,
}

fn default_exclude_patterns() -> Vec<String> {
    vec![r"/page/".to_string()]
}

impl LetterFilterConfig {
    pub fn from_scout_config(config: &ScoutConfig) -> Self {
        Self {
            site_origin: config.site_origin.clone(),
            topic_marker: config.topic_marker.clone(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl Default for LetterFilterConfig {
    fn default() -> Self {
        Self::from_scout_config(&ScoutConfig::default())
    }
}

/// Qualifies listing hrefs as letter locators and derives the period from them
#[derive(Debug)]
pub struct LetterLinkFilter {
    origin: Url,
    topic_marker: String,
    exclude_regexes: Vec<Regex>,
    listing_root: Regex,
    period: Regex,
}

impl LetterLinkFilter {
    pub fn new(config: LetterFilterConfig) -> Result<Self, ConfigError> {
        let origin = Url::parse(&config.site_origin)?;

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        // Bare listing root, with or without the trailing slash
        let listing_root = Regex::new(&format!(r"/{}/?$", regex::escape(&config.topic_marker)))?;
        let period = Regex::new(r"/(\d{4})/(\d{2})/")?;

        Ok(Self {
            origin,
            topic_marker: config.topic_marker,
            exclude_regexes,
            listing_root,
            period,
        })
    }

    /// Resolve `href` into a canonical locator, or say why it is not a letter
    ///
    /// Every rule looks at the resolved path only, so a share link that carries a
    /// letter URL in its query string is off topic.
    pub fn qualify(&self, href: &str) -> Result<String, SkipReason> {
        let href = href.trim();
        if href.is_empty() {
            return Err(SkipReason::MissingHref);
        }

        let resolved = match self.resolve(href) {
            Ok(url) => url,
            Err(_) if !href.contains(&self.topic_marker) => return Err(SkipReason::OffTopic),
            Err(reason) => return Err(reason),
        };

        let path = resolved.path();
        if !path.contains(&self.topic_marker) {
            return Err(SkipReason::OffTopic);
        }
        if self.exclude_regexes.iter().any(|re| re.is_match(path)) {
            return Err(SkipReason::Pagination);
        }
        if self.listing_root.is_match(path) {
            return Err(SkipReason::ListingRoot);
        }

        Ok(self.normalize_url(&resolved).to_string())
    }

    fn resolve(&self, href: &str) -> Result<Url, SkipReason> {
        let parsed = if href.starts_with("http://") || href.starts_with("https://") {
            Url::parse(href)
        } else {
            self.origin.join(href)
        };
        parsed.map_err(|e| SkipReason::InvalidUrl(e.to_string()))
    }

    /// Drop the fragment so anchors within one letter share a locator
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }

    /// `YYYY-MM-01` when the locator carries a `/YYYY/MM/` segment pair, else empty
    pub fn period_of(&self, locator: &str) -> String {
        let path = Url::parse(locator)
            .map(|url| url.path().to_string())
            .unwrap_or_else(|_| locator.to_string());
        self.period
            .captures(&path)
            .map(|caps| format!("{}-{}-01", &caps[1], &caps[2]))
            .unwrap_or_default()
    }
}
