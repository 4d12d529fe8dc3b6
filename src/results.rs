use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A letter found on a listing page, not yet checked against the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLetter {
    /// Visible link text, trimmed
    pub title: String,

    /// Canonical absolute URL; unique key across the system
    pub locator: String,

    /// `YYYY-MM-01` derived from the locator path, or empty
    pub period: String,

    /// Paragraph text found next to the link
    pub excerpt: Option<String>,

    /// Excerpt or title until the full text has been extracted
    pub body: String,
}

impl CandidateLetter {
    pub fn new(title: String, locator: String, period: String, excerpt: Option<String>) -> Self {
        let body = excerpt.clone().unwrap_or_else(|| title.clone());
        Self {
            title,
            locator,
            period,
            excerpt,
            body,
        }
    }

    /// Replace the fallback body with extracted full text; empty text is ignored
    pub fn attach_body(&mut self, full_text: String) {
        if !full_text.is_empty() {
            self.body = full_text;
        }
    }

    pub fn into_new_letter(self) -> NewLetter {
        NewLetter {
            title: self.title,
            locator: self.locator,
            period: self.period,
            excerpt: self.excerpt,
            body: self.body,
        }
    }
}

/// Row handed to [`LetterStore::insert`](crate::store::LetterStore::insert)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLetter {
    pub title: String,
    pub locator: String,
    pub period: String,
    pub excerpt: Option<String>,
    pub body: String,
}

/// A persisted letter. Created once per locator and never updated by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLetter {
    pub id: i64,
    pub title: String,
    pub locator: String,
    pub period: String,
    pub excerpt: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl StoredLetter {
    pub fn from_new(id: i64, letter: NewLetter, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: letter.title,
            locator: letter.locator,
            period: letter.period,
            excerpt: letter.excerpt,
            body: letter.body,
            created_at,
        }
    }
}

/// A question asked about a stored letter, with its generated answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub letter_id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// What happened to one candidate during `ingest_page`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateOutcome {
    Stored(StoredLetter),
    /// The existence check found the locator
    AlreadyKnown { locator: String },
    /// The existence check missed it but the insert hit the uniqueness constraint
    LostInsertRace { locator: String },
}

/// Result of ingesting one listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    pub page: u32,
    /// Candidates the listing parser produced; zero marks the end of pagination
    pub candidates: usize,
    /// Per-candidate outcomes in parse order
    pub outcomes: Vec<CandidateOutcome>,
}

impl PageReport {
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            candidates: 0,
            outcomes: Vec::new(),
        }
    }

    /// Letters persisted for this page, in parse order
    pub fn new_letters(&self) -> Vec<StoredLetter> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                CandidateOutcome::Stored(letter) => Some(letter.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn new_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, CandidateOutcome::Stored(_)))
            .count()
    }
}

/// Why a discovery run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// "Fetch new" always stops after the first page
    FirstPageOnly,
    /// A page contributed at least one new letter
    FoundNew { page: u32 },
    /// A page produced no candidates at all
    EndOfListing { page: u32 },
    /// Every attempt was spent on pages of already-known letters
    AttemptsExhausted { attempts: u32 },
}

/// Outcome of `run_fetch_new` / `run_fetch_more`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Newly stored letters, in the order they were stored
    pub new_letters: Vec<StoredLetter>,
    pub message: String,
    /// Listing pages visited, in visit order
    pub pages_visited: Vec<u32>,
    pub stop: StopReason,
}

impl FetchOutcome {
    pub fn new_count(&self) -> usize {
        self.new_letters.len()
    }
}

/// Why a listing link did not become a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingHref,
    /// Target lacks the topical marker segment
    OffTopic,
    InvalidUrl(String),
    Pagination,
    ListingRoot,
    EmptyTitle,
    TitleTooShort { len: usize },
    BoilerplateTitle,
    /// An earlier link on the same page already produced this locator
    DuplicateLocator,
}

/// A link the listing parser rejected, kept so callers can see why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLink {
    pub href: String,
    pub reason: SkipReason,
}
