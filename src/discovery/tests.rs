use super::*;
use crate::results::{NewLetter, Question, StoredLetter};
use crate::store::MemoryStore;
use crate::transport::fake::FakeTransport;
use std::collections::HashSet;

const BASE: &str = "https://example.org/economic-letter/";

fn config() -> ScoutConfig {
    ScoutConfig {
        base_url: BASE.to_string(),
        site_origin: "https://example.org".to_string(),
        ..ScoutConfig::default()
    }
}

fn page_url(page: u32) -> String {
    listing_page_url(BASE, page)
}

fn locator(slug: &str) -> String {
    format!("https://example.org/economic-letter/2024/01/{slug}/")
}

/// Listing HTML with one `<li>` per slug; slugs starting with `x-` get an excerpt
fn listing(slugs: &[&str]) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            let excerpt = if slug.starts_with("x-") {
                format!("<p>Excerpt for {slug}</p>")
            } else {
                String::new()
            };
            format!(
                r#"<li><a href="/economic-letter/2024/01/{slug}/">Letter titled {slug}</a>{excerpt}</li>"#
            )
        })
        .collect();
    format!("<html><body><ul>{items}</ul></body></html>")
}

fn detail(text: &str) -> String {
    format!(r#"<div class="entry-content"><p>{text}</p></div>"#)
}

fn store_with(slugs: &[&str]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for slug in slugs {
        store
            .insert(NewLetter {
                title: format!("Letter titled {slug}"),
                locator: locator(slug),
                period: "2024-01-01".to_string(),
                excerpt: None,
                body: "seeded".to_string(),
            })
            .unwrap();
    }
    store
}

fn listing_requests(transport: &FakeTransport) -> Vec<String> {
    transport
        .requests()
        .into_iter()
        .filter(|url| *url == BASE || url.contains("/page/"))
        .collect()
}

#[tokio::test]
async fn test_fetch_new_stores_first_page_letters_in_order() {
    let transport = FakeTransport::new()
        .with_page(BASE, &listing(&["alpha", "beta"]))
        .with_page(&locator("alpha"), &detail("Alpha full text."))
        .with_page(&locator("beta"), &detail("Beta full text."));
    let mut discovery = Discovery::new(&config(), transport, MemoryStore::new()).unwrap();

    let outcome = discovery.run_fetch_new().await.unwrap();

    assert_eq!(outcome.new_count(), 2);
    assert_eq!(outcome.message, "Added 2 new letter(s)");
    assert_eq!(outcome.stop, StopReason::FirstPageOnly);
    let locators: Vec<_> = outcome.new_letters.iter().map(|l| l.locator.clone()).collect();
    assert_eq!(locators, vec![locator("alpha"), locator("beta")]);
    assert_eq!(outcome.new_letters[0].body, "Alpha full text.");
    assert_eq!(outcome.new_letters[0].period, "2024-01-01");
    assert_eq!(discovery.store().count().unwrap(), 2);
}

#[tokio::test]
async fn test_fetch_new_twice_adds_nothing_the_second_time() {
    let transport = FakeTransport::new().with_page(BASE, &listing(&["alpha", "beta"]));
    let mut discovery = Discovery::new(&config(), transport, MemoryStore::new()).unwrap();

    let first = discovery.run_fetch_new().await.unwrap();
    assert_eq!(first.new_count(), 2);

    let requests_before = discovery.transport().requests().len();
    let second = discovery.run_fetch_new().await.unwrap();
    assert_eq!(second.new_count(), 0);
    assert_eq!(second.message, "No new letters found");

    // only the listing page itself is fetched again
    let requests = discovery.transport().requests();
    assert_eq!(requests[requests_before..], [BASE.to_string()]);
    assert_eq!(discovery.store().count().unwrap(), 2);
}

#[tokio::test]
async fn test_fetch_new_with_unreachable_listing_reports_nothing() {
    let transport = FakeTransport::new().with_status(BASE, 500);
    let mut discovery = Discovery::new(&config(), transport, MemoryStore::new()).unwrap();

    let outcome = discovery.run_fetch_new().await.unwrap();
    assert_eq!(outcome.new_count(), 0);
    assert_eq!(outcome.message, "No new letters found");
}

#[tokio::test]
async fn test_fetch_more_stops_at_first_page_with_new_letters() {
    let transport = FakeTransport::new()
        .with_page(&page_url(1), &listing(&["a1", "a2"]))
        .with_page(&page_url(2), &listing(&["b1"]))
        .with_page(&page_url(3), &listing(&["b1", "c1"]))
        .with_page(&page_url(4), &listing(&["d1"]));
    let store = store_with(&["a1", "a2", "b1"]);
    let mut discovery = Discovery::new(&config(), transport, store).unwrap();

    let outcome = discovery.run_fetch_more(0).await.unwrap();

    assert_eq!(outcome.new_count(), 1);
    assert_eq!(outcome.new_letters[0].locator, locator("c1"));
    assert_eq!(outcome.pages_visited, vec![1, 2, 3]);
    assert_eq!(outcome.stop, StopReason::FoundNew { page: 3 });
    assert_eq!(outcome.message, "Added 1 new letter(s) from page 3");
    assert_eq!(
        listing_requests(discovery.transport()),
        vec![page_url(1), page_url(2), page_url(3)]
    );
    assert!(!discovery.store().exists(&locator("d1")).unwrap());
}

#[tokio::test]
async fn test_fetch_more_starts_after_the_given_page() {
    let transport = FakeTransport::new()
        .with_page(&page_url(3), &listing(&["c1"]))
        .with_page(&page_url(4), &listing(&["d1"]));
    let mut discovery = Discovery::new(&config(), transport, store_with(&["c1"])).unwrap();

    let outcome = discovery.run_fetch_more(2).await.unwrap();
    assert_eq!(outcome.pages_visited, vec![3, 4]);
    assert_eq!(outcome.new_count(), 1);
    assert_eq!(outcome.message, "Added 1 new letter(s) from page 4");
}

#[tokio::test]
async fn test_fetch_more_stops_at_empty_page() {
    let transport = FakeTransport::new()
        .with_page(&page_url(1), &listing(&["a1", "a2"]))
        .with_page(&page_url(2), "<html><body><p>No letters here</p></body></html>")
        .with_page(&page_url(3), &listing(&["c1"]));
    let mut discovery =
        Discovery::new(&config(), transport, store_with(&["a1", "a2"])).unwrap();

    let outcome = discovery.run_fetch_more(0).await.unwrap();

    assert_eq!(outcome.new_count(), 0);
    assert_eq!(outcome.pages_visited, vec![1, 2]);
    assert_eq!(outcome.stop, StopReason::EndOfListing { page: 2 });
    assert!(outcome.message.contains("end of the letter listing"));
    assert!(!listing_requests(discovery.transport()).contains(&page_url(3)));
}

#[tokio::test]
async fn test_fetch_more_treats_missing_page_as_end_of_listing() {
    // page 2 is not served, so the fake answers 404
    let transport = FakeTransport::new().with_page(&page_url(1), &listing(&["a1"]));
    let mut discovery = Discovery::new(&config(), transport, store_with(&["a1"])).unwrap();

    let outcome = discovery.run_fetch_more(0).await.unwrap();
    assert_eq!(outcome.stop, StopReason::EndOfListing { page: 2 });
    assert_eq!(outcome.new_count(), 0);
}

#[tokio::test]
async fn test_fetch_more_exhausts_attempt_bound() {
    let mut transport = FakeTransport::new();
    for page in 1..=5 {
        transport = transport.with_page(&page_url(page), &listing(&["known"]));
    }
    transport = transport.with_page(&page_url(6), &listing(&["fresh"]));
    let mut discovery = Discovery::new(&config(), transport, store_with(&["known"])).unwrap();

    let outcome = discovery.run_fetch_more(0).await.unwrap();

    assert_eq!(outcome.new_count(), 0);
    assert_eq!(outcome.pages_visited, vec![1, 2, 3, 4, 5]);
    assert_eq!(outcome.stop, StopReason::AttemptsExhausted { attempts: 5 });
    assert_eq!(
        outcome.message,
        "Checked 5 pages but all letters already exist. You may have reached the end of available letters."
    );
    assert!(!listing_requests(discovery.transport()).contains(&page_url(6)));
}

#[tokio::test]
async fn test_fetch_more_honours_custom_attempt_bound() {
    let transport = FakeTransport::new()
        .with_page(&page_url(1), &listing(&["known"]))
        .with_page(&page_url(2), &listing(&["known"]))
        .with_page(&page_url(3), &listing(&["fresh"]));
    let mut discovery = Discovery::new(&config(), transport, store_with(&["known"]))
        .unwrap()
        .with_fetch_more_attempts(2);

    let outcome = discovery.run_fetch_more(0).await.unwrap();
    assert_eq!(outcome.pages_visited, vec![1, 2]);
    assert_eq!(outcome.stop, StopReason::AttemptsExhausted { attempts: 2 });
}

#[tokio::test]
async fn test_failed_detail_fetch_keeps_fallback_body() {
    let transport = FakeTransport::new()
        .with_page(BASE, &listing(&["x-with-excerpt", "no-excerpt"]))
        .with_status(&locator("x-with-excerpt"), 503)
        .with_status(&locator("no-excerpt"), 500);
    let mut discovery = Discovery::new(&config(), transport, MemoryStore::new()).unwrap();

    let outcome = discovery.run_fetch_new().await.unwrap();
    assert_eq!(outcome.new_count(), 2);

    let with_excerpt = &outcome.new_letters[0];
    assert_eq!(with_excerpt.excerpt.as_deref(), Some("Excerpt for x-with-excerpt"));
    assert_eq!(with_excerpt.body, "Excerpt for x-with-excerpt");

    let without_excerpt = &outcome.new_letters[1];
    assert_eq!(without_excerpt.excerpt, None);
    assert_eq!(without_excerpt.body, "Letter titled no-excerpt");
}

#[tokio::test]
async fn test_detail_page_without_container_keeps_fallback_body() {
    let transport = FakeTransport::new()
        .with_page(BASE, &listing(&["x-plain"]))
        .with_page(&locator("x-plain"), "<html><body><p>chrome only</p></body></html>");
    let mut discovery = Discovery::new(&config(), transport, MemoryStore::new()).unwrap();

    let outcome = discovery.run_fetch_new().await.unwrap();
    assert_eq!(outcome.new_letters[0].body, "Excerpt for x-plain");
}

/// Reports `racing` locators as absent, then refuses them on insert as if
/// another writer got there first
struct RacingStore {
    inner: MemoryStore,
    racing: HashSet<String>,
}

impl LetterStore for RacingStore {
    fn exists(&self, locator: &str) -> Result<bool, StoreError> {
        if self.racing.contains(locator) {
            return Ok(false);
        }
        self.inner.exists(locator)
    }

    fn insert(&mut self, letter: NewLetter) -> Result<StoredLetter, StoreError> {
        if self.racing.contains(&letter.locator) {
            return Err(StoreError::Duplicate(letter.locator));
        }
        self.inner.insert(letter)
    }

    fn get_letter(&self, id: i64) -> Result<Option<StoredLetter>, StoreError> {
        self.inner.get_letter(id)
    }

    fn get_letter_by_locator(&self, locator: &str) -> Result<Option<StoredLetter>, StoreError> {
        self.inner.get_letter_by_locator(locator)
    }

    fn list_letters(&self, limit: usize, offset: usize) -> Result<Vec<StoredLetter>, StoreError> {
        self.inner.list_letters(limit, offset)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }

    fn insert_question(
        &mut self,
        letter_id: i64,
        question: &str,
        answer: &str,
    ) -> Result<Question, StoreError> {
        self.inner.insert_question(letter_id, question, answer)
    }

    fn questions_for(&self, letter_id: i64) -> Result<Vec<Question>, StoreError> {
        self.inner.questions_for(letter_id)
    }

    fn delete_question(&mut self, id: i64) -> Result<bool, StoreError> {
        self.inner.delete_question(id)
    }
}

#[tokio::test]
async fn test_lost_insert_race_is_not_new_and_not_fatal() {
    let transport = FakeTransport::new().with_page(BASE, &listing(&["contested", "free"]));
    let store = RacingStore {
        inner: MemoryStore::new(),
        racing: HashSet::from([locator("contested")]),
    };
    let mut discovery = Discovery::new(&config(), transport, store).unwrap();

    let report = discovery.ingest_page(1).await.unwrap();
    assert_eq!(report.candidates, 2);
    assert_eq!(
        report.outcomes[0],
        CandidateOutcome::LostInsertRace {
            locator: locator("contested")
        }
    );
    assert_eq!(report.new_count(), 1);
    assert_eq!(report.new_letters()[0].locator, locator("free"));
}

/// Accepts `capacity` inserts, then reports the store as down
struct FlakyStore {
    inner: MemoryStore,
    capacity: usize,
}

impl LetterStore for FlakyStore {
    fn exists(&self, locator: &str) -> Result<bool, StoreError> {
        self.inner.exists(locator)
    }

    fn insert(&mut self, letter: NewLetter) -> Result<StoredLetter, StoreError> {
        if self.inner.count()? >= self.capacity {
            return Err(StoreError::Unavailable("disk full".to_string()));
        }
        self.inner.insert(letter)
    }

    fn get_letter(&self, id: i64) -> Result<Option<StoredLetter>, StoreError> {
        self.inner.get_letter(id)
    }

    fn get_letter_by_locator(&self, locator: &str) -> Result<Option<StoredLetter>, StoreError> {
        self.inner.get_letter_by_locator(locator)
    }

    fn list_letters(&self, limit: usize, offset: usize) -> Result<Vec<StoredLetter>, StoreError> {
        self.inner.list_letters(limit, offset)
    }

    fn count(&self) -> Result<usize, StoreError> {
        self.inner.count()
    }

    fn insert_question(
        &mut self,
        letter_id: i64,
        question: &str,
        answer: &str,
    ) -> Result<Question, StoreError> {
        self.inner.insert_question(letter_id, question, answer)
    }

    fn questions_for(&self, letter_id: i64) -> Result<Vec<Question>, StoreError> {
        self.inner.questions_for(letter_id)
    }

    fn delete_question(&mut self, id: i64) -> Result<bool, StoreError> {
        self.inner.delete_question(id)
    }
}

#[tokio::test]
async fn test_store_failure_aborts_but_keeps_earlier_inserts() {
    let transport = FakeTransport::new().with_page(BASE, &listing(&["first", "second", "third"]));
    let store = FlakyStore {
        inner: MemoryStore::new(),
        capacity: 1,
    };
    let mut discovery = Discovery::new(&config(), transport, store).unwrap();

    let err = discovery.run_fetch_new().await.unwrap_err();
    assert!(matches!(err, IngestError::Store(StoreError::Unavailable(_))));

    let store = discovery.into_store();
    assert_eq!(store.count().unwrap(), 1);
    assert!(store.exists(&locator("first")).unwrap());
}
