pub mod json;
pub mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;
use crate::results::{NewLetter, Question, StoredLetter};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Persistence for letters and the questions asked about them
///
/// Letters are insert-only and unique by locator: inserting a locator that is
/// already present fails with [`StoreError::Duplicate`].
pub trait LetterStore {
    fn exists(&self, locator: &str) -> Result<bool, StoreError>;

    fn insert(&mut self, letter: NewLetter) -> Result<StoredLetter, StoreError>;

    fn get_letter(&self, id: i64) -> Result<Option<StoredLetter>, StoreError>;

    fn get_letter_by_locator(&self, locator: &str) -> Result<Option<StoredLetter>, StoreError>;

    /// Newest period first
    fn list_letters(&self, limit: usize, offset: usize) -> Result<Vec<StoredLetter>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;

    fn insert_question(
        &mut self,
        letter_id: i64,
        question: &str,
        answer: &str,
    ) -> Result<Question, StoreError>;

    /// Oldest first
    fn questions_for(&self, letter_id: i64) -> Result<Vec<Question>, StoreError>;

    fn delete_question(&mut self, id: i64) -> Result<bool, StoreError>;
}

/// Store contents shared by the in-memory and JSON-file stores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct StoreState {
    letters: Vec<StoredLetter>,
    questions: Vec<Question>,
    next_letter_id: i64,
    next_question_id: i64,
}

impl StoreState {
    pub(crate) fn exists(&self, locator: &str) -> bool {
        self.letters.iter().any(|l| l.locator == locator)
    }

    pub(crate) fn insert(&mut self, letter: NewLetter) -> Result<StoredLetter, StoreError> {
        if self.exists(&letter.locator) {
            return Err(StoreError::Duplicate(letter.locator));
        }

        self.next_letter_id += 1;
        let stored = StoredLetter::from_new(self.next_letter_id, letter, Utc::now());
        self.letters.push(stored.clone());
        Ok(stored)
    }

    pub(crate) fn get_letter(&self, id: i64) -> Option<StoredLetter> {
        self.letters.iter().find(|l| l.id == id).cloned()
    }

    pub(crate) fn get_letter_by_locator(&self, locator: &str) -> Option<StoredLetter> {
        self.letters.iter().find(|l| l.locator == locator).cloned()
    }

    pub(crate) fn list_letters(&self, limit: usize, offset: usize) -> Vec<StoredLetter> {
        let mut letters: Vec<&StoredLetter> = self.letters.iter().collect();
        letters.sort_by(|a, b| b.period.cmp(&a.period).then(b.id.cmp(&a.id)));
        letters
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }

    pub(crate) fn count(&self) -> usize {
        self.letters.len()
    }

    pub(crate) fn insert_question(
        &mut self,
        letter_id: i64,
        question: &str,
        answer: &str,
    ) -> Result<Question, StoreError> {
        if self.get_letter(letter_id).is_none() {
            return Err(StoreError::NotFound(letter_id));
        }

        self.next_question_id += 1;
        let stored = Question {
            id: self.next_question_id,
            letter_id,
            question: question.to_string(),
            answer: answer.to_string(),
            created_at: Utc::now(),
        };
        self.questions.push(stored.clone());
        Ok(stored)
    }

    pub(crate) fn questions_for(&self, letter_id: i64) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.letter_id == letter_id)
            .cloned()
            .collect()
    }

    pub(crate) fn has_question(&self, id: i64) -> bool {
        self.questions.iter().any(|q| q.id == id)
    }

    pub(crate) fn delete_question(&mut self, id: i64) -> bool {
        let before = self.questions.len();
        self.questions.retain(|q| q.id != id);
        self.questions.len() != before
    }
}
