use crate::error::StoreError;
use crate::results::{NewLetter, Question, StoredLetter};
use crate::store::{LetterStore, StoreState};

/// In-process store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: StoreState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LetterStore for MemoryStore {
    fn exists(&self, locator: &str) -> Result<bool, StoreError> {
        Ok(self.state.exists(locator))
    }

    fn insert(&mut self, letter: NewLetter) -> Result<StoredLetter, StoreError> {
        self.state.insert(letter)
    }

    fn get_letter(&self, id: i64) -> Result<Option<StoredLetter>, StoreError> {
        Ok(self.state.get_letter(id))
    }

    fn get_letter_by_locator(&self, locator: &str) -> Result<Option<StoredLetter>, StoreError> {
        Ok(self.state.get_letter_by_locator(locator))
    }

    fn list_letters(&self, limit: usize, offset: usize) -> Result<Vec<StoredLetter>, StoreError> {
        Ok(self.state.list_letters(limit, offset))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.state.count())
    }

    fn insert_question(
        &mut self,
        letter_id: i64,
        question: &str,
        answer: &str,
    ) -> Result<Question, StoreError> {
        self.state.insert_question(letter_id, question, answer)
    }

    fn questions_for(&self, letter_id: i64) -> Result<Vec<Question>, StoreError> {
        Ok(self.state.questions_for(letter_id))
    }

    fn delete_question(&mut self, id: i64) -> Result<bool, StoreError> {
        Ok(self.state.delete_question(id))
    }
}
