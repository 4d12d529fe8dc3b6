use crate::error::StoreError;
use crate::results::{NewLetter, Question, StoredLetter};
use crate::store::{LetterStore, StoreState};
use std::fs;
use std::path::{Path, PathBuf};

/// Store persisted as a single JSON document, rewritten after every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    state: StoreState,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories; a missing file is an empty store
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let state = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            StoreState::default()
        };

        ::log::info!("Opened letter store at {}", path.display());
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, state: &StoreState) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Apply `change` to a copy of the state; memory is only updated once the file is written
    fn commit<R>(
        &mut self,
        change: impl FnOnce(&mut StoreState) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut next = self.state.clone();
        let result = change(&mut next)?;
        self.save(&next)?;
        self.state = next;
        Ok(result)
    }
}

impl LetterStore for JsonFileStore {
    fn exists(&self, locator: &str) -> Result<bool, StoreError> {
        Ok(self.state.exists(locator))
    }

    fn insert(&mut self, letter: NewLetter) -> Result<StoredLetter, StoreError> {
        let stored = self.commit(|state| state.insert(letter))?;
        ::log::info!("Inserted letter with ID {}: {}", stored.id, stored.title);
        Ok(stored)
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
        self.commit(|state| state.insert_question(letter_id, question, answer))
    }

    fn questions_for(&self, letter_id: i64) -> Result<Vec<Question>, StoreError> {
        Ok(self.state.questions_for(letter_id))
    }

    fn delete_question(&mut self, id: i64) -> Result<bool, StoreError> {
        if !self.state.has_question(id) {
            return Ok(false);
        }
        self.commit(|state| Ok(state.delete_question(id)))
    }
}
