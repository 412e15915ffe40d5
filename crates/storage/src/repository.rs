use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use quiz_core::model::{Entry, VocabularyBank};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The bank already holds this exact `(category, prompt, answer)` triple.
    #[error("duplicate entry")]
    Duplicate,

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the vocabulary bank.
#[async_trait]
pub trait BankRepository: Send + Sync {
    /// Load the full bank snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or parsed.
    async fn load_bank(&self) -> Result<VocabularyBank, StorageError>;

    /// Append an entry to the bank and persist the result.
    ///
    /// Exact-triple duplicates are rejected with `StorageError::Duplicate`.
    /// A new answer for an existing prompt replaces the stored one inside
    /// the category's first slot. Persistence is all-or-nothing: a failed
    /// append leaves the previously stored bank intact.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Duplicate` on collision, or other variants for
    /// read/parse/write failures.
    async fn append_entry(&self, entry: &Entry) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    bank: Arc<Mutex<VocabularyBank>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a pre-populated bank.
    #[must_use]
    pub fn with_bank(bank: VocabularyBank) -> Self {
        Self {
            bank: Arc::new(Mutex::new(bank)),
        }
    }
}

#[async_trait]
impl BankRepository for InMemoryRepository {
    async fn load_bank(&self) -> Result<VocabularyBank, StorageError> {
        let guard = self
            .bank
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn append_entry(&self, entry: &Entry) -> Result<(), StorageError> {
        let mut guard = self
            .bank
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        if guard.contains(entry) {
            return Err(StorageError::Duplicate);
        }
        guard.merge(entry);
        Ok(())
    }
}

/// Aggregates the bank repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub bank: Arc<dyn BankRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            bank: Arc::new(InMemoryRepository::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, prompt: &str, answer: &str) -> Entry {
        Entry::from_bank(category, prompt, answer)
    }

    #[tokio::test]
    async fn append_then_load_round_trips() {
        let repo = InMemoryRepository::new();

        repo.append_entry(&entry("food", "apple", "manzana"))
            .await
            .unwrap();

        let bank = repo.load_bank().await.unwrap();
        assert_eq!(bank.total_entries(), 1);
        assert!(bank.contains(&entry("food", "apple", "manzana")));
    }

    #[tokio::test]
    async fn exact_duplicate_is_rejected() {
        let repo = InMemoryRepository::new();
        repo.append_entry(&entry("food", "apple", "manzana"))
            .await
            .unwrap();

        let err = repo
            .append_entry(&entry("food", "apple", "manzana"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Duplicate));

        let bank = repo.load_bank().await.unwrap();
        assert_eq!(bank.total_entries(), 1);
    }

    #[tokio::test]
    async fn new_answer_for_existing_prompt_replaces() {
        let repo = InMemoryRepository::new();
        repo.append_entry(&entry("food", "apple", "manzana"))
            .await
            .unwrap();

        repo.append_entry(&entry("food", "apple", "pomme"))
            .await
            .unwrap();

        let bank = repo.load_bank().await.unwrap();
        assert!(bank.contains(&entry("food", "apple", "pomme")));
        assert!(!bank.contains(&entry("food", "apple", "manzana")));
    }
}
