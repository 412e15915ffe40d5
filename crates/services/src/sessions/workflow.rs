use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{Entry, EntryDraft};
use storage::repository::BankRepository;

use super::engine::QuizSession;
use crate::error::{AppendError, SessionError};

/// Orchestrates storage-backed session starts and validated appends.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<dyn BankRepository>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn BankRepository>) -> Self {
        Self { clock, bank }
    }

    /// Start (or restart) the given session from the persisted bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when the bank cannot be loaded, or
    /// `SessionError::InvalidPhase` when the session is still active.
    pub async fn start_session(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        let bank = self.bank.load_bank().await?;
        session.start(&bank, self.clock.now())?;
        tracing::debug!(pool = session.remaining(), "quiz session started");
        Ok(())
    }

    /// Validate, persist, and publish a new vocabulary entry.
    ///
    /// Duplicates are rejected against both the persisted bank and the
    /// session's live pool; on success the entry becomes drawable within the
    /// running session.
    ///
    /// # Errors
    ///
    /// Returns `AppendError::Validation` for empty fields,
    /// `AppendError::Duplicate` on either collision, and
    /// `AppendError::Storage` for persistence failures.
    pub async fn append_entry(
        &self,
        session: &mut QuizSession,
        draft: EntryDraft,
    ) -> Result<Entry, AppendError> {
        let entry = draft.validate()?;

        // Covers entries added earlier in this session that a stale bank
        // snapshot would miss.
        if session.pool_contains(&entry) {
            return Err(AppendError::Duplicate);
        }

        self.bank.append_entry(&entry).await?;
        tracing::info!(
            category = %entry.category,
            prompt = %entry.prompt,
            "entry appended to bank"
        );
        session.ingest_appended_entry(entry.clone());
        Ok(entry)
    }
}
