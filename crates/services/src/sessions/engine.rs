use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;

use quiz_core::model::{AnswerRecord, Entry, QuizSummary, QuizSummaryError, VocabularyBank};

use crate::error::SessionError;
use super::progress::SessionProgress;

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizPhase {
    /// No session has been started yet.
    Idle,
    /// Questions are being served.
    Active,
    /// Every question in the pool has been answered.
    Complete,
    /// The user asked for results before the pool ran out.
    Results,
}

/// Outcome of a single `submit_answer` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission was blank after trimming, or nothing was on display;
    /// no state changed.
    Ignored,
    /// The submission was graded and recorded.
    Answered {
        record: AnswerRecord,
        is_complete: bool,
    },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory quiz session over a flattened bank snapshot.
///
/// Serves questions uniformly at random without replacement. The entry on
/// display stays in the pool until it is answered, at which point it is
/// removed by `(category, prompt)` and the next one is drawn.
pub struct QuizSession {
    phase: QuizPhase,
    pool: Vec<Entry>,
    current: Option<Entry>,
    record: Vec<AnswerRecord>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    rng: StdRng,
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Session with a deterministic draw order, for tests.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            phase: QuizPhase::Idle,
            pool: Vec::new(),
            current: None,
            record: Vec::new(),
            started_at: None,
            completed_at: None,
            rng,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn current_entry(&self) -> Option<&Entry> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn record(&self) -> &[AnswerRecord] {
        &self.record
    }

    /// Number of questions still eligible to be drawn, including the one on
    /// display.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    /// Number of questions that have already been answered.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.record.len()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == QuizPhase::Complete
    }

    /// True when the live pool already holds this exact triple.
    #[must_use]
    pub fn pool_contains(&self, entry: &Entry) -> bool {
        self.pool.iter().any(|e| e == entry)
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.pool.len() + self.record.len(),
            answered: self.record.len(),
            remaining: self.pool.len(),
            is_complete: self.is_complete(),
        }
    }

    /// Tally of the current record.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError` if the record cannot be tallied.
    pub fn summary(&self) -> Result<QuizSummary, QuizSummaryError> {
        QuizSummary::from_records(&self.record)
    }

    /// Begin a fresh session over the given bank snapshot.
    ///
    /// Valid from `Idle`, `Complete`, or `Results`. Clears the record,
    /// rebuilds the pool from the snapshot, and draws the first question.
    /// An empty bank leaves `current_entry` unset.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` while a session is active.
    pub fn start(
        &mut self,
        bank: &VocabularyBank,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if self.phase == QuizPhase::Active {
            return Err(SessionError::InvalidPhase {
                operation: "start",
                phase: self.phase,
            });
        }

        self.pool = bank.flatten();
        self.record.clear();
        self.current = self.draw();
        self.started_at = Some(started_at);
        self.completed_at = None;
        self.phase = QuizPhase::Active;
        Ok(())
    }

    /// Grade a free-text submission against the entry on display.
    ///
    /// Blank submissions (after trimming) are an input gate, not an error:
    /// they are ignored without touching any state. A graded submission
    /// stores the text verbatim in the record, removes the answered question
    /// from the pool, and either draws the next one or completes the
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside of `Active`.
    pub fn submit_answer(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, SessionError> {
        if self.phase != QuizPhase::Active {
            return Err(SessionError::InvalidPhase {
                operation: "submit_answer",
                phase: self.phase,
            });
        }
        if text.trim().is_empty() {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(current) = self.current.take() else {
            // Nothing on display: the bank was empty when the session began.
            return Ok(SubmitOutcome::Ignored);
        };

        let is_correct = current.grade(text);
        self.pool.retain(|e| !e.same_slot(&current));
        let record = AnswerRecord {
            entry: current,
            user_answer: text.to_owned(),
            is_correct,
        };
        self.record.push(record.clone());

        if self.pool.is_empty() {
            self.phase = QuizPhase::Complete;
            self.completed_at = Some(now);
            return Ok(SubmitOutcome::Answered {
                record,
                is_complete: true,
            });
        }

        self.current = self.draw();
        Ok(SubmitOutcome::Answered {
            record,
            is_complete: false,
        })
    }

    /// End the session early, keeping the record for display.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside of `Active`.
    pub fn request_results(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != QuizPhase::Active {
            return Err(SessionError::InvalidPhase {
                operation: "request_results",
                phase: self.phase,
            });
        }
        self.phase = QuizPhase::Results;
        self.completed_at = Some(now);
        Ok(())
    }

    /// Add a freshly persisted entry to the live pool.
    ///
    /// Only an active session picks the entry up; in any other phase the
    /// next `start()` sees it through the bank snapshot instead. When
    /// nothing is on display (the session began on an empty bank) the new
    /// entry is drawn immediately so it can actually be served.
    pub fn ingest_appended_entry(&mut self, entry: Entry) {
        if self.phase != QuizPhase::Active {
            return;
        }
        self.pool.push(entry);
        if self.current.is_none() {
            self.current = self.draw();
        }
    }

    // Uniform pick over the pool. The drawn entry is cloned, not removed;
    // removal happens when it is answered.
    fn draw(&mut self) -> Option<Entry> {
        if self.pool.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.pool.len());
        Some(self.pool[index].clone())
    }
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("pool_len", &self.pool.len())
            .field("current", &self.current.as_ref().map(|e| &e.prompt))
            .field("record_len", &self.record.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
