use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Entry;

/// Outcome of a single graded submission within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub entry: Entry,
    /// The submission exactly as typed, before trimming.
    pub user_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSummaryError {
    #[error("too many records for a single session: {len}")]
    TooManyRecords { len: usize },

    #[error("total answers ({total}) does not match correct + incorrect ({sum})")]
    CountMismatch { total: u32, sum: u32 },
}

/// Aggregate tally for a quiz session's record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    total: u32,
    correct: u32,
    incorrect: u32,
}

impl QuizSummary {
    /// Rehydrate a summary from already-counted parts.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError::CountMismatch` if totals do not align.
    pub fn from_parts(total: u32, correct: u32, incorrect: u32) -> Result<Self, QuizSummaryError> {
        let sum = correct + incorrect;
        if sum != total {
            return Err(QuizSummaryError::CountMismatch { total, sum });
        }
        Ok(Self {
            total,
            correct,
            incorrect,
        })
    }

    /// Build a summary by tallying a session record.
    ///
    /// # Errors
    ///
    /// Returns `QuizSummaryError::TooManyRecords` if the record length cannot
    /// fit in `u32`.
    pub fn from_records(records: &[AnswerRecord]) -> Result<Self, QuizSummaryError> {
        let total = u32::try_from(records.len())
            .map_err(|_| QuizSummaryError::TooManyRecords { len: records.len() })?;
        let correct = records.iter().filter(|r| r.is_correct).count() as u32;

        Self::from_parts(total, correct, total - correct)
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(prompt: &str, answer: &str, submitted: &str) -> AnswerRecord {
        let entry = Entry::from_bank("food", prompt, answer);
        AnswerRecord {
            is_correct: entry.grade(submitted),
            user_answer: submitted.to_owned(),
            entry,
        }
    }

    #[test]
    fn summary_counts_correct_and_incorrect() {
        let records = vec![
            record("apple", "manzana", "manzana"),
            record("bread", "pan", "pain"),
            record("milk", "leche", "leche"),
        ];

        let summary = QuizSummary::from_records(&records).unwrap();

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.correct(), 2);
        assert_eq!(summary.incorrect(), 1);
    }

    #[test]
    fn from_parts_rejects_mismatched_counts() {
        let err = QuizSummary::from_parts(3, 1, 1).unwrap_err();
        assert_eq!(err, QuizSummaryError::CountMismatch { total: 3, sum: 2 });
    }

    #[test]
    fn empty_record_yields_zero_summary() {
        let summary = QuizSummary::from_records(&[]).unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.correct(), 0);
    }
}
