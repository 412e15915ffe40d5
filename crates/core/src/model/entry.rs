use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EntryError {
    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("prompt cannot be empty")]
    EmptyPrompt,

    #[error("answer cannot be empty")]
    EmptyAnswer,
}

//
// ─── ENTRY TYPES ───────────────────────────────────────────────────────────────
//

/// Raw caller input for a new vocabulary entry, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub category: String,
    pub prompt: String,
    pub answer: String,
}

impl EntryDraft {
    #[must_use]
    pub fn new(
        category: impl Into<String>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    /// Validate and normalize the draft into an `Entry`.
    ///
    /// All three fields must be non-empty after trimming. The category is
    /// lower-cased so appends cannot create categories that differ only in
    /// case; prompt and answer keep their case because grading is
    /// case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `EntryError` naming the first empty field.
    pub fn validate(self) -> Result<Entry, EntryError> {
        let category = self.category.trim();
        if category.is_empty() {
            return Err(EntryError::EmptyCategory);
        }
        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(EntryError::EmptyPrompt);
        }
        let answer = self.answer.trim();
        if answer.is_empty() {
            return Err(EntryError::EmptyAnswer);
        }

        Ok(Entry {
            category: category.to_lowercase(),
            prompt: prompt.to_owned(),
            answer: answer.to_owned(),
        })
    }
}

/// One category→prompt→answer triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub category: String,
    pub prompt: String,
    pub answer: String,
}

impl Entry {
    /// Rebuild an entry from persisted bank data, bypassing draft
    /// normalization.
    #[must_use]
    pub fn from_bank(
        category: impl Into<String>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    /// True when `other` refers to the same question slot.
    ///
    /// Slot identity is `(category, prompt)`; the answer is not consulted.
    #[must_use]
    pub fn same_slot(&self, other: &Entry) -> bool {
        self.category == other.category && self.prompt == other.prompt
    }

    /// Grade a free-text submission against the stored answer.
    ///
    /// Comparison is on trimmed text and is case-sensitive.
    #[must_use]
    pub fn grade(&self, submission: &str) -> bool {
        submission.trim() == self.answer.trim()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_fields_and_lowercases_category() {
        let entry = EntryDraft::new("  Food ", " apple ", " manzana ")
            .validate()
            .unwrap();

        assert_eq!(entry.category, "food");
        assert_eq!(entry.prompt, "apple");
        assert_eq!(entry.answer, "manzana");
    }

    #[test]
    fn draft_preserves_prompt_and_answer_case() {
        let entry = EntryDraft::new("cities", "France", "Paris").validate().unwrap();

        assert_eq!(entry.prompt, "France");
        assert_eq!(entry.answer, "Paris");
    }

    #[test]
    fn draft_rejects_blank_fields() {
        let err = EntryDraft::new("   ", "apple", "manzana")
            .validate()
            .unwrap_err();
        assert_eq!(err, EntryError::EmptyCategory);

        let err = EntryDraft::new("food", " ", "manzana").validate().unwrap_err();
        assert_eq!(err, EntryError::EmptyPrompt);

        let err = EntryDraft::new("food", "apple", "").validate().unwrap_err();
        assert_eq!(err, EntryError::EmptyAnswer);
    }

    #[test]
    fn grading_is_exact_on_trimmed_text() {
        let entry = Entry::from_bank("cities", "France", "Paris");

        assert!(entry.grade("Paris"));
        assert!(entry.grade("  Paris "));
        assert!(!entry.grade(" paris "));
        assert!(!entry.grade("PARIS"));
    }

    #[test]
    fn same_slot_ignores_answer() {
        let a = Entry::from_bank("food", "apple", "manzana");
        let b = Entry::from_bank("food", "apple", "pomme");
        let c = Entry::from_bank("food", "pear", "manzana");

        assert!(a.same_slot(&b));
        assert!(!a.same_slot(&c));
    }
}
