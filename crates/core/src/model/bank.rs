use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Entry;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BankError {
    #[error("duplicate prompt {prompt:?} in category {category:?}")]
    DuplicatePrompt { category: String, prompt: String },
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

/// One slot inside a category: prompt → answer.
pub type Slot = BTreeMap<String, String>;

/// The persisted vocabulary, grouped by category.
///
/// Each category holds an ordered list of slots. New entries always land in
/// the first slot; the list shape is kept for compatibility with existing
/// bank files that may carry more than one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VocabularyBank {
    categories: BTreeMap<String, Vec<Slot>>,
}

impl VocabularyBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that no `(category, prompt)` pair appears in more than one slot.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicatePrompt` for the first repeated pair.
    pub fn validate(&self) -> Result<(), BankError> {
        let mut seen = HashSet::new();
        for (category, slots) in &self.categories {
            for slot in slots {
                for prompt in slot.keys() {
                    if !seen.insert((category.as_str(), prompt.as_str())) {
                        return Err(BankError::DuplicatePrompt {
                            category: category.clone(),
                            prompt: prompt.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Flatten every slot of every category into a list of entries.
    #[must_use]
    pub fn flatten(&self) -> Vec<Entry> {
        self.categories
            .iter()
            .flat_map(|(category, slots)| {
                slots.iter().flat_map(move |slot| {
                    slot.iter().map(move |(prompt, answer)| {
                        Entry::from_bank(category.as_str(), prompt.as_str(), answer.as_str())
                    })
                })
            })
            .collect()
    }

    /// True when the bank holds this exact `(category, prompt, answer)`
    /// triple. A different stored answer for the same prompt does not count.
    #[must_use]
    pub fn contains(&self, entry: &Entry) -> bool {
        self.categories
            .get(&entry.category)
            .is_some_and(|slots| {
                slots
                    .iter()
                    .any(|slot| slot.get(&entry.prompt) == Some(&entry.answer))
            })
    }

    /// Merge an entry into the category's first slot, creating the category
    /// and slot if absent. An existing answer for the same prompt is
    /// replaced.
    pub fn merge(&mut self, entry: &Entry) {
        let slots = self
            .categories
            .entry(entry.category.clone())
            .or_insert_with(|| vec![Slot::new()]);
        if slots.is_empty() {
            slots.push(Slot::new());
        }
        slots[0].insert(entry.prompt.clone(), entry.answer.clone());
    }

    /// Total number of prompt→answer pairs across all categories and slots.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.categories
            .values()
            .flat_map(|slots| slots.iter().map(Slot::len))
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bank() -> VocabularyBank {
        serde_json::from_value(serde_json::json!({
            "food": [{"apple": "manzana", "bread": "pan"}],
            "sports": [{"run": "correr"}]
        }))
        .unwrap()
    }

    #[test]
    fn deserializes_category_slot_shape() {
        let bank = sample_bank();
        assert_eq!(bank.total_entries(), 3);
        assert!(!bank.is_empty());
    }

    #[test]
    fn flatten_yields_every_pair() {
        let bank = sample_bank();
        let entries = bank.flatten();

        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&Entry::from_bank("food", "apple", "manzana")));
        assert!(entries.contains(&Entry::from_bank("sports", "run", "correr")));
    }

    #[test]
    fn contains_matches_exact_triple_only() {
        let bank = sample_bank();

        assert!(bank.contains(&Entry::from_bank("food", "apple", "manzana")));
        assert!(!bank.contains(&Entry::from_bank("food", "apple", "pomme")));
        assert!(!bank.contains(&Entry::from_bank("drinks", "apple", "manzana")));
    }

    #[test]
    fn merge_creates_category_and_replaces_answer() {
        let mut bank = sample_bank();

        bank.merge(&Entry::from_bank("animals", "dog", "perro"));
        assert!(bank.contains(&Entry::from_bank("animals", "dog", "perro")));

        bank.merge(&Entry::from_bank("food", "apple", "pomme"));
        assert!(bank.contains(&Entry::from_bank("food", "apple", "pomme")));
        assert!(!bank.contains(&Entry::from_bank("food", "apple", "manzana")));
        assert_eq!(bank.total_entries(), 4);
    }

    #[test]
    fn validate_rejects_prompt_repeated_across_slots() {
        let bank: VocabularyBank = serde_json::from_value(serde_json::json!({
            "food": [{"apple": "manzana"}, {"apple": "pomme"}]
        }))
        .unwrap();

        let err = bank.validate().unwrap_err();
        assert_eq!(
            err,
            BankError::DuplicatePrompt {
                category: "food".into(),
                prompt: "apple".into()
            }
        );
    }

    #[test]
    fn validate_accepts_same_prompt_in_different_categories() {
        let bank: VocabularyBank = serde_json::from_value(serde_json::json!({
            "food": [{"apple": "manzana"}],
            "trees": [{"apple": "manzano"}]
        }))
        .unwrap();

        assert!(bank.validate().is_ok());
    }
}
