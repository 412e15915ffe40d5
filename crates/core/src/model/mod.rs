mod bank;
mod entry;
mod session;

pub use bank::{BankError, Slot, VocabularyBank};
pub use entry::{Entry, EntryDraft, EntryError};
pub use session::{AnswerRecord, QuizSummary, QuizSummaryError};
