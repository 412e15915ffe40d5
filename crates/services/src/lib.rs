#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use error::{AppendError, SessionError};

pub use sessions::{
    QuizLoopService, QuizPhase, QuizSession, SessionProgress, SubmitOutcome,
};
