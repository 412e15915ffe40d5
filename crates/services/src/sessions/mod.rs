mod engine;
mod progress;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::{AppendError, SessionError};
pub use engine::{QuizPhase, QuizSession, SubmitOutcome};
pub use progress::SessionProgress;
pub use workflow::QuizLoopService;
