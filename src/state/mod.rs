//! State management module
//!
//! This module holds per-user session state and the flow engines that drive it

pub mod browse;
pub mod quiz;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use browse::BrowseFlow;
pub use quiz::{QuizFlow, AnswerResult};
pub use session::{
    Session, BrowseSession, QuizSession, BrowseStep, QuizStep, Question, QuizSummary,
    QuizRound, Direction, AnswerOutcome, QUESTIONS_PER_ROUND, OPTIONS_PER_QUESTION,
};
pub use storage::{SessionStore, RangeOutcome, RangePrompt, RangeStep};
