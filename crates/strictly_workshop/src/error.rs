//! Session error types.

use derive_more::{Display, Error};

/// An operation was invoked while the session was not in a phase that allows it.
///
/// Rejected operations leave the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Error)]
pub enum SessionError {
    /// Check-in attempted after the player already checked in.
    #[display("Already checked in")]
    AlreadyCheckedIn,
    /// No workshop is waiting to be started.
    #[display("Cannot start workshop now")]
    NotStartable,
    /// No task is open.
    #[display("No tasks available")]
    NoTaskAvailable,
    /// No quiz is running.
    #[display("No quizzes available")]
    NoQuizAvailable,
    /// A quiz answer arrived before the question order was generated.
    #[display("Quiz has not been started yet")]
    QuizNotInitialized,
    /// Exit attempted before both workshops were finished.
    #[display("Cannot exit yet")]
    CannotExitYet,
}

impl SessionError {
    /// Stable machine-readable code for the error.
    pub fn code(self) -> &'static str {
        match self {
            SessionError::AlreadyCheckedIn => "AlreadyCheckedIn",
            SessionError::NotStartable => "NotStartable",
            SessionError::NoTaskAvailable => "NoTaskAvailable",
            SessionError::NoQuizAvailable => "NoQuizAvailable",
            SessionError::QuizNotInitialized => "QuizNotInitialized",
            SessionError::CannotExitYet => "CannotExitYet",
        }
    }
}
