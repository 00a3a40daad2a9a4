//! Pure workshop-quest game logic.
//!
//! A player checks in, works through two workshops (each a task followed by
//! a shuffled multiple-choice quiz) and exits with a final score. This crate
//! holds the state machine and its reference content only; transports live
//! in `strictly_ascend`.
//!
//! ```
//! use strictly_workshop::{GameSession, Phase};
//!
//! let mut session = GameSession::default();
//! session.check_in().unwrap();
//! session.start_workshop().unwrap();
//! let outcome = session.complete_task().unwrap();
//! assert_eq!(outcome.snapshot.phase, Phase::Quiz1);
//! assert_eq!(outcome.snapshot.score, 15);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod catalog;
mod error;
mod phase;
mod session;
mod snapshot;

pub use catalog::{Catalog, CatalogError, Quiz, Task, Workshop};
pub use error::SessionError;
pub use phase::{OutOfRange, Phase, WorkshopSlot};
pub use session::{
    CHECK_IN_BONUS, CORRECT_ANSWER_POINTS, EXIT_BONUS, GameSession, MAX_SCORE, ShuffleMode,
    WIN_THRESHOLD, WRONG_ANSWER_PENALTY,
};
pub use snapshot::{CurrentQuiz, ExitOutcome, GameSnapshot, Outcome, QuizAnswer, QuizProgress};
