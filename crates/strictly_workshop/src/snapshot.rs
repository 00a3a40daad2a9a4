//! Serializable views of session state.

use crate::catalog::Quiz;
use crate::phase::{Phase, WorkshopSlot};
use serde::{Deserialize, Serialize};

/// Complete progress state of one session, as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Current phase (0-8).
    pub phase: Phase,
    /// Accumulated score.
    pub score: i64,
    /// Active workshop (0 or 1).
    pub current_workshop: WorkshopSlot,
    /// Position within the active workshop's quiz sequence.
    pub quiz_index: usize,
    /// Per-workshop question order, `null` until the first quiz starts.
    pub shuffled_quizzes: Option<[Vec<Quiz>; 2]>,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::CheckedOut,
            score: 0,
            current_workshop: WorkshopSlot::First,
            quiz_index: 0,
            shuffled_quizzes: None,
        }
    }
}

/// Position within the running quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    /// 1-based number of the current question.
    pub current: usize,
    /// Questions in this workshop's quiz.
    pub total: usize,
}

/// The question currently awaiting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentQuiz {
    /// The question itself.
    #[serde(flatten)]
    pub quiz: Quiz,
    /// Where it sits in the sequence.
    pub progress: QuizProgress,
}

/// Result of a successful state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Message for the player.
    pub message: String,
    /// Session state after the transition.
    pub snapshot: GameSnapshot,
}

/// Result of answering a quiz question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAnswer {
    /// Whether the chosen option was right.
    pub correct: bool,
    /// Message for the player.
    pub message: String,
    /// Session state after scoring.
    pub snapshot: GameSnapshot,
}

/// Result of leaving the quest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Whether the final score reached the winning threshold.
    pub won: bool,
    /// Message for the player.
    pub message: String,
    /// Final session state.
    pub snapshot: GameSnapshot,
}
