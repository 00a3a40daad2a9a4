//! The quest state machine for a single player.
//!
//! A [`GameSession`] walks the fixed flow
//!
//! ```text
//! 0 --check_in--> 1 --start_workshop--> 2 --complete_task--> 3 --submit_answer x5--> 4
//! 4 --start_workshop--> 5 --complete_task--> 6 --submit_answer x5--> 7 --exit--> 8
//! ```
//!
//! Every operation checks the (phase, workshop) pair first and returns a
//! [`SessionError`] without touching state when the pair does not allow it.

use crate::catalog::{Catalog, Quiz, Task, Workshop};
use crate::error::SessionError;
use crate::phase::{Phase, WorkshopSlot};
use crate::snapshot::{CurrentQuiz, ExitOutcome, GameSnapshot, Outcome, QuizAnswer, QuizProgress};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Points for checking in.
pub const CHECK_IN_BONUS: i64 = 10;
/// Points for a correct quiz answer.
pub const CORRECT_ANSWER_POINTS: i64 = 3;
/// Points lost for a wrong quiz answer.
pub const WRONG_ANSWER_PENALTY: i64 = 1;
/// Points for exiting after both workshops.
pub const EXIT_BONUS: i64 = 10;
/// Final score needed to win.
pub const WIN_THRESHOLD: i64 = 50;
/// Nominal maximum score, shown in status summaries.
pub const MAX_SCORE: i64 = 100;

/// How quiz order is generated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShuffleMode {
    /// Fresh entropy for every session.
    #[default]
    Random,
    /// Reproducible order from a fixed seed.
    Seeded(u64),
}

impl ShuffleMode {
    fn rng(self) -> StdRng {
        match self {
            ShuffleMode::Random => StdRng::from_rng(&mut rand::rng()),
            ShuffleMode::Seeded(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

/// Mutable progress of one player through the quest.
#[derive(Debug, Clone)]
pub struct GameSession {
    catalog: Arc<Catalog>,
    shuffle: ShuffleMode,
    rng: StdRng,
    phase: Phase,
    score: i64,
    current_workshop: WorkshopSlot,
    quiz_index: usize,
    shuffled_quizzes: Option<[Vec<Quiz>; 2]>,
}

impl GameSession {
    /// Creates a session at the check-in desk.
    #[instrument(skip(catalog))]
    pub fn new(catalog: Arc<Catalog>, shuffle: ShuffleMode) -> Self {
        debug!("Creating game session");
        Self {
            catalog,
            shuffle,
            rng: shuffle.rng(),
            phase: Phase::CheckedOut,
            score: 0,
            current_workshop: WorkshopSlot::First,
            quiz_index: 0,
            shuffled_quizzes: None,
        }
    }

    /// Rebuilds a session from a saved snapshot.
    ///
    /// A quiz index past the end of its workshop's sequence is reset to 0.
    #[instrument(skip(catalog, snapshot), fields(phase = %snapshot.phase, score = snapshot.score))]
    pub fn resume(catalog: Arc<Catalog>, shuffle: ShuffleMode, snapshot: GameSnapshot) -> Self {
        let mut session = Self::new(catalog, shuffle);
        session.phase = snapshot.phase;
        session.score = snapshot.score;
        session.current_workshop = snapshot.current_workshop;
        session.shuffled_quizzes = snapshot.shuffled_quizzes;

        let bank_len = session.bank_len();
        session.quiz_index = if snapshot.quiz_index < bank_len {
            snapshot.quiz_index
        } else {
            if snapshot.quiz_index != 0 {
                warn!(quiz_index = snapshot.quiz_index, bank_len, "Quiz index out of range, rewinding");
            }
            0
        };

        info!("Session resumed");
        session
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current score.
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Active workshop.
    pub fn current_workshop(&self) -> WorkshopSlot {
        self.current_workshop
    }

    /// Position within the active quiz.
    pub fn quiz_index(&self) -> usize {
        self.quiz_index
    }

    /// Question order for both workshops, once generated.
    pub fn shuffled_quizzes(&self) -> Option<&[Vec<Quiz>; 2]> {
        self.shuffled_quizzes.as_ref()
    }

    /// Reference content this session plays through.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Serializable copy of the progress state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            phase: self.phase,
            score: self.score,
            current_workshop: self.current_workshop,
            quiz_index: self.quiz_index,
            shuffled_quizzes: self.shuffled_quizzes.clone(),
        }
    }

    fn in_intro(&self) -> bool {
        self.phase == self.current_workshop.intro_phase()
    }

    fn in_task(&self) -> bool {
        self.phase == self.current_workshop.task_phase()
    }

    fn in_quiz(&self) -> bool {
        self.phase == self.current_workshop.quiz_phase()
    }

    fn bank_len(&self) -> usize {
        match &self.shuffled_quizzes {
            Some(banks) => banks[self.current_workshop.index()].len(),
            None => self.catalog.quizzes(self.current_workshop).len(),
        }
    }

    /// Generates the question order for both workshops if not done yet.
    fn ensure_shuffled(&mut self) {
        if self.shuffled_quizzes.is_some() {
            return;
        }
        let mut banks = self.catalog.quiz_banks().clone();
        for bank in banks.iter_mut() {
            bank.shuffle(&mut self.rng);
        }
        debug!(shuffle = ?self.shuffle, "Quiz order generated");
        self.shuffled_quizzes = Some(banks);
    }

    fn outcome(&self, message: String) -> Outcome {
        Outcome {
            message,
            snapshot: self.snapshot(),
        }
    }

    /// Checks the player in. Only legal before anything else has happened.
    ///
    /// # Errors
    ///
    /// [`SessionError::AlreadyCheckedIn`] once past check-in.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn check_in(&mut self) -> Result<Outcome, SessionError> {
        if self.phase != Phase::CheckedOut {
            warn!("Check-in rejected");
            return Err(SessionError::AlreadyCheckedIn);
        }
        self.phase = Phase::Workshop1Intro;
        self.score += CHECK_IN_BONUS;
        info!(score = self.score, "Player checked in");
        Ok(self.outcome(format!("Welcome to AWS Ascend! +{} points", CHECK_IN_BONUS)))
    }

    /// Starts the active workshop.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotStartable`] unless a workshop intro is pending.
    #[instrument(skip(self), fields(phase = %self.phase, workshop = self.current_workshop.number()))]
    pub fn start_workshop(&mut self) -> Result<Outcome, SessionError> {
        if !self.in_intro() {
            warn!("Workshop start rejected");
            return Err(SessionError::NotStartable);
        }
        self.phase = self.phase.next();
        let name = &self.catalog.workshop(self.current_workshop).name;
        info!(workshop = %name, "Workshop started");
        Ok(self.outcome(format!("Started {}", name)))
    }

    /// Completes the active workshop's task and opens its quiz.
    ///
    /// # Errors
    ///
    /// [`SessionError::NoTaskAvailable`] unless a task is open.
    #[instrument(skip(self), fields(phase = %self.phase, workshop = self.current_workshop.number()))]
    pub fn complete_task(&mut self) -> Result<Outcome, SessionError> {
        if !self.in_task() {
            warn!("Task completion rejected");
            return Err(SessionError::NoTaskAvailable);
        }
        let points = self.catalog.task(self.current_workshop).points;
        self.score += points;
        self.phase = self.phase.next();
        self.quiz_index = 0;
        self.ensure_shuffled();
        info!(score = self.score, "Task completed, quiz open");
        Ok(self.outcome(format!("Task completed! +{} points", points)))
    }

    /// Returns the question awaiting an answer, or `None` outside a quiz.
    #[instrument(skip(self), fields(phase = %self.phase, quiz_index = self.quiz_index))]
    pub fn current_quiz(&mut self) -> Option<CurrentQuiz> {
        if !self.in_quiz() {
            debug!("No quiz running");
            return None;
        }
        self.ensure_shuffled();
        let bank = &self.shuffled_quizzes.as_ref()?[self.current_workshop.index()];
        let quiz = bank.get(self.quiz_index)?.clone();
        Some(CurrentQuiz {
            quiz,
            progress: QuizProgress {
                current: self.quiz_index + 1,
                total: bank.len(),
            },
        })
    }

    /// Scores `answer` against the current question and advances.
    ///
    /// Finishing the first workshop's quiz opens the second workshop;
    /// finishing the second makes the player ready to exit.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoQuizAvailable`] outside a quiz phase.
    /// - [`SessionError::QuizNotInitialized`] if no question order exists yet.
    #[instrument(skip(self), fields(phase = %self.phase, quiz_index = self.quiz_index))]
    pub fn submit_answer(&mut self, answer: i64) -> Result<QuizAnswer, SessionError> {
        if !self.in_quiz() {
            warn!("Quiz answer rejected");
            return Err(SessionError::NoQuizAvailable);
        }
        let slot = self.current_workshop;
        let bank = self
            .shuffled_quizzes
            .as_ref()
            .map(|banks| &banks[slot.index()])
            .ok_or(SessionError::QuizNotInitialized)?;
        let quiz = bank.get(self.quiz_index).ok_or(SessionError::QuizNotInitialized)?;
        let bank_len = bank.len();

        let correct = quiz.is_correct(answer);
        if correct {
            self.score += CORRECT_ANSWER_POINTS;
        } else {
            self.score -= WRONG_ANSWER_PENALTY;
        }
        self.quiz_index += 1;

        if self.quiz_index >= bank_len {
            self.quiz_index = 0;
            match slot {
                WorkshopSlot::First => {
                    self.phase = Phase::Workshop2Intro;
                    self.current_workshop = WorkshopSlot::Second;
                    info!("First quiz finished, second workshop unlocked");
                }
                WorkshopSlot::Second => {
                    self.phase = Phase::ReadyToExit;
                    info!("Second quiz finished, ready to exit");
                }
            }
        }

        debug!(correct, score = self.score, "Answer scored");
        let message = if correct {
            format!("Correct! +{} points", CORRECT_ANSWER_POINTS)
        } else {
            format!("Wrong! -{} point", WRONG_ANSWER_PENALTY)
        };
        Ok(QuizAnswer {
            correct,
            message,
            snapshot: self.snapshot(),
        })
    }

    /// Leaves the quest and settles the final score.
    ///
    /// # Errors
    ///
    /// [`SessionError::CannotExitYet`] unless both quizzes are done.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn exit(&mut self) -> Result<ExitOutcome, SessionError> {
        if self.phase != Phase::ReadyToExit {
            warn!("Exit rejected");
            return Err(SessionError::CannotExitYet);
        }
        self.score += EXIT_BONUS;
        self.phase = Phase::Complete;
        let won = self.score >= WIN_THRESHOLD;
        info!(score = self.score, won, "Player exited");
        Ok(ExitOutcome {
            won,
            message: format!(
                "Workshop completed! +{} points. Final Score: {}",
                EXIT_BONUS, self.score
            ),
            snapshot: self.snapshot(),
        })
    }

    /// The open task, if any.
    pub fn current_task(&self) -> Option<&Task> {
        self.in_task().then(|| self.catalog.task(self.current_workshop))
    }

    /// The workshop waiting to be started, if any.
    pub fn current_workshop_intro(&self) -> Option<&Workshop> {
        self.in_intro().then(|| self.catalog.workshop(self.current_workshop))
    }

    /// Discards all progress, including the question order.
    #[instrument(skip(self), fields(phase = %self.phase, score = self.score))]
    pub fn reset(&mut self) {
        *self = Self::new(Arc::clone(&self.catalog), self.shuffle);
        info!("Session reset");
    }

    /// Text summary for agent-facing tools.
    pub fn status_summary(&self) -> String {
        format!(
            "🎮 Current Game Status:\n- Phase: {}\n- Score: {}/{}\n- Current Workshop: {}\n- Quiz Progress: {}/{}",
            self.phase.label(),
            self.score,
            MAX_SCORE,
            self.current_workshop.number(),
            self.quiz_index,
            self.bank_len()
        )
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Arc::new(Catalog::standard()), ShuffleMode::Random)
    }
}
