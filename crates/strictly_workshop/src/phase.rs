//! Phase and workshop markers for the quest state machine.
//!
//! Both enums serialize as plain integers so snapshots keep the
//! `{phase: 3, currentWorkshop: 0}` wire shape the browser front-end reads.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter};

/// Position in the fixed linear progression of the quest.
#[derive(
    Debug,
    Display,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumCount,
    Serialize,
    Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum Phase {
    /// Player has not checked in yet.
    #[display("Check-in (0)")]
    CheckedOut,
    /// Checked in, first workshop ready to start.
    #[display("Workshop 1: Data Lake (1)")]
    Workshop1Intro,
    /// First workshop's task is open.
    #[display("Task 1 (2)")]
    Task1,
    /// First workshop's quiz is running.
    #[display("Quiz 1 (3)")]
    Quiz1,
    /// First workshop done, second ready to start.
    #[display("Workshop 2: AWS Q CLI (4)")]
    Workshop2Intro,
    /// Second workshop's task is open.
    #[display("Task 2 (5)")]
    Task2,
    /// Second workshop's quiz is running.
    #[display("Quiz 2 (6)")]
    Quiz2,
    /// Both workshops done, player may exit.
    #[display("Exit (7)")]
    ReadyToExit,
    /// Player has exited. Terminal.
    #[display("Complete (8)")]
    Complete,
}

impl Phase {
    /// Returns the numeric phase value (0-8).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Returns the phase that follows this one in the linear flow.
    ///
    /// `Complete` is terminal and maps to itself.
    pub fn next(self) -> Self {
        match self {
            Phase::CheckedOut => Phase::Workshop1Intro,
            Phase::Workshop1Intro => Phase::Task1,
            Phase::Task1 => Phase::Quiz1,
            Phase::Quiz1 => Phase::Workshop2Intro,
            Phase::Workshop2Intro => Phase::Task2,
            Phase::Task2 => Phase::Quiz2,
            Phase::Quiz2 => Phase::ReadyToExit,
            Phase::ReadyToExit | Phase::Complete => Phase::Complete,
        }
    }

    /// Human label used in status summaries.
    pub fn label(self) -> &'static str {
        match self {
            Phase::CheckedOut => "Check-in",
            Phase::Workshop1Intro => "Workshop 1: Data Lake",
            Phase::Task1 => "Task 1",
            Phase::Quiz1 => "Quiz 1",
            Phase::Workshop2Intro => "Workshop 2: AWS Q CLI",
            Phase::Task2 => "Task 2",
            Phase::Quiz2 => "Quiz 2",
            Phase::ReadyToExit => "Exit",
            Phase::Complete => "Complete",
        }
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.index()
    }
}

impl TryFrom<u8> for Phase {
    type Error = OutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use strum::IntoEnumIterator;
        Phase::iter()
            .find(|p| p.index() == value)
            .ok_or(OutOfRange { kind: "phase", value })
    }
}

/// Which of the two workshops is active.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum WorkshopSlot {
    /// First workshop (index 0).
    #[default]
    First,
    /// Second workshop (index 1).
    Second,
}

impl WorkshopSlot {
    /// Index into the catalog's per-workshop tables.
    pub fn index(self) -> usize {
        match self {
            WorkshopSlot::First => 0,
            WorkshopSlot::Second => 1,
        }
    }

    /// 1-based number shown to players.
    pub fn number(self) -> usize {
        self.index() + 1
    }

    /// The phase in which this workshop can be started.
    pub fn intro_phase(self) -> Phase {
        match self {
            WorkshopSlot::First => Phase::Workshop1Intro,
            WorkshopSlot::Second => Phase::Workshop2Intro,
        }
    }

    /// The phase in which this workshop's task is open.
    pub fn task_phase(self) -> Phase {
        match self {
            WorkshopSlot::First => Phase::Task1,
            WorkshopSlot::Second => Phase::Task2,
        }
    }

    /// The phase in which this workshop's quiz runs.
    pub fn quiz_phase(self) -> Phase {
        match self {
            WorkshopSlot::First => Phase::Quiz1,
            WorkshopSlot::Second => Phase::Quiz2,
        }
    }
}

impl From<WorkshopSlot> for u8 {
    fn from(slot: WorkshopSlot) -> Self {
        slot.index() as u8
    }
}

impl TryFrom<u8> for WorkshopSlot {
    type Error = OutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WorkshopSlot::First),
            1 => Ok(WorkshopSlot::Second),
            _ => Err(OutOfRange {
                kind: "workshop",
                value,
            }),
        }
    }
}

/// A numeric phase or workshop value with no matching variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("{} value {} is out of range", kind, value)]
pub struct OutOfRange {
    /// What was being parsed.
    pub kind: &'static str,
    /// The rejected value.
    pub value: u8,
}
