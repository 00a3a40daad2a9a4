//! Static reference content: workshops, tasks and quiz banks.

use crate::phase::WorkshopSlot;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// A thematic unit the player completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workshop {
    /// Workshop title.
    pub name: String,
}

/// A real-world action attached to a workshop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// What the player has to do.
    pub name: String,
    /// Index of the owning workshop.
    #[serde(rename = "workshop")]
    pub workshop_index: usize,
    /// Points awarded on completion.
    pub points: i64,
    /// Documentation link for the task.
    pub link: String,
}

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Question text.
    pub question: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Index into `options` of the right answer.
    #[serde(rename = "correct")]
    pub correct_index: usize,
}

impl Quiz {
    /// Returns true if `answer` picks the correct option.
    ///
    /// Negative or out-of-range answers never match.
    pub fn is_correct(&self, answer: i64) -> bool {
        usize::try_from(answer).is_ok_and(|a| a == self.correct_index)
    }
}

/// Immutable content for both workshops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    workshops: [Workshop; 2],
    tasks: [Task; 2],
    quizzes: [Vec<Quiz>; 2],
}

/// Catalog content that cannot drive a playable session.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CatalogError {
    /// A task claims to belong to a different workshop than its slot.
    #[display("Task '{}' is listed under workshop {} but names workshop {}", name, slot, claimed)]
    TaskSlotMismatch {
        /// Task name.
        name: String,
        /// Slot the task sits in.
        slot: usize,
        /// Workshop index the task declares.
        claimed: usize,
    },
    /// A workshop has no quiz questions.
    #[display("Workshop {} has no quiz questions", _0)]
    EmptyQuizBank(#[error(not(source))] usize),
    /// A quiz offers fewer than two options.
    #[display("Quiz '{}' needs at least two options", _0)]
    TooFewOptions(#[error(not(source))] String),
    /// A quiz's correct index points past its options.
    #[display("Quiz '{}' marks option {} correct but has {} options", question, correct, options)]
    CorrectOutOfRange {
        /// Question text.
        question: String,
        /// Declared correct index.
        correct: usize,
        /// Number of options.
        options: usize,
    },
}

fn quiz(question: &str, options: [&str; 3], correct_index: usize) -> Quiz {
    Quiz {
        question: question.to_string(),
        options: options.iter().map(|o| o.to_string()).collect(),
        correct_index,
    }
}

impl Catalog {
    /// Builds a catalog from parts, checking it is playable.
    #[instrument(skip_all)]
    pub fn new(
        workshops: [Workshop; 2],
        tasks: [Task; 2],
        quizzes: [Vec<Quiz>; 2],
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            workshops,
            tasks,
            quizzes,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The AWS Ascend content: a data-lake workshop and an AWS Q CLI workshop.
    pub fn standard() -> Self {
        Self {
            workshops: [
                Workshop {
                    name: "Building a Data Lake with AWS".to_string(),
                },
                Workshop {
                    name: "Building an app with AWS Q CLI".to_string(),
                },
            ],
            tasks: [
                Task {
                    name: "Create S3 bucket and configure data ingestion pipeline".to_string(),
                    workshop_index: 0,
                    points: 5,
                    link: "https://docs.aws.amazon.com/AmazonS3/latest/userguide/creating-bucket.html"
                        .to_string(),
                },
                Task {
                    name: "Build CLI application using AWS Q Developer".to_string(),
                    workshop_index: 1,
                    points: 5,
                    link: "https://docs.aws.amazon.com/amazonq/latest/qdeveloper-ug/getting-started.html"
                        .to_string(),
                },
            ],
            quizzes: [
                vec![
                    quiz(
                        "Which AWS service is the foundation of a data lake?",
                        ["RDS", "S3", "DynamoDB"],
                        1,
                    ),
                    quiz(
                        "What format is commonly used for data lake analytics?",
                        ["CSV only", "Parquet", "XML only"],
                        1,
                    ),
                    quiz(
                        "Which service helps catalog data in a data lake?",
                        ["AWS Glue", "EC2", "Lambda"],
                        0,
                    ),
                    quiz(
                        "What is Amazon Athena used for?",
                        ["Data storage", "Serverless SQL queries", "Load balancing"],
                        1,
                    ),
                    quiz(
                        "Which AWS service provides ETL capabilities?",
                        ["S3", "AWS Glue", "CloudWatch"],
                        1,
                    ),
                ],
                vec![
                    quiz(
                        "What is AWS Q Developer primarily used for?",
                        ["Database queries", "AI-powered coding assistance", "Load balancing"],
                        1,
                    ),
                    quiz(
                        "Which programming languages does AWS Q support?",
                        ["Only Python", "Multiple languages", "Only JavaScript"],
                        1,
                    ),
                    quiz(
                        "AWS Q can help with which of the following?",
                        ["Code generation", "Hardware setup", "Network routing"],
                        0,
                    ),
                    quiz(
                        "What type of AI model powers AWS Q Developer?",
                        ["Rule-based system", "Large Language Model", "Decision tree"],
                        1,
                    ),
                    quiz(
                        "AWS Q Developer integrates with which IDEs?",
                        ["Only VS Code", "Multiple IDEs", "Only IntelliJ"],
                        1,
                    ),
                ],
            ],
        }
    }

    /// Checks that every workshop is playable.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (slot, task) in self.tasks.iter().enumerate() {
            if task.workshop_index != slot {
                warn!(task = %task.name, slot, claimed = task.workshop_index, "Task in wrong slot");
                return Err(CatalogError::TaskSlotMismatch {
                    name: task.name.clone(),
                    slot,
                    claimed: task.workshop_index,
                });
            }
        }

        for (slot, bank) in self.quizzes.iter().enumerate() {
            if bank.is_empty() {
                return Err(CatalogError::EmptyQuizBank(slot));
            }
            for q in bank {
                if q.options.len() < 2 {
                    return Err(CatalogError::TooFewOptions(q.question.clone()));
                }
                if q.correct_index >= q.options.len() {
                    return Err(CatalogError::CorrectOutOfRange {
                        question: q.question.clone(),
                        correct: q.correct_index,
                        options: q.options.len(),
                    });
                }
            }
        }

        debug!("Catalog validated");
        Ok(())
    }

    /// Returns the workshop in `slot`.
    pub fn workshop(&self, slot: WorkshopSlot) -> &Workshop {
        &self.workshops[slot.index()]
    }

    /// Returns the task for the workshop in `slot`.
    pub fn task(&self, slot: WorkshopSlot) -> &Task {
        &self.tasks[slot.index()]
    }

    /// Returns the reference (unshuffled) quiz bank for `slot`.
    pub fn quizzes(&self, slot: WorkshopSlot) -> &[Quiz] {
        &self.quizzes[slot.index()]
    }

    /// Returns both quiz banks in workshop order.
    pub fn quiz_banks(&self) -> &[Vec<Quiz>; 2] {
        &self.quizzes
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_is_valid() {
        let catalog = Catalog::standard();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.quizzes(WorkshopSlot::First).len(), 5);
        assert_eq!(catalog.quizzes(WorkshopSlot::Second).len(), 5);
        assert_eq!(catalog.task(WorkshopSlot::Second).workshop_index, 1);
    }

    #[test]
    fn answers_outside_options_never_match() {
        let q = quiz("?", ["a", "b", "c"], 2);
        assert!(q.is_correct(2));
        assert!(!q.is_correct(-1));
        assert!(!q.is_correct(3));
        assert!(!q.is_correct(i64::MAX));
    }

    #[test]
    fn rejects_bad_correct_index() {
        let standard = Catalog::standard();
        let mut banks = standard.quiz_banks().clone();
        banks[1][0].correct_index = 3;
        let result = Catalog::new(
            [standard.workshop(WorkshopSlot::First).clone(), standard.workshop(WorkshopSlot::Second).clone()],
            [standard.task(WorkshopSlot::First).clone(), standard.task(WorkshopSlot::Second).clone()],
            banks,
        );
        assert!(matches!(result, Err(CatalogError::CorrectOutOfRange { correct: 3, .. })));
    }

    #[test]
    fn rejects_empty_bank() {
        let standard = Catalog::standard();
        let result = Catalog::new(
            [standard.workshop(WorkshopSlot::First).clone(), standard.workshop(WorkshopSlot::Second).clone()],
            [standard.task(WorkshopSlot::First).clone(), standard.task(WorkshopSlot::Second).clone()],
            [standard.quizzes(WorkshopSlot::First).to_vec(), Vec::new()],
        );
        assert_eq!(result, Err(CatalogError::EmptyQuizBank(1)));
    }
}
