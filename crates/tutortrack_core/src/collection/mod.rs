//! Owning collections for students, tutorials and assignments.
//!
//! # Responsibility
//! - Hold the canonical records and enforce identity uniqueness.
//! - Report semantic failures (`Duplicate*`, `*NotFound`) as typed errors.
//!
//! # Invariants
//! - A failing call never leaves a collection partially mutated.
//! - Identity is checked via `is_same_*`, never via structural equality.

pub mod address_book;
pub mod assignment_list;
pub mod tutorial_list;

use crate::model::fields::{AssignmentName, StudentId, TutorialClass};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CollectionResult<T> = Result<T, CollectionError>;

/// Broad classification of collection failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller broke an operation precondition (e.g. duplicate identity).
    Precondition,
    /// A referenced entity does not exist.
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    DuplicateStudent(StudentId),
    StudentNotFound(StudentId),
    DuplicateTutorial(TutorialClass),
    TutorialNotFound(TutorialClass),
    DuplicateAssignment(AssignmentName),
    AssignmentNotFound(AssignmentName),
}

impl CollectionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateStudent(_) | Self::DuplicateTutorial(_) | Self::DuplicateAssignment(_) => {
                ErrorKind::Precondition
            }
            Self::StudentNotFound(_) | Self::TutorialNotFound(_) | Self::AssignmentNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateStudent(id) => write!(f, "student {id} already exists"),
            Self::StudentNotFound(id) => write!(f, "student not found: {id}"),
            Self::DuplicateTutorial(class) => write!(f, "tutorial {class} already exists"),
            Self::TutorialNotFound(class) => write!(f, "tutorial not found: {class}"),
            Self::DuplicateAssignment(name) => write!(f, "assignment `{name}` already exists"),
            Self::AssignmentNotFound(name) => write!(f, "assignment not found: `{name}`"),
        }
    }
}

impl Error for CollectionError {}
