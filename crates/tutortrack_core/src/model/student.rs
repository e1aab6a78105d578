//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record held by the address book.
//! - Separate identity (`StudentId`) from structural equality.
//!
//! # Invariants
//! - `student_id` is the identity; two students with the same id are the
//!   "same student" even when other fields differ.
//! - Records are replaced wholesale; there is no field-level patch API.

use crate::model::fields::{Email, Name, Phone, Remark, StudentId, TutorialClass};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: StudentId,
    pub name: Name,
    pub phone: Phone,
    pub email: Email,
    /// Tutorial the student is rostered in, if any.
    #[serde(default)]
    pub tutorial_class: Option<TutorialClass>,
    #[serde(default)]
    pub remark: Remark,
}

impl Student {
    /// Creates an unassigned student with an empty remark.
    pub fn new(student_id: StudentId, name: Name, phone: Phone, email: Email) -> Self {
        Self {
            student_id,
            name,
            phone,
            email,
            tutorial_class: None,
            remark: Remark::default(),
        }
    }

    /// Identity comparison used by collection membership checks.
    pub fn is_same_student(&self, other: &Student) -> bool {
        self.student_id == other.student_id
    }

    /// Returns an edited copy assigned to `tutorial_class`.
    pub fn with_tutorial_class(&self, tutorial_class: Option<TutorialClass>) -> Self {
        Self {
            tutorial_class,
            ..self.clone()
        }
    }

    /// Returns an edited copy carrying `remark`.
    pub fn with_remark(&self, remark: Remark) -> Self {
        Self {
            remark,
            ..self.clone()
        }
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} | phone: {} | email: {} | tutorial: {}",
            self.student_id,
            self.name,
            self.phone,
            self.email,
            self.tutorial_class
                .as_ref()
                .map(TutorialClass::as_str)
                .unwrap_or("-"),
        )?;
        if !self.remark.is_empty() {
            write!(f, " | remark: {}", self.remark)?;
        }
        Ok(())
    }
}
