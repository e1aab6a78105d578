//! Assignment domain model with per-student completion status.
//!
//! # Invariants
//! - `name` is the identity.
//! - A student with no recorded status counts as not completed.

use crate::model::fields::{AssignmentName, StudentId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: AssignmentName,
    #[serde(default)]
    statuses: BTreeMap<StudentId, bool>,
}

impl Assignment {
    pub fn new(name: AssignmentName) -> Self {
        Self {
            name,
            statuses: BTreeMap::new(),
        }
    }

    pub fn is_same_assignment(&self, other: &Assignment) -> bool {
        self.name == other.name
    }

    pub fn is_completed_by(&self, student_id: &StudentId) -> bool {
        self.statuses.get(student_id).copied().unwrap_or(false)
    }

    pub fn set_status(&mut self, student_id: StudentId, completed: bool) {
        self.statuses.insert(student_id, completed);
    }

    pub fn forget_student(&mut self, student_id: &StudentId) -> bool {
        self.statuses.remove(student_id).is_some()
    }

    /// Moves the status recorded for `old` to `new`.
    pub fn rename_student(&mut self, old: &StudentId, new: &StudentId) -> bool {
        match self.statuses.remove(old) {
            Some(completed) => {
                self.statuses.insert(new.clone(), completed);
                true
            }
            None => false,
        }
    }

    /// Drops statuses for students that fail `keep`. Returns how many were dropped.
    pub fn retain_students(&mut self, keep: impl Fn(&StudentId) -> bool) -> usize {
        let before = self.statuses.len();
        self.statuses.retain(|id, _| keep(id));
        before - self.statuses.len()
    }

    pub fn completed_count(&self) -> usize {
        self.statuses.values().filter(|done| **done).count()
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name.as_str())
    }
}
