//! Assignment list: the canonical assignment collection.
//!
//! # Invariants
//! - No two assignments share a name.
//! - Status operations on an unknown assignment fail with `AssignmentNotFound`.

use super::{CollectionError, CollectionResult};
use crate::model::assignment::Assignment;
use crate::model::fields::{AssignmentName, StudentId};
use crate::model::student::Student;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AssignmentListRecord", into = "AssignmentListRecord")]
pub struct AssignmentList {
    assignments: Vec<Assignment>,
}

impl AssignmentList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignments(
        assignments: impl IntoIterator<Item = Assignment>,
    ) -> CollectionResult<Self> {
        let mut list = Self::new();
        for assignment in assignments {
            list.add_assignment(assignment)?;
        }
        Ok(list)
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn assignment(&self, name: &AssignmentName) -> Option<&Assignment> {
        self.assignments.iter().find(|a| &a.name == name)
    }

    pub fn has_assignment(&self, assignment: &Assignment) -> bool {
        self.assignments.iter().any(|a| a.is_same_assignment(assignment))
    }

    pub fn add_assignment(&mut self, assignment: Assignment) -> CollectionResult<()> {
        if self.has_assignment(&assignment) {
            return Err(CollectionError::DuplicateAssignment(assignment.name));
        }
        self.assignments.push(assignment);
        Ok(())
    }

    pub fn delete_assignment(&mut self, assignment: &Assignment) -> CollectionResult<Assignment> {
        let index = self
            .assignments
            .iter()
            .position(|a| a.is_same_assignment(assignment))
            .ok_or_else(|| CollectionError::AssignmentNotFound(assignment.name.clone()))?;
        Ok(self.assignments.remove(index))
    }

    /// Summarizes completion of `assignment` across `students`, in their order.
    pub fn get_status(
        &self,
        assignment: &Assignment,
        students: &[Student],
    ) -> CollectionResult<String> {
        let stored = self
            .assignments
            .iter()
            .find(|a| a.is_same_assignment(assignment))
            .ok_or_else(|| CollectionError::AssignmentNotFound(assignment.name.clone()))?;

        let mut summary = format!("Assignment: {}", stored.name);
        if students.is_empty() {
            summary.push_str("\nNo students to report.");
            return Ok(summary);
        }

        let mut completed = 0usize;
        for student in students {
            let done = stored.is_completed_by(&student.student_id);
            if done {
                completed += 1;
            }
            // Writing to a String cannot fail.
            let _ = write!(
                summary,
                "\n{} {}: {}",
                student.student_id,
                student.name,
                if done { "completed" } else { "not completed" }
            );
        }
        let _ = write!(summary, "\n{completed}/{} completed", students.len());
        Ok(summary)
    }

    pub fn set_status(
        &mut self,
        assignment: &Assignment,
        student: &Student,
        completed: bool,
    ) -> CollectionResult<()> {
        let stored = self
            .assignments
            .iter_mut()
            .find(|a| a.is_same_assignment(assignment))
            .ok_or_else(|| CollectionError::AssignmentNotFound(assignment.name.clone()))?;
        stored.set_status(student.student_id.clone(), completed);
        Ok(())
    }

    /// Drops recorded statuses for `student_id` across all assignments.
    pub fn forget_student(&mut self, student_id: &StudentId) {
        for assignment in &mut self.assignments {
            assignment.forget_student(student_id);
        }
    }

    /// Moves recorded statuses from `old` to `new` across all assignments.
    pub fn rename_student(&mut self, old: &StudentId, new: &StudentId) {
        for assignment in &mut self.assignments {
            assignment.rename_student(old, new);
        }
    }

    /// Drops statuses for students that fail `keep`. Returns how many were dropped.
    pub fn retain_students(&mut self, keep: impl Fn(&StudentId) -> bool) -> usize {
        self.assignments
            .iter_mut()
            .map(|assignment| assignment.retain_students(&keep))
            .sum()
    }

    pub fn reset_data(&mut self, other: &AssignmentList) {
        self.assignments = other.assignments.clone();
    }

    pub fn clear(&mut self) {
        self.assignments.clear();
    }
}

impl Display for AssignmentList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.assignments.is_empty() {
            return f.write_str("No assignments.");
        }
        for (index, assignment) in self.assignments.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", index + 1, assignment)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssignmentListRecord {
    #[serde(default)]
    assignments: Vec<Assignment>,
}

impl TryFrom<AssignmentListRecord> for AssignmentList {
    type Error = CollectionError;

    fn try_from(record: AssignmentListRecord) -> Result<Self, Self::Error> {
        Self::from_assignments(record.assignments)
    }
}

impl From<AssignmentList> for AssignmentListRecord {
    fn from(list: AssignmentList) -> Self {
        Self {
            assignments: list.assignments,
        }
    }
}
