//! Tutorial list: the canonical tutorial collection.
//!
//! # Invariants
//! - No two tutorials share a `TutorialClass`.
//! - `set_attendance` against an unknown class is a silent `false`, not an error.

use super::{CollectionError, CollectionResult};
use crate::model::fields::{StudentId, TutorialClass};
use crate::model::student::Student;
use crate::model::tutorial::Tutorial;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TutorialListRecord", into = "TutorialListRecord")]
pub struct TutorialList {
    tutorials: Vec<Tutorial>,
}

impl TutorialList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tutorials(tutorials: impl IntoIterator<Item = Tutorial>) -> CollectionResult<Self> {
        let mut list = Self::new();
        for tutorial in tutorials {
            list.add_tutorial(tutorial)?;
        }
        Ok(list)
    }

    pub fn tutorials(&self) -> &[Tutorial] {
        &self.tutorials
    }

    pub fn len(&self) -> usize {
        self.tutorials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tutorials.is_empty()
    }

    pub fn tutorial(&self, tutorial_class: &TutorialClass) -> Option<&Tutorial> {
        self.tutorials
            .iter()
            .find(|t| t.tutorial_class() == tutorial_class)
    }

    pub fn has_tutorial(&self, tutorial: &Tutorial) -> bool {
        self.tutorials.iter().any(|t| t.is_same_tutorial(tutorial))
    }

    pub fn has_tutorial_class(&self, tutorial_class: &TutorialClass) -> bool {
        self.tutorial(tutorial_class).is_some()
    }

    pub fn add_tutorial(&mut self, tutorial: Tutorial) -> CollectionResult<()> {
        if self.has_tutorial(&tutorial) {
            return Err(CollectionError::DuplicateTutorial(
                tutorial.tutorial_class().clone(),
            ));
        }
        self.tutorials.push(tutorial);
        Ok(())
    }

    pub fn delete_tutorial(&mut self, tutorial: &Tutorial) -> CollectionResult<Tutorial> {
        let index = self
            .tutorials
            .iter()
            .position(|t| t.is_same_tutorial(tutorial))
            .ok_or_else(|| CollectionError::TutorialNotFound(tutorial.tutorial_class().clone()))?;
        Ok(self.tutorials.remove(index))
    }

    /// Adds `student` to the roster of `tutorial_class`.
    ///
    /// Re-assigning an already rostered student is accepted and changes nothing.
    pub fn assign_student(
        &mut self,
        student: &Student,
        tutorial_class: &TutorialClass,
    ) -> CollectionResult<()> {
        let tutorial = self
            .tutorial_mut(tutorial_class)
            .ok_or_else(|| CollectionError::TutorialNotFound(tutorial_class.clone()))?;
        tutorial.add_student(student.student_id.clone());
        Ok(())
    }

    /// Removes `student_id` from every roster. Returns how many rosters changed.
    pub fn unassign_student(&mut self, student_id: &StudentId) -> usize {
        self.tutorials
            .iter_mut()
            .map(|t| t.remove_student(student_id))
            .filter(|changed| *changed)
            .count()
    }

    /// Re-keys `old` to `new` in every roster. Returns how many rosters changed.
    pub fn rename_student(&mut self, old: &StudentId, new: &StudentId) -> usize {
        self.tutorials
            .iter_mut()
            .map(|t| t.rename_student(old, new))
            .filter(|changed| *changed)
            .count()
    }

    /// Removes every rostered id for which `keep(class, id)` is false, along
    /// with its attendance. Returns how many roster entries were removed.
    pub fn retain_rostered(&mut self, keep: impl Fn(&TutorialClass, &StudentId) -> bool) -> usize {
        let mut removed = 0;
        for tutorial in &mut self.tutorials {
            let class = tutorial.tutorial_class().clone();
            let dropped: Vec<StudentId> = tutorial
                .roster()
                .iter()
                .filter(|id| !keep(&class, id))
                .cloned()
                .collect();
            for id in &dropped {
                tutorial.remove_student(id);
            }
            removed += dropped.len();
        }
        removed
    }

    /// Marks `student_id` present on `date` in the first tutorial matching
    /// `tutorial_class`.
    ///
    /// Returns `false` when no tutorial matches or the student is not rostered.
    pub fn set_attendance(
        &mut self,
        tutorial_class: &TutorialClass,
        date: NaiveDate,
        student_id: &StudentId,
    ) -> bool {
        self.tutorial_mut(tutorial_class)
            .map(|tutorial| tutorial.set_attendance(date, student_id))
            .unwrap_or(false)
    }

    pub fn reset_data(&mut self, other: &TutorialList) {
        self.tutorials = other.tutorials.clone();
    }

    pub fn clear(&mut self) {
        self.tutorials.clear();
    }

    fn tutorial_mut(&mut self, tutorial_class: &TutorialClass) -> Option<&mut Tutorial> {
        self.tutorials
            .iter_mut()
            .find(|t| t.tutorial_class() == tutorial_class)
    }
}

impl Display for TutorialList {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.tutorials.is_empty() {
            return f.write_str("No tutorials.");
        }
        for (index, tutorial) in self.tutorials.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            write!(f, "{}. {}", index + 1, tutorial)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TutorialListRecord {
    #[serde(default)]
    tutorials: Vec<Tutorial>,
}

impl TryFrom<TutorialListRecord> for TutorialList {
    type Error = CollectionError;

    fn try_from(record: TutorialListRecord) -> Result<Self, Self::Error> {
        Self::from_tutorials(record.tutorials)
    }
}

impl From<TutorialList> for TutorialListRecord {
    fn from(list: TutorialList) -> Self {
        Self {
            tutorials: list.tutorials,
        }
    }
}
