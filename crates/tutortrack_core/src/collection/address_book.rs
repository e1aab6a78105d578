//! Address book: the canonical student collection.
//!
//! # Invariants
//! - No two students share a `StudentId`.
//! - `set_student` keeps the replaced student's position.

use super::{CollectionError, CollectionResult};
use crate::model::fields::{StudentId, TutorialClass};
use crate::model::student::Student;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AddressBookRecord", into = "AddressBookRecord")]
pub struct AddressBook {
    students: Vec<Student>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a book from `students`, rejecting duplicate ids.
    pub fn from_students(students: impl IntoIterator<Item = Student>) -> CollectionResult<Self> {
        let mut book = Self::new();
        for student in students {
            book.add_student(student)?;
        }
        Ok(book)
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn has_student(&self, student: &Student) -> bool {
        self.students.iter().any(|s| s.is_same_student(student))
    }

    pub fn has_student_id(&self, student_id: &StudentId) -> bool {
        self.student_by_id(student_id).is_some()
    }

    pub fn student_by_id(&self, student_id: &StudentId) -> Option<&Student> {
        self.students.iter().find(|s| &s.student_id == student_id)
    }

    pub fn add_student(&mut self, student: Student) -> CollectionResult<()> {
        if self.has_student(&student) {
            return Err(CollectionError::DuplicateStudent(student.student_id));
        }
        self.students.push(student);
        Ok(())
    }

    pub fn remove_student(&mut self, student: &Student) -> CollectionResult<Student> {
        let index = self
            .position_of(student)
            .ok_or_else(|| CollectionError::StudentNotFound(student.student_id.clone()))?;
        Ok(self.students.remove(index))
    }

    /// Replaces `target` with `edited` in place.
    ///
    /// # Errors
    /// - `StudentNotFound` when `target` is absent.
    /// - `DuplicateStudent` when `edited` takes an id owned by another student.
    pub fn set_student(&mut self, target: &Student, edited: Student) -> CollectionResult<()> {
        let index = self
            .position_of(target)
            .ok_or_else(|| CollectionError::StudentNotFound(target.student_id.clone()))?;
        if !target.is_same_student(&edited) && self.has_student(&edited) {
            return Err(CollectionError::DuplicateStudent(edited.student_id));
        }
        self.students[index] = edited;
        Ok(())
    }

    /// Clears `tutorial_class` on every student assigned to `tutorial_class`.
    /// Returns how many students changed.
    pub fn clear_tutorial_class(&mut self, tutorial_class: &TutorialClass) -> usize {
        let mut changed = 0;
        for student in &mut self.students {
            if student.tutorial_class.as_ref() == Some(tutorial_class) {
                student.tutorial_class = None;
                changed += 1;
            }
        }
        changed
    }

    pub fn reset_data(&mut self, other: &AddressBook) {
        self.students = other.students.clone();
    }

    pub fn clear(&mut self) {
        self.students.clear();
    }

    fn position_of(&self, student: &Student) -> Option<usize> {
        self.students.iter().position(|s| s.is_same_student(student))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AddressBookRecord {
    #[serde(default)]
    students: Vec<Student>,
}

impl TryFrom<AddressBookRecord> for AddressBook {
    type Error = CollectionError;

    fn try_from(record: AddressBookRecord) -> Result<Self, Self::Error> {
        Self::from_students(record.students)
    }
}

impl From<AddressBook> for AddressBookRecord {
    fn from(book: AddressBook) -> Self {
        Self {
            students: book.students,
        }
    }
}
