//! Tutorial domain model: roster and attendance for one class.
//!
//! # Invariants
//! - `tutorial_class` is the identity.
//! - The roster holds each `StudentId` at most once, in insertion order.
//! - Attendance is only ever recorded for rostered students.

use crate::model::fields::{StudentId, TutorialClass};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TutorialRecord", into = "TutorialRecord")]
pub struct Tutorial {
    tutorial_class: TutorialClass,
    roster: Vec<StudentId>,
    attendance: BTreeMap<(NaiveDate, StudentId), bool>,
}

impl Tutorial {
    pub fn new(tutorial_class: TutorialClass) -> Self {
        Self {
            tutorial_class,
            roster: Vec::new(),
            attendance: BTreeMap::new(),
        }
    }

    pub fn tutorial_class(&self) -> &TutorialClass {
        &self.tutorial_class
    }

    pub fn roster(&self) -> &[StudentId] {
        &self.roster
    }

    pub fn is_same_tutorial(&self, other: &Tutorial) -> bool {
        self.tutorial_class == other.tutorial_class
    }

    pub fn has_student(&self, student_id: &StudentId) -> bool {
        self.roster.contains(student_id)
    }

    /// Adds `student_id` to the roster. Returns `false` if already rostered.
    pub fn add_student(&mut self, student_id: StudentId) -> bool {
        if self.has_student(&student_id) {
            return false;
        }
        self.roster.push(student_id);
        true
    }

    /// Removes `student_id` and every attendance entry recorded for it.
    pub fn remove_student(&mut self, student_id: &StudentId) -> bool {
        let before = self.roster.len();
        self.roster.retain(|id| id != student_id);
        if self.roster.len() == before {
            return false;
        }
        self.attendance.retain(|(_, id), _| id != student_id);
        true
    }

    /// Re-keys `old` to `new` in the roster and attendance, keeping roster order.
    ///
    /// Returns `false` when `old` is not rostered. If `new` is already rostered,
    /// `old` is dropped instead.
    pub fn rename_student(&mut self, old: &StudentId, new: &StudentId) -> bool {
        if old == new {
            return self.has_student(old);
        }
        if self.has_student(new) {
            return self.remove_student(old);
        }
        let Some(slot) = self.roster.iter_mut().find(|id| *id == old) else {
            return false;
        };
        *slot = new.clone();
        let moved: Vec<(NaiveDate, bool)> = self
            .attendance
            .iter()
            .filter(|((_, id), _)| id == old)
            .map(|((date, _), present)| (*date, *present))
            .collect();
        self.attendance.retain(|(_, id), _| id != old);
        for (date, present) in moved {
            self.attendance.insert((date, new.clone()), present);
        }
        true
    }

    /// Marks `student_id` present on `date`.
    ///
    /// Returns `false` without touching state when the student is not rostered.
    pub fn set_attendance(&mut self, date: NaiveDate, student_id: &StudentId) -> bool {
        self.mark_attendance(date, student_id, true)
    }

    pub fn mark_attendance(&mut self, date: NaiveDate, student_id: &StudentId, present: bool) -> bool {
        if !self.has_student(student_id) {
            return false;
        }
        self.attendance.insert((date, student_id.clone()), present);
        true
    }

    pub fn attendance(&self, date: NaiveDate, student_id: &StudentId) -> Option<bool> {
        self.attendance.get(&(date, student_id.clone())).copied()
    }

    /// Roster-ordered attendance for `date`; missing records count as absent.
    pub fn attendance_on(&self, date: NaiveDate) -> Vec<(StudentId, bool)> {
        self.roster
            .iter()
            .map(|id| (id.clone(), self.attendance(date, id).unwrap_or(false)))
            .collect()
    }

    /// Distinct dates with at least one attendance record, ascending.
    pub fn session_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.attendance.keys().map(|(date, _)| *date).collect();
        dates.dedup();
        dates
    }
}

impl Display for Tutorial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} students, {} sessions)",
            self.tutorial_class,
            self.roster.len(),
            self.session_dates().len()
        )
    }
}

/// Wire shape of one tutorial.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TutorialRecord {
    tutorial_class: TutorialClass,
    #[serde(default)]
    students: Vec<StudentId>,
    #[serde(default)]
    attendance: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AttendanceRecord {
    date: NaiveDate,
    student_id: StudentId,
    present: bool,
}

impl TryFrom<TutorialRecord> for Tutorial {
    type Error = String;

    fn try_from(record: TutorialRecord) -> Result<Self, Self::Error> {
        let mut tutorial = Tutorial::new(record.tutorial_class);
        for student_id in record.students {
            if !tutorial.add_student(student_id.clone()) {
                return Err(format!(
                    "student {student_id} is listed twice in tutorial {}",
                    tutorial.tutorial_class
                ));
            }
        }
        for entry in record.attendance {
            if !tutorial.mark_attendance(entry.date, &entry.student_id, entry.present) {
                return Err(format!(
                    "attendance for {} on {} refers to a student outside tutorial {}",
                    entry.student_id, entry.date, tutorial.tutorial_class
                ));
            }
        }
        Ok(tutorial)
    }
}

impl From<Tutorial> for TutorialRecord {
    fn from(tutorial: Tutorial) -> Self {
        Self {
            tutorial_class: tutorial.tutorial_class,
            students: tutorial.roster,
            attendance: tutorial
                .attendance
                .into_iter()
                .map(|((date, student_id), present)| AttendanceRecord {
                    date,
                    student_id,
                    present,
                })
                .collect(),
        }
    }
}
