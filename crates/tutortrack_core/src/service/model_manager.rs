//! In-memory model facade.
//!
//! # Responsibility
//! - Compose the address book, tutorial list, assignment list and user prefs.
//! - Keep the filtered student view in step with every student mutation.
//!
//! # Invariants
//! - Failing operations leave every collection and the view unmodified.
//! - `add_student` and `set_student_attendance` reset the view to show all;
//!   other student mutations re-evaluate the active predicate.
//! - Equality ignores the tutorial list.
//! - Every rostered id belongs to a known student whose `tutorial_class` names
//!   that roster's tutorial; statuses only exist for known students.

use crate::collection::address_book::AddressBook;
use crate::collection::assignment_list::AssignmentList;
use crate::collection::tutorial_list::TutorialList;
use crate::collection::{CollectionError, CollectionResult};
use crate::model::assignment::Assignment;
use crate::model::fields::{StudentId, TutorialClass};
use crate::model::prefs::{GuiSettings, UserPrefs};
use crate::model::student::Student;
use crate::model::tutorial::Tutorial;
use crate::view::{FilteredStudentList, StudentPredicate, SubscriptionId};
use chrono::NaiveDate;
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ModelManager {
    address_book: AddressBook,
    user_prefs: UserPrefs,
    filtered_students: FilteredStudentList,
    assignment_list: AssignmentList,
    tutorial_list: TutorialList,
}

impl Default for ModelManager {
    fn default() -> Self {
        Self::new(
            AddressBook::new(),
            UserPrefs::default(),
            AssignmentList::new(),
            TutorialList::new(),
        )
    }
}

impl ModelManager {
    pub fn new(
        address_book: AddressBook,
        user_prefs: UserPrefs,
        assignment_list: AssignmentList,
        tutorial_list: TutorialList,
    ) -> Self {
        debug!(
            "event=model_init module=model status=ok students={} tutorials={} assignments={}",
            address_book.len(),
            tutorial_list.len(),
            assignment_list.len()
        );
        let mut model = Self {
            address_book,
            user_prefs,
            filtered_students: FilteredStudentList::default(),
            assignment_list,
            tutorial_list,
        };
        model.reconcile_links();
        model.filtered_students = FilteredStudentList::new(model.address_book.students());
        model
    }

    /// Repairs links between the address book and the other collections.
    ///
    /// A student's `tutorial_class` is authoritative once it names an existing
    /// tutorial; a dangling class is cleared. Rosters and statuses are then
    /// trimmed to known students, and each student appears only in the roster
    /// of their own class. Returns the number of repairs made.
    pub fn reconcile_links(&mut self) -> usize {
        let dangling: BTreeSet<TutorialClass> = self
            .address_book
            .students()
            .iter()
            .filter_map(|student| student.tutorial_class.clone())
            .filter(|class| !self.tutorial_list.has_tutorial_class(class))
            .collect();
        let cleared_classes: usize = dangling
            .iter()
            .map(|class| self.address_book.clear_tutorial_class(class))
            .sum();

        let class_of: BTreeMap<StudentId, Option<TutorialClass>> = self
            .address_book
            .students()
            .iter()
            .map(|student| (student.student_id.clone(), student.tutorial_class.clone()))
            .collect();
        let dropped_roster = self.tutorial_list.retain_rostered(|class, id| {
            matches!(class_of.get(id), Some(Some(own)) if own == class)
        });

        let mut added_roster = 0;
        for (id, class) in &class_of {
            let Some(class) = class else { continue };
            let rostered = self
                .tutorial_list
                .tutorial(class)
                .is_some_and(|tutorial| tutorial.has_student(id));
            if rostered {
                continue;
            }
            if let Some(student) = self.address_book.student_by_id(id) {
                // The class was checked to exist above.
                if self.tutorial_list.assign_student(student, class).is_ok() {
                    added_roster += 1;
                }
            }
        }

        let dropped_statuses = self
            .assignment_list
            .retain_students(|id| class_of.contains_key(id));

        let repairs = cleared_classes + dropped_roster + added_roster + dropped_statuses;
        if repairs > 0 {
            warn!(
                "event=model_reconcile module=model status=ok cleared_classes={} dropped_roster={} added_roster={} dropped_statuses={}",
                cleared_classes, dropped_roster, added_roster, dropped_statuses
            );
        }
        repairs
    }

    // ---- user prefs ----

    pub fn user_prefs(&self) -> &UserPrefs {
        &self.user_prefs
    }

    pub fn set_user_prefs(&mut self, user_prefs: &UserPrefs) {
        self.user_prefs.reset_data(user_prefs);
    }

    pub fn gui_settings(&self) -> &GuiSettings {
        &self.user_prefs.gui_settings
    }

    pub fn set_gui_settings(&mut self, gui_settings: GuiSettings) {
        self.user_prefs.gui_settings = gui_settings;
    }

    pub fn address_book_file_path(&self) -> &Path {
        &self.user_prefs.address_book_file_path
    }

    pub fn set_address_book_file_path(&mut self, path: impl Into<PathBuf>) {
        self.user_prefs.address_book_file_path = path.into();
    }

    // ---- address book ----

    pub fn address_book(&self) -> &AddressBook {
        &self.address_book
    }

    pub fn set_address_book(&mut self, address_book: &AddressBook) {
        self.address_book.reset_data(address_book);
        self.reconcile_links();
        self.refresh_view();
    }

    pub fn has_student(&self, student: &Student) -> bool {
        self.address_book.has_student(student)
    }

    pub fn has_student_with_id(&self, student_id: &StudentId) -> bool {
        self.address_book.has_student_id(student_id)
    }

    pub fn add_student(&mut self, student: Student) -> CollectionResult<()> {
        self.address_book.add_student(student)?;
        self.update_filtered_student_list(StudentPredicate::show_all());
        Ok(())
    }

    /// Removes `target` and every roster, attendance and status entry for it.
    pub fn delete_student(&mut self, target: &Student) -> CollectionResult<Student> {
        let removed = self.address_book.remove_student(target)?;
        self.tutorial_list.unassign_student(&removed.student_id);
        self.assignment_list.forget_student(&removed.student_id);
        self.refresh_view();
        Ok(removed)
    }

    /// Replaces `target` with `edited`, carrying the change into every link.
    ///
    /// A changed id re-keys roster, attendance and status entries. A changed
    /// `tutorial_class` moves the student between rosters like `assign_student`;
    /// `None` removes them from every roster.
    ///
    /// # Errors
    /// - `StudentNotFound` when `target` is not in the address book.
    /// - `TutorialNotFound` when `edited` names a class that does not exist.
    /// - `DuplicateStudent` when `edited` takes another student's id.
    pub fn set_student(&mut self, target: &Student, edited: Student) -> CollectionResult<()> {
        let stored = self
            .address_book
            .student_by_id(&target.student_id)
            .cloned()
            .ok_or_else(|| CollectionError::StudentNotFound(target.student_id.clone()))?;
        let class_changed = stored.tutorial_class != edited.tutorial_class;
        if class_changed {
            if let Some(class) = &edited.tutorial_class {
                if !self.tutorial_list.has_tutorial_class(class) {
                    return Err(CollectionError::TutorialNotFound(class.clone()));
                }
            }
        }
        self.address_book.set_student(&stored, edited.clone())?;

        if stored.student_id != edited.student_id {
            self.tutorial_list
                .rename_student(&stored.student_id, &edited.student_id);
            self.assignment_list
                .rename_student(&stored.student_id, &edited.student_id);
        }
        if class_changed {
            self.tutorial_list.unassign_student(&edited.student_id);
            if let Some(class) = &edited.tutorial_class {
                self.tutorial_list.assign_student(&edited, class)?;
            }
        }
        self.refresh_view();
        Ok(())
    }

    // ---- tutorials ----

    pub fn tutorial_list(&self) -> &TutorialList {
        &self.tutorial_list
    }

    pub fn set_tutorial_list(&mut self, tutorial_list: &TutorialList) {
        self.tutorial_list.reset_data(tutorial_list);
        self.reconcile_links();
        self.refresh_view();
    }

    pub fn has_tutorial(&self, tutorial: &Tutorial) -> bool {
        self.tutorial_list.has_tutorial(tutorial)
    }

    pub fn has_tutorial_class(&self, tutorial_class: &TutorialClass) -> bool {
        self.tutorial_list.has_tutorial_class(tutorial_class)
    }

    pub fn add_tutorial(&mut self, tutorial: Tutorial) -> CollectionResult<()> {
        self.tutorial_list.add_tutorial(tutorial)
    }

    /// Deletes `tutorial` and clears the class from every student assigned to it.
    pub fn delete_tutorial(&mut self, tutorial: &Tutorial) -> CollectionResult<Tutorial> {
        let removed = self.tutorial_list.delete_tutorial(tutorial)?;
        if self.address_book.clear_tutorial_class(removed.tutorial_class()) > 0 {
            self.refresh_view();
        }
        Ok(removed)
    }

    /// Rosters `student` in `tutorial_class`, moving them out of any other class.
    ///
    /// # Errors
    /// - `TutorialNotFound` when the class does not exist.
    /// - `StudentNotFound` when `student` is not in the address book.
    pub fn assign_student(
        &mut self,
        student: &Student,
        tutorial_class: &TutorialClass,
    ) -> CollectionResult<()> {
        if !self.tutorial_list.has_tutorial_class(tutorial_class) {
            return Err(CollectionError::TutorialNotFound(tutorial_class.clone()));
        }
        let stored = self
            .address_book
            .student_by_id(&student.student_id)
            .cloned()
            .ok_or_else(|| CollectionError::StudentNotFound(student.student_id.clone()))?;

        if stored.tutorial_class.as_ref() != Some(tutorial_class) {
            self.tutorial_list.unassign_student(&stored.student_id);
        }
        self.tutorial_list.assign_student(&stored, tutorial_class)?;
        self.address_book.set_student(
            &stored,
            stored.with_tutorial_class(Some(tutorial_class.clone())),
        )?;
        self.refresh_view();
        Ok(())
    }

    /// Marks `student_id` present on `date` in `tutorial_class`.
    ///
    /// Returns `false` when the class is unknown or the student is not in its
    /// roster; nothing is recorded in that case.
    pub fn set_student_attendance(
        &mut self,
        student_id: &StudentId,
        tutorial_class: &TutorialClass,
        date: NaiveDate,
    ) -> bool {
        let recorded = self
            .tutorial_list
            .set_attendance(tutorial_class, date, student_id);
        self.update_filtered_student_list(StudentPredicate::show_all());
        recorded
    }

    // ---- assignments ----

    pub fn assignment_list(&self) -> &AssignmentList {
        &self.assignment_list
    }

    pub fn set_assignment_list(&mut self, assignment_list: &AssignmentList) {
        self.assignment_list.reset_data(assignment_list);
        self.reconcile_links();
    }

    pub fn has_assignment(&self, assignment: &Assignment) -> bool {
        self.assignment_list.has_assignment(assignment)
    }

    pub fn add_assignment(&mut self, assignment: Assignment) -> CollectionResult<()> {
        self.assignment_list.add_assignment(assignment)
    }

    pub fn delete_assignment(&mut self, assignment: &Assignment) -> CollectionResult<Assignment> {
        self.assignment_list.delete_assignment(assignment)
    }

    /// Completion summary of `assignment` over the whole address book.
    pub fn check_assignment(&self, assignment: &Assignment) -> CollectionResult<String> {
        self.assignment_list
            .get_status(assignment, self.address_book.students())
    }

    /// # Errors
    /// - `AssignmentNotFound` when the assignment is unknown.
    /// - `StudentNotFound` when `student` is not in the address book.
    pub fn set_assignment_status(
        &mut self,
        assignment: &Assignment,
        student: &Student,
        completed: bool,
    ) -> CollectionResult<()> {
        if !self.assignment_list.has_assignment(assignment) {
            return Err(CollectionError::AssignmentNotFound(assignment.name.clone()));
        }
        if !self.address_book.has_student(student) {
            return Err(CollectionError::StudentNotFound(student.student_id.clone()));
        }
        self.assignment_list.set_status(assignment, student, completed)
    }

    pub fn list_assignments(&self) -> String {
        self.assignment_list.to_string()
    }

    // ---- filtered view ----

    pub fn filtered_student_list(&self) -> &[Student] {
        self.filtered_students.students()
    }

    pub fn filtered_predicate(&self) -> &StudentPredicate {
        self.filtered_students.predicate()
    }

    pub fn update_filtered_student_list(&mut self, predicate: StudentPredicate) {
        self.filtered_students
            .set_predicate(predicate, self.address_book.students());
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&[Student]) + 'static) -> SubscriptionId {
        self.filtered_students.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.filtered_students.unsubscribe(id)
    }

    /// Empties every collection; preferences are kept.
    pub fn clear(&mut self) {
        self.address_book.clear();
        self.tutorial_list.clear();
        self.assignment_list.clear();
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        self.filtered_students.refresh(self.address_book.students());
    }
}

impl PartialEq for ModelManager {
    fn eq(&self, other: &Self) -> bool {
        self.address_book == other.address_book
            && self.user_prefs == other.user_prefs
            && self.filtered_students == other.filtered_students
            && self.assignment_list == other.assignment_list
    }
}
