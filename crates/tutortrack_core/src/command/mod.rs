//! Command set executed against the model.
//!
//! # Responsibility
//! - Represent parsed user intent as typed commands.
//! - Translate model results into user-facing feedback.
//!
//! # Invariants
//! - Commands address students by 1-based position in the filtered view.
//! - A failing command leaves the model unchanged.
//! - Attendance marking reports an unrostered student as `Rejected`, never as
//!   a model error.

pub mod parser;

use crate::collection::CollectionError;
use crate::model::assignment::Assignment;
use crate::model::fields::{AssignmentName, Email, Name, Phone, Remark, TutorialClass};
use crate::model::student::Student;
use crate::model::tutorial::Tutorial;
use crate::service::model_manager::ModelManager;
use crate::view::StudentPredicate;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use parser::{parse_command, ParseError};

/// One-based position in the filtered student list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Index(usize);

impl Index {
    /// Returns `None` for zero.
    pub fn from_one_based(value: usize) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn one_based(self) -> usize {
        self.0
    }

    pub fn zero_based(self) -> usize {
        self.0 - 1
    }
}

/// Fields replaced by `edit`; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditStudentDescriptor {
    pub name: Option<Name>,
    pub phone: Option<Phone>,
    pub email: Option<Email>,
    pub remark: Option<Remark>,
}

impl EditStudentDescriptor {
    pub fn is_any_field_edited(&self) -> bool {
        self.name.is_some() || self.phone.is_some() || self.email.is_some() || self.remark.is_some()
    }

    fn apply(&self, student: &Student) -> Student {
        Student {
            student_id: student.student_id.clone(),
            name: self.name.clone().unwrap_or_else(|| student.name.clone()),
            phone: self.phone.clone().unwrap_or_else(|| student.phone.clone()),
            email: self.email.clone().unwrap_or_else(|| student.email.clone()),
            tutorial_class: student.tutorial_class.clone(),
            remark: self.remark.clone().unwrap_or_else(|| student.remark.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Student),
    Edit {
        index: Index,
        edit: EditStudentDescriptor,
    },
    Remark {
        index: Index,
        remark: Remark,
    },
    Delete(Index),
    Find(Vec<String>),
    List,
    /// Shows only students rostered in one tutorial.
    ListInTutorial(TutorialClass),
    Clear,
    AddTutorial(TutorialClass),
    DeleteTutorial(TutorialClass),
    ListTutorials,
    Assign {
        index: Index,
        tutorial_class: TutorialClass,
    },
    Mark {
        index: Index,
        tutorial_class: TutorialClass,
        date: NaiveDate,
    },
    AddAssignment(AssignmentName),
    DeleteAssignment(AssignmentName),
    CheckAssignment(AssignmentName),
    ListAssignments,
    SetAssignment {
        index: Index,
        name: AssignmentName,
        completed: bool,
    },
    Help,
    Exit,
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub feedback: String,
    pub show_help: bool,
    pub exit: bool,
}

impl CommandResult {
    pub fn message(feedback: impl Into<String>) -> Self {
        Self {
            feedback: feedback.into(),
            show_help: false,
            exit: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Index past the end of the filtered list.
    InvalidIndex { index: usize, visible: usize },
    Model(CollectionError),
    /// The command ran but had nothing to apply; state is unchanged.
    Rejected(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIndex { index, visible } => write!(
                f,
                "the student index {index} is invalid; {visible} students are listed"
            ),
            Self::Model(err) => write!(f, "{err}"),
            Self::Rejected(message) => f.write_str(message),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CollectionError> for CommandError {
    fn from(value: CollectionError) -> Self {
        Self::Model(value)
    }
}

pub const HELP_TEXT: &str = "\
Students:
  add id/ID n/NAME p/PHONE e/EMAIL [t/TUTORIAL] [r/REMARK]
  edit INDEX [n/NAME] [p/PHONE] [e/EMAIL] [r/REMARK]
  remark INDEX r/REMARK
  delete INDEX
  find KEYWORD [MORE_KEYWORDS]...
  list [t/TUTORIAL]
  clear
Tutorials:
  addtut TUTORIAL
  deltut TUTORIAL
  listtut
  assign INDEX t/TUTORIAL
  mark INDEX t/TUTORIAL d/YYYY-MM-DD
Assignments:
  addasg NAME
  delasg NAME
  checkasg NAME
  listasg
  setasg INDEX a/NAME s/done|undone
Other:
  help
  exit";

impl Command {
    /// Command word as typed by the user.
    pub fn word(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Edit { .. } => "edit",
            Self::Remark { .. } => "remark",
            Self::Delete(_) => "delete",
            Self::Find(_) => "find",
            Self::List | Self::ListInTutorial(_) => "list",
            Self::Clear => "clear",
            Self::AddTutorial(_) => "addtut",
            Self::DeleteTutorial(_) => "deltut",
            Self::ListTutorials => "listtut",
            Self::Assign { .. } => "assign",
            Self::Mark { .. } => "mark",
            Self::AddAssignment(_) => "addasg",
            Self::DeleteAssignment(_) => "delasg",
            Self::CheckAssignment(_) => "checkasg",
            Self::ListAssignments => "listasg",
            Self::SetAssignment { .. } => "setasg",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }

    /// Whether a successful run changes persisted data.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Self::Add(_)
                | Self::Edit { .. }
                | Self::Remark { .. }
                | Self::Delete(_)
                | Self::Clear
                | Self::AddTutorial(_)
                | Self::DeleteTutorial(_)
                | Self::Assign { .. }
                | Self::Mark { .. }
                | Self::AddAssignment(_)
                | Self::DeleteAssignment(_)
                | Self::SetAssignment { .. }
        )
    }

    pub fn execute(&self, model: &mut ModelManager) -> Result<CommandResult, CommandError> {
        match self {
            Self::Add(student) => {
                if let Some(class) = &student.tutorial_class {
                    if !model.has_tutorial_class(class) {
                        return Err(CollectionError::TutorialNotFound(class.clone()).into());
                    }
                }
                if model.has_student(student) {
                    return Err(CollectionError::DuplicateStudent(student.student_id.clone()).into());
                }
                let unassigned = student.with_tutorial_class(None);
                model.add_student(unassigned.clone())?;
                if let Some(class) = &student.tutorial_class {
                    model.assign_student(&unassigned, class)?;
                }
                Ok(CommandResult::message(format!("New student added: {student}")))
            }
            Self::Edit { index, edit } => {
                let target = visible_student(model, *index)?;
                let edited = edit.apply(&target);
                model.set_student(&target, edited.clone())?;
                Ok(CommandResult::message(format!("Edited student: {edited}")))
            }
            Self::Remark { index, remark } => {
                let target = visible_student(model, *index)?;
                let edited = target.with_remark(remark.clone());
                model.set_student(&target, edited.clone())?;
                let verb = if remark.is_empty() { "Removed" } else { "Added" };
                Ok(CommandResult::message(format!(
                    "{verb} remark for student: {edited}"
                )))
            }
            Self::Delete(index) => {
                let target = visible_student(model, *index)?;
                let removed = model.delete_student(&target)?;
                Ok(CommandResult::message(format!("Deleted student: {removed}")))
            }
            Self::Find(keywords) => {
                model.update_filtered_student_list(StudentPredicate::name_contains_any(
                    keywords.clone(),
                ));
                Ok(CommandResult::message(format!(
                    "{} students listed!",
                    model.filtered_student_list().len()
                )))
            }
            Self::List => {
                model.update_filtered_student_list(StudentPredicate::show_all());
                Ok(CommandResult::message("Listed all students"))
            }
            Self::ListInTutorial(class) => {
                if !model.has_tutorial_class(class) {
                    return Err(CollectionError::TutorialNotFound(class.clone()).into());
                }
                model.update_filtered_student_list(StudentPredicate::in_tutorial(class.clone()));
                Ok(CommandResult::message(format!(
                    "{} students listed in {class}",
                    model.filtered_student_list().len()
                )))
            }
            Self::Clear => {
                model.clear();
                Ok(CommandResult::message("All records have been cleared!"))
            }
            Self::AddTutorial(class) => {
                model.add_tutorial(Tutorial::new(class.clone()))?;
                Ok(CommandResult::message(format!("New tutorial added: {class}")))
            }
            Self::DeleteTutorial(class) => {
                let removed = model.delete_tutorial(&Tutorial::new(class.clone()))?;
                Ok(CommandResult::message(format!("Deleted tutorial: {removed}")))
            }
            Self::ListTutorials => Ok(CommandResult::message(model.tutorial_list().to_string())),
            Self::Assign {
                index,
                tutorial_class,
            } => {
                let target = visible_student(model, *index)?;
                model.assign_student(&target, tutorial_class)?;
                Ok(CommandResult::message(format!(
                    "Assigned {} {} to tutorial {tutorial_class}",
                    target.student_id, target.name
                )))
            }
            Self::Mark {
                index,
                tutorial_class,
                date,
            } => {
                if !model.has_tutorial_class(tutorial_class) {
                    return Err(CollectionError::TutorialNotFound(tutorial_class.clone()).into());
                }
                let target = visible_student(model, *index)?;
                if model.set_student_attendance(&target.student_id, tutorial_class, *date) {
                    Ok(CommandResult::message(format!(
                        "Marked {} {} present in {tutorial_class} on {date}",
                        target.student_id, target.name
                    )))
                } else {
                    Err(CommandError::Rejected(format!(
                        "{} is not in tutorial {tutorial_class}; attendance not recorded",
                        target.student_id
                    )))
                }
            }
            Self::AddAssignment(name) => {
                model.add_assignment(Assignment::new(name.clone()))?;
                Ok(CommandResult::message(format!("New assignment added: {name}")))
            }
            Self::DeleteAssignment(name) => {
                let removed = model.delete_assignment(&Assignment::new(name.clone()))?;
                Ok(CommandResult::message(format!("Deleted assignment: {removed}")))
            }
            Self::CheckAssignment(name) => {
                let summary = model.check_assignment(&Assignment::new(name.clone()))?;
                Ok(CommandResult::message(summary))
            }
            Self::ListAssignments => Ok(CommandResult::message(model.list_assignments())),
            Self::SetAssignment {
                index,
                name,
                completed,
            } => {
                let target = visible_student(model, *index)?;
                model.set_assignment_status(&Assignment::new(name.clone()), &target, *completed)?;
                Ok(CommandResult::message(format!(
                    "Marked `{name}` as {} for {} {}",
                    if *completed { "completed" } else { "not completed" },
                    target.student_id,
                    target.name
                )))
            }
            Self::Help => Ok(CommandResult {
                feedback: HELP_TEXT.to_string(),
                show_help: true,
                exit: false,
            }),
            Self::Exit => Ok(CommandResult {
                feedback: "Exiting as requested ...".to_string(),
                show_help: false,
                exit: true,
            }),
        }
    }
}

fn visible_student(model: &ModelManager, index: Index) -> Result<Student, CommandError> {
    let visible = model.filtered_student_list();
    visible
        .get(index.zero_based())
        .cloned()
        .ok_or(CommandError::InvalidIndex {
            index: index.one_based(),
            visible: visible.len(),
        })
}
