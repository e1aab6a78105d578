//! Core domain logic for TutorTrack.
//! This crate is the single source of truth for record invariants.

pub mod collection;
pub mod command;
pub mod config;
pub mod context;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod view;

pub use collection::address_book::AddressBook;
pub use collection::assignment_list::AssignmentList;
pub use collection::tutorial_list::TutorialList;
pub use collection::{CollectionError, CollectionResult, ErrorKind};
pub use command::{parse_command, Command, CommandError, CommandResult, Index, ParseError};
pub use config::{load_config, AppConfig, ConfigError};
pub use context::{AppContext, ContextError};
pub use logging::{default_log_level, init_logging, LoggingHandle};
pub use model::assignment::Assignment;
pub use model::fields::{
    AssignmentName, Email, Name, Phone, Remark, StudentId, TutorialClass, ValidationError,
};
pub use model::prefs::{GuiSettings, UserPrefs};
pub use model::student::Student;
pub use model::tutorial::Tutorial;
pub use service::logic::{LogicError, LogicManager};
pub use service::model_manager::ModelManager;
pub use storage::{JsonStorage, Storage, StorageError, StorageResult};
pub use view::{FilteredStudentList, StudentPredicate, SubscriptionId};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
