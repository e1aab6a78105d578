//! Command dispatch and persistence orchestration.
//!
//! # Responsibility
//! - Load the model from storage at startup.
//! - Parse and execute one input line, then persist if data changed.
//!
//! # Invariants
//! - Storage is written only after a mutating command succeeded.
//! - Logs carry command names and counts only, never record contents.

use crate::collection::address_book::AddressBook;
use crate::collection::assignment_list::AssignmentList;
use crate::collection::tutorial_list::TutorialList;
use crate::command::{parse_command, CommandError, CommandResult, ParseError};
use crate::context::AppContext;
use crate::model::prefs::UserPrefs;
use crate::model::sample::sample_address_book;
use crate::service::model_manager::ModelManager;
use crate::storage::json_storage::read_json_file;
use crate::storage::{JsonStorage, Storage, StorageError, StorageResult};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

#[derive(Debug)]
pub enum LogicError {
    Parse(ParseError),
    Command(CommandError),
    /// The command ran but its result could not be saved. `saved` names the
    /// collections written before the failure, in write order.
    Storage {
        source: StorageError,
        saved: Vec<&'static str>,
    },
}

impl Display for LogicError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Command(err) => write!(f, "{err}"),
            Self::Storage { source, saved } if saved.is_empty() => {
                write!(f, "could not save data: {source}; nothing was saved")
            }
            Self::Storage { source, saved } => write!(
                f,
                "could not save data: {source}; already saved: {}",
                saved.join(", ")
            ),
        }
    }
}

impl Error for LogicError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Command(err) => Some(err),
            Self::Storage { source, .. } => Some(source),
        }
    }
}

pub struct LogicManager<S: Storage> {
    model: ModelManager,
    storage: S,
}

impl LogicManager<JsonStorage> {
    /// Builds JSON storage from the context's prefs file and loads all data.
    pub fn from_context(context: &AppContext) -> Self {
        let prefs_path = context.user_prefs_path();
        let prefs = match read_json_file::<UserPrefs>(&prefs_path) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => UserPrefs::rooted_at(context.data_dir()),
            Err(err) => {
                warn!(
                    "event=data_load module=logic status=error kind=user_prefs fallback=default error={}",
                    err
                );
                UserPrefs::rooted_at(context.data_dir())
            }
        };
        let storage = JsonStorage::new(
            prefs_path,
            context.resolve(&prefs.address_book_file_path),
            context.resolve(&prefs.tutorial_list_file_path),
            context.resolve(&prefs.assignment_list_file_path),
        );
        Self::open(storage, prefs)
    }
}

impl<S: Storage> LogicManager<S> {
    pub fn new(model: ModelManager, storage: S) -> Self {
        Self { model, storage }
    }

    /// Loads every collection from `storage`.
    ///
    /// A missing address book is seeded with sample students; missing lists
    /// start empty. Unreadable files are logged and replaced by empty data.
    pub fn open(storage: S, prefs: UserPrefs) -> Self {
        let started_at = Instant::now();
        let address_book = load_or(storage.read_address_book(), "address_book", || {
            sample_address_book().unwrap_or_else(|err| {
                warn!(
                    "event=data_seed module=logic status=error fallback=empty error={}",
                    err
                );
                AddressBook::new()
            })
        });
        let tutorial_list = load_or(storage.read_tutorial_list(), "tutorial_list", TutorialList::new);
        let assignment_list =
            load_or(storage.read_assignment_list(), "assignment_list", AssignmentList::new);
        info!(
            "event=data_load module=logic status=ok students={} tutorials={} assignments={} duration_ms={}",
            address_book.len(),
            tutorial_list.len(),
            assignment_list.len(),
            started_at.elapsed().as_millis()
        );
        let model = ModelManager::new(address_book, prefs, assignment_list, tutorial_list);
        Self::new(model, storage)
    }

    pub fn model(&self) -> &ModelManager {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ModelManager {
        &mut self.model
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Parses and runs `input`, saving all collections after a mutation.
    pub fn execute(&mut self, input: &str) -> Result<CommandResult, LogicError> {
        let command = parse_command(input).map_err(|err| {
            info!("event=command_parse module=logic status=error error_code=parse_failed");
            LogicError::Parse(err)
        })?;
        let result = command.execute(&mut self.model).map_err(|err| {
            info!(
                "event=command_execute module=logic status=error command={}",
                command.word()
            );
            LogicError::Command(err)
        })?;
        info!(
            "event=command_execute module=logic status=ok command={}",
            command.word()
        );
        if command.is_mutating() {
            self.save()?;
        }
        Ok(result)
    }

    /// Writes all three collections, stopping at the first failure.
    ///
    /// # Errors
    /// `LogicError::Storage` listing the collections written before the failure.
    pub fn save(&self) -> Result<(), LogicError> {
        let steps: [(&'static str, &dyn Fn() -> StorageResult<()>); 3] = [
            ("address_book", &|| self.storage.save_address_book(self.model.address_book())),
            ("tutorial_list", &|| self.storage.save_tutorial_list(self.model.tutorial_list())),
            ("assignment_list", &|| {
                self.storage.save_assignment_list(self.model.assignment_list())
            }),
        ];
        let mut saved = Vec::with_capacity(steps.len());
        for (kind, write) in steps {
            if let Err(source) = write() {
                error!(
                    "event=data_save module=logic status=error kind={} saved={} error={}",
                    kind,
                    saved.join(","),
                    source
                );
                return Err(LogicError::Storage { source, saved });
            }
            saved.push(kind);
        }
        Ok(())
    }

    pub fn save_user_prefs(&self) -> StorageResult<()> {
        self.storage.save_user_prefs(self.model.user_prefs())
    }
}

fn load_or<T: Default>(
    read: StorageResult<Option<T>>,
    kind: &str,
    on_missing: impl FnOnce() -> T,
) -> T {
    match read {
        Ok(Some(value)) => value,
        Ok(None) => {
            info!("event=data_load module=logic status=missing kind={kind}");
            on_missing()
        }
        Err(err) => {
            warn!(
                "event=data_load module=logic status=error kind={kind} fallback=empty error={}",
                err
            );
            T::default()
        }
    }
}
