//! Persistence contracts and JSON file storage.
//!
//! # Responsibility
//! - Define whole-collection read/save contracts for the model data.
//! - Keep file format details out of the model and command layers.
//!
//! # Invariants
//! - `read_*` returns `Ok(None)` only when the backing file does not exist.
//! - Loaded data satisfies every entity and collection invariant, or the
//!   read fails; invalid persisted state is never masked.

pub mod json_storage;

use crate::collection::address_book::AddressBook;
use crate::collection::assignment_list::AssignmentList;
use crate::collection::tutorial_list::TutorialList;
use crate::model::prefs::UserPrefs;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub use json_storage::JsonStorage;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug)]
pub enum StorageError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// File content is not valid JSON or violates a data invariant.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StorageError {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => path,
        }
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error at `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid data file `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Whole-collection persistence for the application data.
pub trait Storage {
    fn read_user_prefs(&self) -> StorageResult<Option<UserPrefs>>;
    fn save_user_prefs(&self, prefs: &UserPrefs) -> StorageResult<()>;

    fn read_address_book(&self) -> StorageResult<Option<AddressBook>>;
    fn save_address_book(&self, book: &AddressBook) -> StorageResult<()>;

    fn read_tutorial_list(&self) -> StorageResult<Option<TutorialList>>;
    fn save_tutorial_list(&self, list: &TutorialList) -> StorageResult<()>;

    fn read_assignment_list(&self) -> StorageResult<Option<AssignmentList>>;
    fn save_assignment_list(&self, list: &AssignmentList) -> StorageResult<()>;
}
