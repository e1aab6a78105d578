//! JSON file implementation of `Storage`.
//!
//! # Responsibility
//! - Map each collection and the user prefs to one pretty-printed JSON file.
//! - Replace files atomically so a crash mid-save keeps the previous copy.
//!
//! # Invariants
//! - Parent directories are created on save.
//! - Saves write `<file>.tmp` first and rename it over the target.

use super::{Storage, StorageError, StorageResult};
use crate::collection::address_book::AddressBook;
use crate::collection::assignment_list::AssignmentList;
use crate::collection::tutorial_list::TutorialList;
use crate::model::prefs::UserPrefs;
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStorage {
    user_prefs_path: PathBuf,
    address_book_path: PathBuf,
    tutorial_list_path: PathBuf,
    assignment_list_path: PathBuf,
}

impl JsonStorage {
    pub fn new(
        user_prefs_path: impl Into<PathBuf>,
        address_book_path: impl Into<PathBuf>,
        tutorial_list_path: impl Into<PathBuf>,
        assignment_list_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            user_prefs_path: user_prefs_path.into(),
            address_book_path: address_book_path.into(),
            tutorial_list_path: tutorial_list_path.into(),
            assignment_list_path: assignment_list_path.into(),
        }
    }

    /// Storage using the data file locations recorded in `prefs`.
    pub fn from_prefs(user_prefs_path: impl Into<PathBuf>, prefs: &UserPrefs) -> Self {
        Self::new(
            user_prefs_path,
            prefs.address_book_file_path.clone(),
            prefs.tutorial_list_file_path.clone(),
            prefs.assignment_list_file_path.clone(),
        )
    }

    pub fn user_prefs_path(&self) -> &Path {
        &self.user_prefs_path
    }

    pub fn address_book_path(&self) -> &Path {
        &self.address_book_path
    }

    pub fn tutorial_list_path(&self) -> &Path {
        &self.tutorial_list_path
    }

    pub fn assignment_list_path(&self) -> &Path {
        &self.assignment_list_path
    }
}

impl Storage for JsonStorage {
    fn read_user_prefs(&self) -> StorageResult<Option<UserPrefs>> {
        read_json_file(&self.user_prefs_path)
    }

    fn save_user_prefs(&self, prefs: &UserPrefs) -> StorageResult<()> {
        save_json_file(&self.user_prefs_path, prefs)
    }

    fn read_address_book(&self) -> StorageResult<Option<AddressBook>> {
        read_json_file(&self.address_book_path)
    }

    fn save_address_book(&self, book: &AddressBook) -> StorageResult<()> {
        save_json_file(&self.address_book_path, book)
    }

    fn read_tutorial_list(&self) -> StorageResult<Option<TutorialList>> {
        read_json_file(&self.tutorial_list_path)
    }

    fn save_tutorial_list(&self, list: &TutorialList) -> StorageResult<()> {
        save_json_file(&self.tutorial_list_path, list)
    }

    fn read_assignment_list(&self) -> StorageResult<Option<AssignmentList>> {
        read_json_file(&self.assignment_list_path)
    }

    fn save_assignment_list(&self, list: &AssignmentList) -> StorageResult<()> {
        save_json_file(&self.assignment_list_path, list)
    }
}

/// Reads and decodes `path`. A missing file yields `Ok(None)`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StorageError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Encodes `value` and atomically replaces `path`.
pub fn save_json_file<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let started_at = Instant::now();
    let result = write_atomically(path, value);
    match &result {
        Ok(()) => info!(
            "event=storage_save module=storage status=ok path={} duration_ms={}",
            path.display(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=storage_save module=storage status=error path={} duration_ms={} error={}",
            path.display(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn write_atomically<T: Serialize>(path: &Path, value: &T) -> StorageResult<()> {
    let io_err = |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp_path = temp_path_for(path);
    std::fs::write(&tmp_path, json).map_err(io_err)?;
    std::fs::rename(&tmp_path, path).map_err(io_err)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("data"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::temp_path_for;
    use std::path::Path;

    #[test]
    fn temp_path_sits_next_to_target() {
        assert_eq!(
            temp_path_for(Path::new("/data/addressbook.json")),
            Path::new("/data/addressbook.json.tmp")
        );
    }
}
