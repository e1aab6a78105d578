//! User preferences persisted alongside application data.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_WINDOW_WIDTH: f64 = 740.0;
const DEFAULT_WINDOW_HEIGHT: f64 = 600.0;

/// Window geometry kept for compatibility with existing preference files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuiSettings {
    pub window_width: f64,
    pub window_height: f64,
    #[serde(default)]
    pub window_position: Option<(i32, i32)>,
}

impl Default for GuiSettings {
    fn default() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            window_position: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPrefs {
    pub gui_settings: GuiSettings,
    pub address_book_file_path: PathBuf,
    pub tutorial_list_file_path: PathBuf,
    pub assignment_list_file_path: PathBuf,
}

impl Default for UserPrefs {
    fn default() -> Self {
        Self {
            gui_settings: GuiSettings::default(),
            address_book_file_path: PathBuf::from("data").join("addressbook.json"),
            tutorial_list_file_path: PathBuf::from("data").join("tutorials.json"),
            assignment_list_file_path: PathBuf::from("data").join("assignments.json"),
        }
    }
}

impl UserPrefs {
    /// Default preferences with every data file placed under `data_dir`.
    pub fn rooted_at(data_dir: &Path) -> Self {
        Self {
            gui_settings: GuiSettings::default(),
            address_book_file_path: data_dir.join("addressbook.json"),
            tutorial_list_file_path: data_dir.join("tutorials.json"),
            assignment_list_file_path: data_dir.join("assignments.json"),
        }
    }

    pub fn reset_data(&mut self, other: &UserPrefs) {
        *self = other.clone();
    }
}
