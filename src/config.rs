use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::storage::StorageError;

pub const CONFIG_FILE: &str = "config.toml";

/// Contents of `.tack/config.toml`. Every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardSection,
    #[serde(default)]
    pub drag: DragSection,
    #[serde(default)]
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSection {
    /// Key the board snapshot is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragSection {
    /// Cells the pointer must travel before a press turns into a drag.
    #[serde(default = "default_activation_distance")]
    pub activation_distance: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_storage_key() -> String {
    "kanban-board".to_string()
}
fn default_activation_distance() -> u16 {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BoardSection {
    fn default() -> Self {
        Self { storage_key: default_storage_key() }
    }
}

impl Default for DragSection {
    fn default() -> Self {
        Self { activation_distance: default_activation_distance() }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

impl Config {
    /// Load `config.toml` from a tack directory; a missing file yields defaults.
    pub fn load(tack_dir: &Path) -> Result<Self, StorageError> {
        let path = tack_dir.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(s) => Ok(toml::from_str(&s)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, tack_dir: &Path) -> Result<(), StorageError> {
        let s = toml::to_string_pretty(self)?;
        fs::write(tack_dir.join(CONFIG_FILE), s)?;
        Ok(())
    }
}
