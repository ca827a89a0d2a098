use std::fs;
use std::path::{Path, PathBuf};

use super::Board;
use crate::config::Config;

pub const TACK_DIR: &str = ".tack";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error(".tack directory not found (walk up from {0})")]
    NotFound(PathBuf),
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// Key/value storage for serialized board snapshots.
pub trait SnapshotStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keys become file names, so keep them to a safe alphabet.
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.')
        || key.starts_with('.')
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStorage for DirStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Write to a sibling temp file and rename so a crash never leaves half a snapshot.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory storage that counts writes.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
    pub writes: usize,
    /// When set, every write fails with an io error.
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl SnapshotStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(std::io::Error::other("disk full").into());
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Load the board snapshot stored under `key`.
///
/// Missing, unreadable or corrupt data falls back to [`Board::seed`].
pub fn load_board(storage: &dyn SnapshotStorage, key: &str) -> Board {
    match storage.get(key) {
        Ok(Some(raw)) => match serde_json::from_str::<Board>(&raw) {
            Ok(board) => {
                log::info!(
                    "event=board_loaded key={key} lists={} cards={}",
                    board.lists.len(),
                    board.card_count()
                );
                board
            }
            Err(e) => {
                log::warn!("event=board_corrupt key={key} error={e}; using seed board");
                Board::seed()
            }
        },
        Ok(None) => {
            log::info!("event=board_missing key={key}; using seed board");
            Board::seed()
        }
        Err(e) => {
            log::warn!("event=board_unreadable key={key} error={e}; using seed board");
            Board::seed()
        }
    }
}

/// Serialize and store the whole board under `key`.
pub fn save_board(storage: &mut dyn SnapshotStorage, key: &str, board: &Board) -> Result<(), StorageError> {
    let json = serde_json::to_string(board)?;
    storage.set(key, &json)
}

/// Find the .tack directory by walking up from `start`.
pub fn find_tack_dir(start: &Path) -> Result<PathBuf, StorageError> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = dir.join(TACK_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !dir.pop() {
            return Err(StorageError::NotFound(start.to_path_buf()));
        }
    }
}

/// The project-local `.tack` directory if there is one, otherwise the
/// per-user data directory (created on demand).
pub fn resolve_tack_dir(start: &Path) -> Result<PathBuf, StorageError> {
    match find_tack_dir(start) {
        Ok(dir) => Ok(dir),
        Err(StorageError::NotFound(_)) => {
            let base = dirs::data_dir().ok_or_else(|| StorageError::NotFound(start.to_path_buf()))?;
            let dir = base.join("tack");
            fs::create_dir_all(&dir)?;
            Ok(dir)
        }
        Err(e) => Err(e),
    }
}

/// Snapshot storage rooted in a tack directory.
pub fn storage_for(tack_dir: &Path) -> DirStorage {
    DirStorage::new(tack_dir.join("storage"))
}

/// Initialize a new .tack directory with default config and a seeded board.
pub fn init_board(root: &Path) -> Result<PathBuf, StorageError> {
    let tack_dir = root.join(TACK_DIR);
    fs::create_dir_all(&tack_dir)?;

    let config = Config::default();
    config.save(&tack_dir)?;

    let mut storage = storage_for(&tack_dir);
    save_board(&mut storage, &config.board.storage_key, &Board::seed())?;

    Ok(tack_dir)
}
