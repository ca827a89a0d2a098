use super::ids::IdGenerator;
use super::ops;
use super::storage::{load_board, save_board, SnapshotStorage, StorageError};
use super::Board;

/// Holds the current board snapshot and persists every effective mutation.
///
/// Each mutating method runs the matching pure operation from [`ops`]. When the
/// result equals the current snapshot nothing happens: the revision stays put
/// and storage is not written. Methods return whether the board changed.
pub struct BoardStore<S: SnapshotStorage, G: IdGenerator> {
    board: Board,
    revision: u64,
    key: String,
    storage: S,
    ids: G,
}

impl<S: SnapshotStorage, G: IdGenerator> BoardStore<S, G> {
    /// Load the snapshot under `key`, falling back to the seed board.
    pub fn open(storage: S, key: impl Into<String>, ids: G) -> Self {
        let key = key.into();
        let board = load_board(&storage, &key);
        Self {
            board,
            revision: 0,
            key,
            storage,
            ids,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Number of effective mutations since the store was opened.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&mut self, next: Board) -> Result<bool, StorageError> {
        if next == self.board {
            return Ok(false);
        }
        save_board(&mut self.storage, &self.key, &next)?;
        self.board = next;
        self.revision += 1;
        Ok(true)
    }

    pub fn move_card(&mut self, card_id: &str, target_list_id: &str, target_index: usize) -> Result<bool, StorageError> {
        let next = ops::move_card(&self.board, card_id, target_list_id, target_index);
        let changed = self.commit(next)?;
        if changed {
            log::info!("event=card_moved card={card_id} list={target_list_id} index={target_index}");
        }
        Ok(changed)
    }

    pub fn rename_list(&mut self, list_id: &str, new_title: &str) -> Result<bool, StorageError> {
        let next = ops::rename_list(&self.board, list_id, new_title);
        let changed = self.commit(next)?;
        if changed {
            log::info!("event=list_renamed list={list_id}");
        }
        Ok(changed)
    }

    /// Append an empty card; returns its id when the list exists.
    pub fn add_card(&mut self, list_id: &str) -> Result<Option<String>, StorageError> {
        let (next, id) = ops::add_card(&self.board, list_id, &mut self.ids);
        self.commit(next)?;
        if let Some(ref id) = id {
            log::info!("event=card_added card={id} list={list_id}");
        }
        Ok(id)
    }

    pub fn update_card_content(&mut self, list_id: &str, card_id: &str, content: &str) -> Result<bool, StorageError> {
        let next = ops::update_card_content(&self.board, list_id, card_id, content);
        let changed = self.commit(next)?;
        if changed {
            log::info!("event=card_updated card={card_id} list={list_id}");
        }
        Ok(changed)
    }

    pub fn delete_card(&mut self, list_id: &str, card_id: &str) -> Result<bool, StorageError> {
        let next = ops::delete_card(&self.board, list_id, card_id);
        let changed = self.commit(next)?;
        if changed {
            log::info!("event=card_deleted card={card_id} list={list_id}");
        }
        Ok(changed)
    }

    pub fn add_list(&mut self, title: &str) -> Result<String, StorageError> {
        let (next, id) = ops::add_list(&self.board, title, &mut self.ids);
        self.commit(next)?;
        log::info!("event=list_added list={id}");
        Ok(id)
    }

    /// Replace the whole board (used by `reset`).
    pub fn replace(&mut self, board: Board) -> Result<bool, StorageError> {
        let changed = self.commit(board)?;
        if changed {
            log::info!("event=board_replaced lists={}", self.board.lists.len());
        }
        Ok(changed)
    }
}
