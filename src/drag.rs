//! Turns drag-start / drag-end gestures into a single card move.

use crate::board::{Board, Card};

/// What the pointer was over when a drag was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A list's body (its empty area or header).
    List(String),
    /// A specific card.
    Card(String),
}

impl DropTarget {
    /// Resolve a bare id into a target. Card ids win over list ids, since
    /// list and card ids are allowed to overlap (the seed board does).
    pub fn resolve(board: &Board, over_id: &str) -> Option<Self> {
        if board.find_card(over_id).is_some() {
            Some(Self::Card(over_id.to_string()))
        } else if board.list_index(over_id).is_some() {
            Some(Self::List(over_id.to_string()))
        } else {
            None
        }
    }
}

/// A resolved move, ready for [`crate::board::store::BoardStore::move_card`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveIntent {
    pub card_id: String,
    pub target_list_id: String,
    pub target_index: usize,
}

/// Work out where a released card should go.
///
/// The target index is read from the board as it is *before* the card is
/// removed; the move itself removes then inserts. Returns `None` when the
/// drop would change nothing or refers to ids that no longer exist.
pub fn resolve_drop(board: &Board, active_id: &str, over: Option<&DropTarget>) -> Option<MoveIntent> {
    let over = over?;
    let (source_list, _) = board.find_card(active_id)?;

    match over {
        DropTarget::List(list_id) => {
            let target_list = board.list_index(list_id)?;
            if target_list == source_list {
                return None;
            }
            Some(MoveIntent {
                card_id: active_id.to_string(),
                target_list_id: list_id.clone(),
                target_index: board.lists[target_list].cards.len(),
            })
        }
        DropTarget::Card(over_id) => {
            if over_id == active_id {
                return None;
            }
            let (target_list, target_index) = board.find_card(over_id)?;
            Some(MoveIntent {
                card_id: active_id.to_string(),
                target_list_id: board.lists[target_list].id.clone(),
                target_index,
            })
        }
    }
}

/// Transient drag state: the card being dragged, for the preview overlay.
/// Never persisted.
#[derive(Debug, Clone, Default)]
pub struct DragState {
    active: Option<Card>,
}

impl DragState {
    pub fn active(&self) -> Option<&Card> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Record the card under the pointer as the active card.
    pub fn on_drag_start(&mut self, board: &Board, active_id: &str) {
        self.active = board.card(active_id).cloned();
    }

    /// Finish the gesture. The active card is cleared whatever the outcome;
    /// the returned intent (if any) is the only mutation to perform.
    pub fn on_drag_end(&mut self, board: &Board, active_id: &str, over: Option<&DropTarget>) -> Option<MoveIntent> {
        self.active = None;
        resolve_drop(board, active_id, over)
    }

    /// Abort without a drop target.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}
