//! Pure board operations.
//!
//! Every function takes a snapshot by reference and returns a fresh one, so
//! holders of the old snapshot never observe a change. Unknown list or card
//! ids are not errors: the returned board is simply equal to the input.

use super::ids::IdGenerator;
use super::{Board, Card, List};

/// Move a card to `target_list_id` at `target_index`.
///
/// The card is removed first, then inserted at `target_index` clamped to the
/// target list's length after removal. Within one list this is the usual
/// "move element from i to j" reorder.
pub fn move_card(board: &Board, card_id: &str, target_list_id: &str, target_index: usize) -> Board {
    let mut next = board.clone();
    let (Some((from_list, from_idx)), Some(to_list)) =
        (board.find_card(card_id), board.list_index(target_list_id))
    else {
        return next;
    };

    let card = next.lists[from_list].cards.remove(from_idx);
    let cards = &mut next.lists[to_list].cards;
    let index = target_index.min(cards.len());
    cards.insert(index, card);
    next
}

/// Set a list's title. Unchanged titles and unknown lists are no-ops.
pub fn rename_list(board: &Board, list_id: &str, new_title: &str) -> Board {
    let mut next = board.clone();
    if let Some(list) = next.lists.iter_mut().find(|l| l.id == list_id) {
        if list.title != new_title {
            list.title = new_title.to_string();
        }
    }
    next
}

/// Append an empty card with a fresh id to a list.
///
/// Returns the new snapshot and the id of the created card, or `None` when
/// the list does not exist (no id is consumed in that case).
pub fn add_card(board: &Board, list_id: &str, ids: &mut dyn IdGenerator) -> (Board, Option<String>) {
    let mut next = board.clone();
    let Some(list) = next.lists.iter_mut().find(|l| l.id == list_id) else {
        return (next, None);
    };
    let id = ids.next_id();
    list.cards.push(Card::new(id.clone(), String::new()));
    (next, Some(id))
}

/// Set a card's content to the trimmed `content`.
///
/// Content that trims to nothing deletes the card instead.
pub fn update_card_content(board: &Board, list_id: &str, card_id: &str, content: &str) -> Board {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return delete_card(board, list_id, card_id);
    }

    let mut next = board.clone();
    let card = next
        .lists
        .iter_mut()
        .find(|l| l.id == list_id)
        .and_then(|l| l.cards.iter_mut().find(|c| c.id == card_id));
    if let Some(card) = card {
        if card.content != trimmed {
            card.content = trimmed.to_string();
        }
    }
    next
}

/// Remove a card from a list.
pub fn delete_card(board: &Board, list_id: &str, card_id: &str) -> Board {
    let mut next = board.clone();
    if let Some(list) = next.lists.iter_mut().find(|l| l.id == list_id) {
        list.cards.retain(|c| c.id != card_id);
    }
    next
}

/// Append a new, empty list with a fresh id. Returns the new list's id.
pub fn add_list(board: &Board, title: &str, ids: &mut dyn IdGenerator) -> (Board, String) {
    let mut next = board.clone();
    let id = ids.next_id();
    next.lists.push(List::new(id.clone(), title));
    (next, id)
}
