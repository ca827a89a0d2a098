pub mod ids;
pub mod ops;
pub mod storage;
pub mod store;

use serde::{Deserialize, Serialize};

/// The whole board: an ordered set of lists. This is the only persisted entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub lists: Vec<List>,
}

/// A named, ordered sequence of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// A single kanban card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub content: String,
}

impl Card {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

impl List {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            cards: Vec::new(),
        }
    }

    /// Index of a card within this list.
    pub fn card_index(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}

impl Board {
    /// The board used when nothing usable is in storage.
    pub fn seed() -> Self {
        Self {
            lists: vec![
                List {
                    id: "1".into(),
                    title: "To Do".into(),
                    cards: vec![Card::new("1", "Task 1"), Card::new("2", "Task 2")],
                },
                List {
                    id: "2".into(),
                    title: "In Progress".into(),
                    cards: vec![Card::new("3", "Task 3")],
                },
            ],
        }
    }

    /// Index of a list by id.
    pub fn list_index(&self, list_id: &str) -> Option<usize> {
        self.lists.iter().position(|l| l.id == list_id)
    }

    pub fn list(&self, list_id: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    /// Find which list a card is in and its index there.
    pub fn find_card(&self, card_id: &str) -> Option<(usize, usize)> {
        for (list_idx, list) in self.lists.iter().enumerate() {
            if let Some(card_idx) = list.card_index(card_id) {
                return Some((list_idx, card_idx));
            }
        }
        None
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.find_card(card_id)
            .map(|(l, c)| &self.lists[l].cards[c])
    }

    /// Total number of cards across all lists.
    pub fn card_count(&self) -> usize {
        self.lists.iter().map(|l| l.cards.len()).sum()
    }
}
