//! Board geometry shared by rendering and pointer hit-testing.
//!
//! Lists are the drop regions (keyed by list id) and cards the sortable items
//! (keyed by card id). The same [`BoardLayout`] drives both drawing and mouse
//! handling, so what you see is what you hit.

use ratatui::layout::{Position, Rect};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::board::{Board, List};
use crate::drag::DropTarget;
use crate::edit::EditableField;

pub const LIST_WIDTH: u16 = 30;
pub const LIST_GAP: u16 = 1;
pub const ADD_LIST_HEIGHT: u16 = 3;

/// Rows above the first card inside a list: top border, title, spacer.
const LIST_HEADER_ROWS: u16 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRegion {
    pub card_id: String,
    pub area: Rect,
    /// The `×` control on the card's top border.
    pub delete: Rect,
    /// Content wrapped to the card's inner width.
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRegion {
    pub list_id: String,
    pub area: Rect,
    pub title: Rect,
    /// The `+` control at the right of the title row.
    pub add: Rect,
    pub cards: Vec<CardRegion>,
}

/// What a screen cell belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hit {
    CardBody { list_id: String, card_id: String },
    CardDelete { list_id: String, card_id: String },
    ListTitle { list_id: String },
    ListAdd { list_id: String },
    ListBody { list_id: String },
    AddList,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardLayout {
    pub lists: Vec<ListRegion>,
    pub add_list: Option<Rect>,
    /// Lists scrolled off to the left / not fitting on the right.
    pub hidden_before: usize,
    pub hidden_after: usize,
}

impl BoardLayout {
    /// Lay out `board` in `area`, skipping the first `scroll` lists. A card
    /// being edited is measured from the edit buffer rather than its content.
    pub fn compute(board: &Board, area: Rect, scroll: usize, editing: Option<&EditableField>) -> Self {
        let scroll = scroll.min(board.lists.len());
        let right = u32::from(area.x) + u32::from(area.width);
        let mut x = u32::from(area.x);
        let mut lists = Vec::new();

        if area.height > LIST_HEADER_ROWS {
            for list in board.lists.iter().skip(scroll) {
                if x + u32::from(LIST_WIDTH) > right {
                    break;
                }
                let rect = Rect::new(x as u16, area.y, LIST_WIDTH, area.height);
                lists.push(list_region(list, rect, editing));
                x += u32::from(LIST_WIDTH + LIST_GAP);
            }
        }

        let hidden_after = board.lists.len() - scroll - lists.len();
        let add_list = (hidden_after == 0
            && x + u32::from(LIST_WIDTH) <= right
            && area.height >= ADD_LIST_HEIGHT)
            .then(|| Rect::new(x as u16, area.y, LIST_WIDTH, ADD_LIST_HEIGHT));

        Self {
            lists,
            add_list,
            hidden_before: scroll,
            hidden_after,
        }
    }

    pub fn list(&self, list_id: &str) -> Option<&ListRegion> {
        self.lists.iter().find(|l| l.list_id == list_id)
    }

    pub fn card(&self, card_id: &str) -> Option<&CardRegion> {
        self.lists
            .iter()
            .flat_map(|l| l.cards.iter())
            .find(|c| c.card_id == card_id)
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let pos = Position::new(column, row);
        for list in &self.lists {
            if !list.area.contains(pos) {
                continue;
            }
            let list_id = list.list_id.clone();
            for card in &list.cards {
                if card.delete.contains(pos) {
                    return Some(Hit::CardDelete { list_id, card_id: card.card_id.clone() });
                }
                if card.area.contains(pos) {
                    return Some(Hit::CardBody { list_id, card_id: card.card_id.clone() });
                }
            }
            if list.add.contains(pos) {
                return Some(Hit::ListAdd { list_id });
            }
            if list.title.contains(pos) {
                return Some(Hit::ListTitle { list_id });
            }
            return Some(Hit::ListBody { list_id });
        }
        match self.add_list {
            Some(rect) if rect.contains(pos) => Some(Hit::AddList),
            _ => None,
        }
    }

    /// The drop target under a cell, if any.
    pub fn drop_target(&self, column: u16, row: u16) -> Option<DropTarget> {
        match self.hit(column, row)? {
            Hit::CardBody { card_id, .. } | Hit::CardDelete { card_id, .. } => Some(DropTarget::Card(card_id)),
            Hit::ListTitle { list_id } | Hit::ListAdd { list_id } | Hit::ListBody { list_id } => {
                Some(DropTarget::List(list_id))
            }
            Hit::AddList => None,
        }
    }
}

fn list_region(list: &List, rect: Rect, editing: Option<&EditableField>) -> ListRegion {
    let inner_x = rect.x + 1;
    let inner_w = rect.width.saturating_sub(2);
    let title = Rect::new(inner_x, rect.y + 1, inner_w.saturating_sub(2), 1);
    let add = Rect::new(inner_x + inner_w.saturating_sub(1), rect.y + 1, 1, 1);

    let text_width = inner_w.saturating_sub(2) as usize;
    let bottom = rect.y + rect.height.saturating_sub(1);
    let mut y = rect.y + LIST_HEADER_ROWS;
    let mut cards = Vec::new();

    for card in &list.cards {
        let text = match editing {
            Some(field) if field.edits_card(&card.id) => field.buffer().input.as_str(),
            _ => card.content.as_str(),
        };
        let room = bottom.saturating_sub(y);
        if room < 3 {
            break;
        }
        let mut lines = wrap_text(text, text_width);
        lines.truncate(usize::from(room - 2));
        let height = box_height(lines.len());
        let area = Rect::new(inner_x, y, inner_w, height);
        let delete = Rect::new(inner_x + inner_w.saturating_sub(3), y, 1, 1);
        cards.push(CardRegion {
            card_id: card.id.clone(),
            area,
            delete,
            lines,
        });
        y = y.saturating_add(height);
    }

    ListRegion {
        list_id: list.id.clone(),
        area: rect,
        title,
        add,
        cards,
    }
}

/// Rows taken by a bordered box around `lines` lines of text.
pub(crate) fn box_height(lines: usize) -> u16 {
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
}

/// Hard-wrap text to `width` display columns, keeping explicit line breaks.
/// Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0;
        for g in raw.graphemes(true) {
            let gw = g.width();
            if line_width + gw > width && !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            line.push_str(g);
            line_width += gw;
        }
        out.push(line);
    }
    out
}

/// Where the cursor sits (line, column) after `before_cursor` has been
/// wrapped to `width`.
pub fn wrapped_cursor(before_cursor: &str, width: usize) -> (usize, usize) {
    let width = width.max(1);
    let lines = wrap_text(before_cursor, width);
    let last = lines.last().map(|l| l.width()).unwrap_or(0);
    if last >= width {
        (lines.len(), 0)
    } else {
        (lines.len() - 1, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Card;
    use crate::edit::FieldKind;

    fn area() -> Rect {
        Rect::new(0, 0, 100, 30)
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("", 5), vec![""]);
        assert_eq!(wrap_text("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(wrap_text("ab\n\ncd", 5), vec!["ab", "", "cd"]);
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn test_wrapped_cursor() {
        assert_eq!(wrapped_cursor("", 5), (0, 0));
        assert_eq!(wrapped_cursor("abc", 5), (0, 3));
        assert_eq!(wrapped_cursor("abcde", 5), (1, 0));
        assert_eq!(wrapped_cursor("ab\n", 5), (1, 0));
    }

    #[test]
    fn test_seed_layout_geometry() {
        let layout = BoardLayout::compute(&Board::seed(), area(), 0, None);
        assert_eq!(layout.lists.len(), 2);
        assert_eq!(layout.lists[0].area, Rect::new(0, 0, LIST_WIDTH, 30));
        assert_eq!(layout.lists[1].area.x, LIST_WIDTH + LIST_GAP);
        assert_eq!(layout.add_list, Some(Rect::new(2 * (LIST_WIDTH + LIST_GAP), 0, LIST_WIDTH, 3)));

        let cards = &layout.lists[0].cards;
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].area, Rect::new(1, 3, LIST_WIDTH - 2, 3));
        assert_eq!(cards[1].area.y, 6);
    }

    #[test]
    fn test_hit_testing() {
        let layout = BoardLayout::compute(&Board::seed(), area(), 0, None);
        let card = &layout.lists[0].cards[0];
        assert_eq!(
            layout.hit(card.area.x + 2, card.area.y + 1),
            Some(Hit::CardBody { list_id: "1".into(), card_id: "1".into() })
        );
        assert_eq!(
            layout.hit(card.delete.x, card.delete.y),
            Some(Hit::CardDelete { list_id: "1".into(), card_id: "1".into() })
        );
        let list = &layout.lists[1];
        assert_eq!(layout.hit(list.title.x, list.title.y), Some(Hit::ListTitle { list_id: "2".into() }));
        assert_eq!(layout.hit(list.add.x, list.add.y), Some(Hit::ListAdd { list_id: "2".into() }));
        assert_eq!(layout.hit(list.area.x + 3, 20), Some(Hit::ListBody { list_id: "2".into() }));
        assert_eq!(layout.hit(63, 1), Some(Hit::AddList));
        assert_eq!(layout.hit(99, 29), None);
    }

    #[test]
    fn test_drop_targets() {
        let layout = BoardLayout::compute(&Board::seed(), area(), 0, None);
        let c3 = layout.card("3").unwrap().area;
        assert_eq!(layout.drop_target(c3.x + 1, c3.y + 1), Some(DropTarget::Card("3".into())));
        assert_eq!(layout.drop_target(35, 25), Some(DropTarget::List("2".into())));
        assert_eq!(layout.drop_target(63, 1), None);
        assert_eq!(layout.drop_target(90, 20), None);
    }

    #[test]
    fn test_scroll_and_overflow() {
        let mut board = Board::seed();
        for i in 0..5 {
            board.lists.push(crate::board::List::new(format!("x{i}"), "More"));
        }
        let layout = BoardLayout::compute(&board, area(), 0, None);
        assert_eq!(layout.lists.len(), 3);
        assert_eq!(layout.hidden_after, 4);
        assert!(layout.add_list.is_none());

        let layout = BoardLayout::compute(&board, area(), 5, None);
        assert_eq!(layout.hidden_before, 5);
        assert_eq!(layout.lists[0].list_id, "x3");
        assert_eq!(layout.lists.len(), 2);
        assert!(layout.add_list.is_some());
    }

    #[test]
    fn test_editing_card_uses_buffer_height() {
        let board = Board::seed();
        let mut field = EditableField::begin(
            FieldKind::CardContent { list_id: "1".into(), card_id: "1".into() },
            "Task 1",
        );
        field.line_break();
        field.buffer_mut().insert('x');
        let layout = BoardLayout::compute(&board, area(), 0, Some(&field));
        assert_eq!(layout.card("1").unwrap().area.height, 4);
        assert_eq!(layout.card("2").unwrap().area.y, 7);
    }

    #[test]
    fn test_cards_that_do_not_fit_are_clipped() {
        let mut board = Board::seed();
        board.lists[0].cards = (0..20).map(|i| Card::new(format!("c{i}"), "x")).collect();
        let layout = BoardLayout::compute(&board, Rect::new(0, 0, 40, 12), 0, None);
        // Header rows 0..3, bottom border at 11: cards of height 3 at y=3,6.
        assert_eq!(layout.lists[0].cards.len(), 2);
    }

    #[test]
    fn test_huge_card_is_cut_to_the_list() {
        let mut board = Board::seed();
        board.lists[0].cards[0].content = "x\n".repeat(65533);
        let layout = BoardLayout::compute(&board, area(), 0, None);
        let card = layout.card("1").unwrap();
        assert_eq!(card.area, Rect::new(1, 3, LIST_WIDTH - 2, 26));
        assert_eq!(card.lines.len(), 24);
        assert!(layout.card("2").is_none());
        assert!(layout.card("3").is_some());
    }

    #[test]
    fn test_box_height_saturates() {
        assert_eq!(box_height(1), 3);
        assert_eq!(box_height(usize::from(u16::MAX)), u16::MAX);
        assert_eq!(box_height(100_000), u16::MAX);
    }
}
