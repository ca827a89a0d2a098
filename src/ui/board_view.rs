use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use super::layout::{box_height, wrap_text, wrapped_cursor, BoardLayout, CardRegion, ListRegion, LIST_WIDTH};
use super::theme::Theme;
use crate::app::AppState;
use crate::board::{Board, Card, List};
use crate::drag::{resolve_drop, DropTarget};
use crate::edit::EditableField;

/// How a card is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CardLook {
    Normal,
    Editing,
    /// The slot left behind by the card being dragged.
    DragSource,
    /// The card the dragged card would land in front of.
    DropTarget,
}

pub(crate) fn card_border_color(look: CardLook) -> Color {
    match look {
        CardLook::Normal => Theme::CARD_BORDER,
        CardLook::Editing => Theme::EDIT_BORDER,
        CardLook::DragSource => Theme::DIM,
        CardLook::DropTarget => Theme::DROP_TARGET,
    }
}

fn card_border_type(look: CardLook) -> BorderType {
    match look {
        CardLook::Editing => BorderType::Double,
        CardLook::DropTarget => BorderType::Thick,
        CardLook::Normal | CardLook::DragSource => BorderType::Rounded,
    }
}

/// Truncate to `width` display columns, ending in `…` when cut.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let avail = width.saturating_sub(1);
    let truncated: String = text
        .graphemes(true)
        .scan(0, |w, g| {
            let gw = g.width();
            (*w + gw <= avail).then(|| {
                *w += gw;
                g
            })
        })
        .collect();
    format!("{truncated}…")
}

/// The part of a single-line field visible in `width` columns, scrolled so
/// the cursor stays in view, and the cursor column within it.
pub(crate) fn edit_window(before: &str, after: &str, width: usize) -> (String, usize) {
    let width = width.max(1);
    let head: Vec<&str> = before.graphemes(true).collect();
    let mut head_width = before.width();
    let mut skip = 0;
    while head_width >= width && skip < head.len() {
        head_width -= head[skip].width();
        skip += 1;
    }

    let mut shown = head[skip..].concat();
    let tail: String = after
        .graphemes(true)
        .scan(head_width, |w, g| {
            let gw = g.width();
            (*w + gw <= width).then(|| {
                *w += gw;
                g
            })
        })
        .collect();
    shown.push_str(&tail);
    (shown, head_width)
}

/// Where the card being dragged would land if released now.
struct Hover {
    list_id: String,
    card_id: Option<String>,
}

fn hover(board: &Board, state: &AppState, layout: &BoardLayout) -> Option<Hover> {
    let card = state.drag.active()?;
    let (column, row) = state.drag_pos?;
    let target = layout.drop_target(column, row);
    let intent = resolve_drop(board, &card.id, target.as_ref())?;
    let card_id = match target {
        Some(DropTarget::Card(id)) => Some(id),
        _ => None,
    };
    Some(Hover { list_id: intent.target_list_id, card_id })
}

pub fn render_board(f: &mut Frame, area: Rect, board: &Board, state: &AppState, layout: &BoardLayout) {
    if layout.lists.is_empty() && layout.add_list.is_none() {
        let msg = Paragraph::new("Terminal too small. Widen it or scroll with h / l.").style(Theme::dim_style());
        f.render_widget(msg, area);
        return;
    }

    let hover = hover(board, state, layout);
    for region in &layout.lists {
        let Some(list) = board.list(&region.list_id) else {
            continue;
        };
        render_list(f, region, list, state, hover.as_ref());
    }

    if let Some(rect) = layout.add_list {
        render_add_list(f, rect);
    }

    if let (Some(card), Some(pos)) = (state.drag.active(), state.drag_pos) {
        render_drag_preview(f, area, card, pos);
    }
}

fn render_list(f: &mut Frame, region: &ListRegion, list: &List, state: &AppState, hover: Option<&Hover>) {
    let targeted = hover.is_some_and(|h| h.list_id == region.list_id);
    let border_style = if targeted {
        Style::default().fg(Theme::DROP_TARGET).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::LIST_BORDER)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style);
    f.render_widget(block, region.area);

    render_title(f, region, list, state.editing());
    f.render_widget(
        Paragraph::new(Span::styled("+", Style::default().fg(Theme::ADD).add_modifier(Modifier::BOLD))),
        region.add,
    );

    let editing = state.editing();
    let dragged = state.drag.active().map(|c| c.id.as_str());
    let hovered = hover.and_then(|h| h.card_id.as_deref());

    for card_region in &region.cards {
        let Some(card) = list.cards.iter().find(|c| c.id == card_region.card_id) else {
            continue;
        };
        let look = if editing.is_some_and(|e| e.edits_card(&card.id)) {
            CardLook::Editing
        } else if dragged == Some(card.id.as_str()) {
            CardLook::DragSource
        } else if hovered == Some(card.id.as_str()) {
            CardLook::DropTarget
        } else {
            CardLook::Normal
        };
        render_card(f, card_region, card, look, editing);
    }

    // Cards below the fold
    let hidden = list.cards.len().saturating_sub(region.cards.len());
    if hidden > 0 && region.area.height > 0 {
        let label = format!(" +{hidden} more ");
        let rect = Rect::new(
            region.area.x + 2,
            region.area.bottom() - 1,
            (label.width() as u16).min(region.area.width.saturating_sub(4)),
            1,
        );
        f.render_widget(Paragraph::new(Span::styled(label, Theme::dim_style())), rect);
    }
}

fn render_title(f: &mut Frame, region: &ListRegion, list: &List, editing: Option<&EditableField>) {
    let width = region.title.width as usize;
    match editing {
        Some(field) if field.edits_title(&list.id) => {
            let buf = field.buffer();
            let before = buf.before_cursor();
            let (shown, col) = edit_window(before, &buf.input[before.len()..], width);
            let style = Style::default()
                .fg(Theme::LIST_TITLE)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
            f.render_widget(Paragraph::new(Span::styled(shown, style)), region.title);
            f.set_cursor_position(Position::new(region.title.x + col as u16, region.title.y));
        }
        _ => {
            let style = Style::default().fg(Theme::LIST_TITLE).add_modifier(Modifier::BOLD);
            f.render_widget(Paragraph::new(Span::styled(truncate(&list.title, width), style)), region.title);
        }
    }
}

fn render_card(f: &mut Frame, region: &CardRegion, card: &Card, look: CardLook, editing: Option<&EditableField>) {
    if region.area.width < 4 || region.area.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(card_border_type(look))
        .border_style(Style::default().fg(card_border_color(look)));
    let inner = block.inner(region.area);
    f.render_widget(block, region.area);

    let text_style = match look {
        CardLook::DragSource => Theme::dim_style(),
        _ => Style::default().fg(Theme::CARD_TEXT),
    };
    let lines: Vec<Line> = if card.content.is_empty() && look != CardLook::Editing {
        vec![Line::from(Span::styled("(empty)", Theme::dim_style()))]
    } else {
        region
            .lines
            .iter()
            .map(|l| Line::from(Span::styled(l.as_str(), text_style)))
            .collect()
    };
    f.render_widget(Paragraph::new(lines), inner);

    match (look, editing) {
        (CardLook::Editing, Some(field)) => {
            let (line, col) = wrapped_cursor(field.buffer().before_cursor(), inner.width as usize);
            let (line, col) = if line >= inner.height as usize {
                (inner.height.saturating_sub(1), inner.width.saturating_sub(1))
            } else {
                (line as u16, col as u16)
            };
            f.set_cursor_position(Position::new(inner.x + col, inner.y + line));
        }
        (CardLook::Normal | CardLook::DropTarget, _) => {
            f.render_widget(
                Paragraph::new(Span::styled("×", Style::default().fg(Theme::DELETE))),
                region.delete,
            );
        }
        _ => {}
    }
}

fn render_add_list(f: &mut Frame, rect: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::dim_style());
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    f.render_widget(
        Paragraph::new(Span::styled("+ Add another list", Style::default().fg(Theme::ADD))),
        inner,
    );
}

/// The dragged card, floating at the pointer.
fn render_drag_preview(f: &mut Frame, area: Rect, card: &Card, (column, row): (u16, u16)) {
    let width = LIST_WIDTH - 2;
    let lines = wrap_text(&card.content, width.saturating_sub(2) as usize);
    let height = box_height(lines.len()).min(area.height);
    let x = column.min(area.right().saturating_sub(width)).max(area.x);
    let y = row.min(area.bottom().saturating_sub(height)).max(area.y);
    let rect = Rect::new(x, y, width, height).intersection(area);
    if rect.is_empty() {
        return;
    }

    f.render_widget(Clear, rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(Theme::DRAG_PREVIEW));
    let inner = block.inner(rect);
    f.render_widget(block, rect);
    let text: Vec<Line> = lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().add_modifier(Modifier::BOLD))))
        .collect();
    f.render_widget(Paragraph::new(text), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── truncate ──────────────────────────────────────────────────────────────

    #[test]
    fn truncate_short_text_untouched() {
        assert_eq!(truncate("To Do", 10), "To Do");
        assert_eq!(truncate("To Do", 5), "To Do");
    }

    #[test]
    fn truncate_long_text_gets_ellipsis() {
        assert_eq!(truncate("In Progress", 6), "In Pr…");
    }

    #[test]
    fn truncate_does_not_split_wide_chars() {
        // "日本" is 4 wide; 3 columns leave room for one glyph plus the ellipsis.
        assert_eq!(truncate("日本語", 4), "日…");
    }

    // ── edit_window ───────────────────────────────────────────────────────────

    #[test]
    fn edit_window_fits() {
        assert_eq!(edit_window("abc", "", 5), ("abc".into(), 3));
        assert_eq!(edit_window("ab", "c", 5), ("abc".into(), 2));
    }

    #[test]
    fn edit_window_scrolls_to_keep_cursor_visible() {
        assert_eq!(edit_window("abcdef", "", 4), ("def".into(), 3));
    }

    #[test]
    fn edit_window_clips_text_after_cursor() {
        assert_eq!(edit_window("ab", "cdef", 4), ("abcd".into(), 2));
    }

    // ── card_border_color ─────────────────────────────────────────────────────

    #[test]
    fn border_color_per_look() {
        assert_eq!(card_border_color(CardLook::Normal), Theme::CARD_BORDER);
        assert_eq!(card_border_color(CardLook::Editing), Theme::EDIT_BORDER);
        assert_eq!(card_border_color(CardLook::DragSource), Theme::DIM);
        assert_eq!(card_border_color(CardLook::DropTarget), Theme::DROP_TARGET);
    }

    #[test]
    fn drop_target_uses_thick_border() {
        assert_eq!(card_border_type(CardLook::DropTarget), BorderType::Thick);
        assert_eq!(card_border_type(CardLook::Normal), BorderType::Rounded);
    }
}
