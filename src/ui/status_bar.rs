use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use super::layout::BoardLayout;
use super::theme::Theme;
use crate::app::{AppState, Mode, NotificationLevel};
use crate::board::Board;

pub fn render_status_bar(f: &mut Frame, area: Rect, state: &AppState, board: &Board, layout: &BoardLayout) {
    let left = build_left_zone(state);
    let right = build_right_zone(state, board, layout);

    let left_width: usize = left.iter().map(|s| s.content.width()).sum();
    let right_width: usize = right.iter().map(|s| s.content.width()).sum();
    let center_avail = (area.width as usize).saturating_sub(left_width + right_width);
    let center = build_center_zone(state, center_avail);

    let mut spans = left;
    spans.extend(center);
    spans.extend(right);

    let paragraph = Paragraph::new(Line::from(spans)).style(Theme::status_style());
    f.render_widget(paragraph, area);
}

/// Badge for the current interaction state.
pub(crate) fn mode_label(state: &AppState) -> &'static str {
    match &state.mode {
        Mode::Edit(_) => "EDIT",
        Mode::Help => "HELP",
        Mode::Normal if state.drag.is_dragging() => "DRAG",
        Mode::Normal => "VIEW",
    }
}

/// Mode badge + board location.
fn build_left_zone(state: &AppState) -> Vec<Span<'_>> {
    vec![
        Span::styled(
            format!(" {} ", mode_label(state)),
            Style::default()
                .fg(Theme::FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(" "),
        Span::styled(format!("{} ", state.location), Style::default().fg(Theme::DIM)),
    ]
}

/// Key hints while editing or dragging, list window otherwise.
fn build_right_zone(state: &AppState, board: &Board, layout: &BoardLayout) -> Vec<Span<'static>> {
    let text = match &state.mode {
        Mode::Edit(field) if field.is_multiline() => "Ctrl+S save · Esc discard ".to_string(),
        Mode::Edit(_) => "Enter save · Esc discard ".to_string(),
        _ if state.drag.is_dragging() => "Esc cancel drag ".to_string(),
        _ => list_window(board, layout),
    };
    vec![Span::styled(text, Style::default().fg(Theme::DIM))]
}

/// "lists 2-4/6 · 9 cards"
pub(crate) fn list_window(board: &Board, layout: &BoardLayout) -> String {
    let total = board.lists.len();
    let shown = layout.lists.len();
    let cards = board.card_count();
    if shown == 0 || shown == total {
        format!("{cards} cards ")
    } else {
        let first = layout.hidden_before + 1;
        let last = layout.hidden_before + shown;
        format!("lists {first}-{last}/{total} · {cards} cards ")
    }
}

/// Notification text padded to fill available width.
fn build_center_zone(state: &AppState, avail_width: usize) -> Vec<Span<'_>> {
    let Some(ref notif) = state.notification else {
        return vec![Span::raw(" ".repeat(avail_width))];
    };
    let color = match state.notification_level {
        NotificationLevel::Info => Theme::FG,
        NotificationLevel::Error => Theme::STATUS_ERROR,
    };

    let notif_width = notif.width();
    if notif_width >= avail_width {
        let truncated: String = notif.chars().take(avail_width).collect();
        return vec![Span::styled(truncated, Style::default().fg(color))];
    }

    let pad_total = avail_width - notif_width;
    let pad_left = pad_total / 2;
    vec![
        Span::raw(" ".repeat(pad_left)),
        Span::styled(notif.as_str(), Style::default().fg(color)),
        Span::raw(" ".repeat(pad_total - pad_left)),
    ]
}
