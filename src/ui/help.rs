use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui::Frame;

use super::theme::Theme;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Mouse",
        &[
            ("click card", "Edit its text"),
            ("drag card", "Move it; drop on a card or a list"),
            ("click title", "Rename the list"),
            ("+", "Add a card to the list"),
            ("×", "Delete the card"),
            ("wheel", "Scroll lists"),
        ],
    ),
    (
        "Board",
        &[
            ("h / l", "Scroll lists"),
            ("Esc", "Cancel a drag"),
            ("?", "This help"),
            ("q", "Quit"),
        ],
    ),
    (
        "Editing",
        &[
            ("Enter", "New line (cards) / save (titles)"),
            ("Ctrl+S", "Save"),
            ("Alt+Enter", "Save"),
            ("Ctrl+W", "Delete word"),
            ("Esc", "Discard changes"),
            ("click away", "Save"),
        ],
    ),
];

pub fn render_help(f: &mut Frame, area: Rect) {
    let panel_area = super::centered_rect(area, 60, 80, 50, 22);

    f.render_widget(Clear, panel_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::FG))
        .title(Span::styled(
            " tack help ",
            Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
        ))
        .padding(Padding::new(2, 2, 1, 1));

    let inner = block.inner(panel_area);
    f.render_widget(block, panel_area);

    if inner.height == 0 {
        return;
    }

    let key = Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD);
    let dim = Theme::dim_style();
    let heading = Style::default()
        .fg(Theme::FG)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let mut lines = Vec::new();
    for (title, entries) in SECTIONS {
        lines.push(Line::from(Span::styled(*title, heading)));
        for (keys, desc) in *entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:<12}"), key),
                Span::styled(*desc, dim),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press Esc to close",
        Style::default().fg(Theme::FG).add_modifier(Modifier::BOLD),
    )));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(paragraph, inner);
}
