use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::action::Action;
use crate::app::Mode;

/// Map a key event to a semantic action based on current mode.
pub fn map_key(key: KeyEvent, mode: &Mode) -> Action {
    match mode {
        Mode::Normal => map_normal(key),
        Mode::Edit(_) => map_edit(key),
        Mode::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Action::ClosePanel,
            _ => Action::None,
        },
    }
}

fn map_normal(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Action::ScrollLeft,
        KeyCode::Char('l') | KeyCode::Right => Action::ScrollRight,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ShowHelp,
        KeyCode::Esc => Action::CancelDrag,
        _ => Action::None,
    }
}

/// Keys while a card or list title is being edited.
///
/// Plain Enter is a line break; Ctrl+S, Ctrl+Enter and Alt+Enter commit
/// (many terminals cannot report Ctrl+Enter, hence the alternatives).
fn map_edit(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => Action::InputCancel,
        KeyCode::Enter if ctrl || alt => Action::InputSoftSubmit,
        KeyCode::Enter => Action::InputLineBreak,
        KeyCode::Char('s') if ctrl => Action::InputSoftSubmit,
        KeyCode::Char('w') if ctrl => Action::InputDeleteWord,
        KeyCode::Backspace if ctrl || alt => Action::InputDeleteWord,
        KeyCode::Backspace => Action::InputBackspace,
        KeyCode::Left => Action::InputLeft,
        KeyCode::Right => Action::InputRight,
        KeyCode::Home => Action::InputHome,
        KeyCode::End => Action::InputEnd,
        KeyCode::Char(c) if !ctrl => Action::InputChar(c),
        _ => Action::None,
    }
}
