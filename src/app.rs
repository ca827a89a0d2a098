use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::DefaultTerminal;

use crate::board::ids::{IdGenerator, UuidIds};
use crate::board::storage::{storage_for, SnapshotStorage, StorageError};
use crate::board::store::BoardStore;
use crate::config::Config;
use crate::drag::DragState;
use crate::edit::{EditableField, FieldKind};
use crate::input::action::Action;
use crate::input::keymap::map_key;
use crate::input::pointer::{PointerEvent, PointerTracker};
use crate::ui::layout::{BoardLayout, Hit};

/// Title given to lists created from the "add another list" button.
const NEW_LIST_TITLE: &str = "New list";

/// Current interaction mode.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    /// A card's content or a list's title is being edited. Pointer drags are
    /// not tracked in this mode.
    Edit(EditableField),
    Help,
}

/// Notification severity for statusbar coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// How an edit is being left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditEnd {
    Blur,
    Submit,
    Cancel,
}

/// View state. Nothing in here is persisted.
pub struct AppState {
    pub mode: Mode,
    pub drag: DragState,
    pub pointer: PointerTracker,
    /// Last pointer position while dragging, for the preview overlay.
    pub drag_pos: Option<(u16, u16)>,
    /// Index of the first visible list.
    pub scroll: usize,
    /// Where the board lives, shown in the status bar.
    pub location: String,
    pub notification: Option<String>,
    pub notification_level: NotificationLevel,
    pub notification_expires: Option<Instant>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(activation_distance: u16, location: impl Into<String>) -> Self {
        Self {
            mode: Mode::Normal,
            drag: DragState::default(),
            pointer: PointerTracker::new(activation_distance),
            drag_pos: None,
            scroll: 0,
            location: location.into(),
            notification: None,
            notification_level: NotificationLevel::Info,
            notification_expires: None,
            should_quit: false,
        }
    }

    /// The field being edited, if any.
    pub fn editing(&self) -> Option<&EditableField> {
        match &self.mode {
            Mode::Edit(field) => Some(field),
            _ => None,
        }
    }

    /// Show a transient notification.
    pub fn notify(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Info;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Show a transient error notification (rendered in red).
    pub fn notify_error(&mut self, msg: impl Into<String>) {
        self.notification = Some(msg.into());
        self.notification_level = NotificationLevel::Error;
        self.notification_expires = Some(Instant::now() + Duration::from_secs(3));
    }

    /// Clear expired notifications.
    pub fn tick_notification(&mut self) {
        if let Some(expires) = self.notification_expires {
            if Instant::now() >= expires {
                self.notification = None;
                self.notification_level = NotificationLevel::Info;
                self.notification_expires = None;
            }
        }
    }
}

/// Main TUI application loop.
pub fn run(terminal: &mut DefaultTerminal, tack_dir: &Path, config: &Config) -> color_eyre::Result<()> {
    let storage = storage_for(tack_dir);
    let mut store = BoardStore::open(storage, config.board.storage_key.clone(), UuidIds);
    let mut state = AppState::new(config.drag.activation_distance, tack_dir.display().to_string());

    loop {
        state.tick_notification();

        let size = terminal.size()?;
        let area = crate::ui::board_area(Rect::new(0, 0, size.width, size.height));
        let layout = BoardLayout::compute(store.board(), area, state.scroll, state.editing());

        terminal.draw(|f| crate::ui::render(f, store.board(), &state, &layout))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let action = map_key(key, &state.mode);
                    let result = process_action(&mut store, &mut state, action);
                    report_save_error(&mut state, result);
                }
                Event::Mouse(mouse) => {
                    let result = handle_mouse(&mut store, &mut state, mouse, &layout);
                    report_save_error(&mut state, result);
                }
                _ => {}
            }

            if state.should_quit {
                break;
            }
        }
    }

    Ok(())
}

/// A failed save leaves the in-memory board as it was; tell the user and keep going.
fn report_save_error(state: &mut AppState, result: Result<(), StorageError>) {
    if let Err(err) = result {
        log::error!("event=save_failed error={err}");
        state.notify_error(format!("Could not save board: {err}"));
    }
}

fn process_action<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    state: &mut AppState,
    action: Action,
) -> Result<(), StorageError> {
    match action {
        Action::None => {}
        Action::Quit => state.should_quit = true,
        Action::ShowHelp => state.mode = Mode::Help,
        Action::ClosePanel => state.mode = Mode::Normal,
        Action::ScrollLeft => scroll(store, state, false),
        Action::ScrollRight => scroll(store, state, true),
        Action::CancelDrag => cancel_drag(state),

        Action::InputChar(_)
        | Action::InputBackspace
        | Action::InputLeft
        | Action::InputRight
        | Action::InputHome
        | Action::InputEnd
        | Action::InputDeleteWord
        | Action::InputLineBreak
        | Action::InputSoftSubmit
        | Action::InputCancel => handle_input(store, state, action)?,
    }
    Ok(())
}

fn scroll<S: SnapshotStorage, G: IdGenerator>(store: &BoardStore<S, G>, state: &mut AppState, forward: bool) {
    if forward {
        if state.scroll + 1 < store.board().lists.len() {
            state.scroll += 1;
        }
    } else {
        state.scroll = state.scroll.saturating_sub(1);
    }
}

fn cancel_drag(state: &mut AppState) {
    if state.pointer.cancel().is_some() {
        state.drag.cancel();
        state.drag_pos = None;
        state.notify("Drag cancelled");
    }
}

fn handle_input<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    state: &mut AppState,
    action: Action,
) -> Result<(), StorageError> {
    let Mode::Edit(field) = &mut state.mode else {
        return Ok(());
    };

    match action {
        Action::InputChar(c) => field.buffer_mut().insert(c),
        Action::InputBackspace => field.buffer_mut().backspace(),
        Action::InputLeft => field.buffer_mut().move_left(),
        Action::InputRight => field.buffer_mut().move_right(),
        Action::InputHome => field.buffer_mut().home(),
        Action::InputEnd => field.buffer_mut().end(),
        Action::InputDeleteWord => field.buffer_mut().delete_word(),
        Action::InputLineBreak => {
            if !field.line_break() {
                finish_edit(store, state, EditEnd::Submit)?;
            }
        }
        Action::InputSoftSubmit => finish_edit(store, state, EditEnd::Submit)?,
        Action::InputCancel => finish_edit(store, state, EditEnd::Cancel)?,
        _ => {}
    }
    Ok(())
}

/// Leave edit mode, applying whatever the edit amounts to.
fn finish_edit<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    state: &mut AppState,
    how: EditEnd,
) -> Result<(), StorageError> {
    let Mode::Edit(field) = std::mem::replace(&mut state.mode, Mode::Normal) else {
        return Ok(());
    };
    let commit = match how {
        EditEnd::Blur => field.commit(),
        EditEnd::Submit => field.soft_submit(),
        EditEnd::Cancel => field.cancel(),
    };
    commit.apply(store)?;
    Ok(())
}

fn begin_card_edit<S: SnapshotStorage, G: IdGenerator>(
    store: &BoardStore<S, G>,
    state: &mut AppState,
    list_id: String,
    card_id: String,
) {
    let Some(card) = store.board().card(&card_id) else {
        return;
    };
    let content = card.content.clone();
    state.mode = Mode::Edit(EditableField::begin(FieldKind::CardContent { list_id, card_id }, content));
}

fn begin_title_edit<S: SnapshotStorage, G: IdGenerator>(
    store: &BoardStore<S, G>,
    state: &mut AppState,
    list_id: String,
) {
    let Some(list) = store.board().list(&list_id) else {
        return;
    };
    let title = list.title.clone();
    state.mode = Mode::Edit(EditableField::begin(FieldKind::ListTitle { list_id }, title));
}

fn handle_mouse<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    state: &mut AppState,
    mouse: MouseEvent,
    layout: &BoardLayout,
) -> Result<(), StorageError> {
    let pressed = matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left));

    match &state.mode {
        Mode::Help => {
            if pressed {
                state.mode = Mode::Normal;
            }
            Ok(())
        }
        Mode::Edit(field) => {
            if !pressed {
                return Ok(());
            }
            let inside = match layout.hit(mouse.column, mouse.row) {
                Some(Hit::CardBody { card_id, .. }) => field.edits_card(&card_id),
                Some(Hit::ListTitle { list_id }) => field.edits_title(&list_id),
                _ => false,
            };
            // A press anywhere else blurs the field. The press itself is
            // consumed: the layout it was aimed at may no longer exist.
            if !inside {
                finish_edit(store, state, EditEnd::Blur)?;
            }
            Ok(())
        }
        Mode::Normal => {
            let event = state.pointer.handle(mouse, layout);
            handle_pointer(store, state, event)
        }
    }
}

fn handle_pointer<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    state: &mut AppState,
    event: PointerEvent,
) -> Result<(), StorageError> {
    match event {
        PointerEvent::None => {}
        PointerEvent::Click(hit) => handle_click(store, state, hit)?,
        PointerEvent::DragStart { card_id } => {
            state.drag.on_drag_start(store.board(), &card_id);
            state.drag_pos = None;
        }
        PointerEvent::DragMove { column, row } => state.drag_pos = Some((column, row)),
        PointerEvent::DragEnd { card_id, over } => {
            state.drag_pos = None;
            if let Some(intent) = state.drag.on_drag_end(store.board(), &card_id, over.as_ref()) {
                store.move_card(&intent.card_id, &intent.target_list_id, intent.target_index)?;
            }
        }
        PointerEvent::Scroll { forward } => scroll(store, state, forward),
    }
    Ok(())
}

fn handle_click<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    state: &mut AppState,
    hit: Hit,
) -> Result<(), StorageError> {
    match hit {
        Hit::CardBody { list_id, card_id } => begin_card_edit(store, state, list_id, card_id),
        Hit::CardDelete { list_id, card_id } => {
            if store.delete_card(&list_id, &card_id)? {
                state.notify("Card deleted");
            }
        }
        Hit::ListTitle { list_id } => begin_title_edit(store, state, list_id),
        Hit::ListAdd { list_id } => {
            if let Some(card_id) = store.add_card(&list_id)? {
                begin_card_edit(store, state, list_id, card_id);
            }
        }
        Hit::AddList => {
            let list_id = store.add_list(NEW_LIST_TITLE)?;
            begin_title_edit(store, state, list_id);
        }
        Hit::ListBody { .. } => {}
    }
    Ok(())
}
