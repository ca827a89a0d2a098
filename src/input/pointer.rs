use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::drag::DropTarget;
use crate::ui::layout::{BoardLayout, Hit};

/// High-level pointer gestures derived from raw mouse events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    /// Press and release without travelling far enough to start a drag.
    Click(Hit),
    DragStart { card_id: String },
    DragMove { column: u16, row: u16 },
    DragEnd { card_id: String, over: Option<DropTarget> },
    Scroll { forward: bool },
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Pressed { origin: (u16, u16), hit: Option<Hit> },
    Dragging { card_id: String },
}

/// Press / move / release tracking with an activation distance, so that an
/// ordinary click on a card is never mistaken for a drag.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    phase: Phase,
    activation_distance: u16,
}

impl PointerTracker {
    pub fn new(activation_distance: u16) -> Self {
        Self {
            phase: Phase::Idle,
            activation_distance: activation_distance.max(1),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Drop any gesture in progress. Returns the dragged card, if there was one.
    pub fn cancel(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging { card_id } => Some(card_id),
            _ => None,
        }
    }

    pub fn handle(&mut self, event: MouseEvent, layout: &BoardLayout) -> PointerEvent {
        let (column, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.phase = Phase::Pressed {
                    origin: (column, row),
                    hit: layout.hit(column, row),
                };
                PointerEvent::None
            }
            MouseEventKind::Drag(MouseButton::Left) => match &self.phase {
                Phase::Pressed { origin, hit } => {
                    let distance = origin.0.abs_diff(column).max(origin.1.abs_diff(row));
                    if distance < self.activation_distance {
                        return PointerEvent::None;
                    }
                    match hit {
                        // Only card bodies are draggable; the delete control is a button.
                        Some(Hit::CardBody { card_id, .. }) => {
                            let card_id = card_id.clone();
                            self.phase = Phase::Dragging { card_id: card_id.clone() };
                            PointerEvent::DragStart { card_id }
                        }
                        _ => {
                            self.phase = Phase::Idle;
                            PointerEvent::None
                        }
                    }
                }
                Phase::Dragging { .. } => PointerEvent::DragMove { column, row },
                Phase::Idle => PointerEvent::None,
            },
            MouseEventKind::Up(MouseButton::Left) => {
                match std::mem::replace(&mut self.phase, Phase::Idle) {
                    Phase::Dragging { card_id } => PointerEvent::DragEnd {
                        card_id,
                        over: layout.drop_target(column, row),
                    },
                    Phase::Pressed { hit: Some(hit), .. } => PointerEvent::Click(hit),
                    _ => PointerEvent::None,
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight if !self.is_dragging() => {
                PointerEvent::Scroll { forward: true }
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if !self.is_dragging() => {
                PointerEvent::Scroll { forward: false }
            }
            _ => PointerEvent::None,
        }
    }
}
