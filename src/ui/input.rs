//! Translation of terminal input into interaction events
//!
//! The terminal has one pointer (the mouse) which is given a fixed id. A
//! drag or wheel gesture plays the role of a browser scroll and cancels the
//! pointer session.

use crate::event::{EventKind, InteractionEvent};
use crossterm::event::{Event, KeyEventKind, MouseEventKind};

/// Pointer id assigned to the terminal mouse
pub const MOUSE_POINTER_ID: i32 = 1;

/// Interaction events a terminal event stands for, stamped at `time_stamp`
pub fn translate(event: &Event, time_stamp: f64) -> Vec<InteractionEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            vec![InteractionEvent::new(EventKind::KeyDown, true, time_stamp)]
        }
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(_) => vec![
                pointer(EventKind::PointerDown, true, time_stamp),
                InteractionEvent::new(EventKind::MouseDown, true, time_stamp),
            ],
            MouseEventKind::Up(_) => vec![
                pointer(EventKind::PointerUp, true, time_stamp),
                InteractionEvent::new(EventKind::Click, true, time_stamp),
            ],
            MouseEventKind::Drag(_)
            | MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => {
                vec![pointer(EventKind::PointerCancel, false, time_stamp)]
            }
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn pointer(kind: EventKind, cancelable: bool, time_stamp: f64) -> InteractionEvent {
    InteractionEvent::new(kind, cancelable, time_stamp).with_pointer_id(MOUSE_POINTER_ID)
}
