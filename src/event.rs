//! Interaction event types and listener options

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of interaction event the recorder cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    MouseDown,
    KeyDown,
    TouchStart,
    PointerDown,
    PointerUp,
    PointerCancel,
}

/// Event kinds attached page-wide for the lifetime of the recorder
pub const MONITORED_EVENTS: [EventKind; 5] = [
    EventKind::Click,
    EventKind::MouseDown,
    EventKind::KeyDown,
    EventKind::TouchStart,
    EventKind::PointerDown,
];

impl EventKind {
    /// DOM event type name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseDown => "mousedown",
            Self::KeyDown => "keydown",
            Self::TouchStart => "touchstart",
            Self::PointerDown => "pointerdown",
            Self::PointerUp => "pointerup",
            Self::PointerCancel => "pointercancel",
        }
    }

    /// Parse a DOM event type name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "click" => Some(Self::Click),
            "mousedown" => Some(Self::MouseDown),
            "keydown" => Some(Self::KeyDown),
            "touchstart" => Some(Self::TouchStart),
            "pointerdown" => Some(Self::PointerDown),
            "pointerup" => Some(Self::PointerUp),
            "pointercancel" => Some(Self::PointerCancel),
            _ => None,
        }
    }

    /// Whether this kind can start a first input on its own
    pub fn is_monitored(&self) -> bool {
        MONITORED_EVENTS.contains(self)
    }

    /// Whether this kind belongs to a pointer sequence
    pub fn is_pointer(&self) -> bool {
        matches!(
            self,
            Self::PointerDown | Self::PointerUp | Self::PointerCancel
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An input event as delivered by the host's dispatch runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Event type
    pub kind: EventKind,
    /// Whether the default action can be prevented
    pub cancelable: bool,
    /// Timestamp in milliseconds; either monotonic or epoch based
    pub time_stamp: f64,
    /// Pointer identifier, set for pointer events only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_id: Option<i32>,
}

impl InteractionEvent {
    pub fn new(kind: EventKind, cancelable: bool, time_stamp: f64) -> Self {
        Self {
            kind,
            cancelable,
            time_stamp,
            pointer_id: None,
        }
    }

    /// Attach a pointer identifier
    pub fn with_pointer_id(mut self, pointer_id: i32) -> Self {
        self.pointer_id = Some(pointer_id);
        self
    }
}

/// Options passed alongside `add_event_listener` / `remove_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerOptions {
    /// Listener promises never to prevent the default action
    pub passive: bool,
    /// Listener fires during the capture phase
    pub capture: bool,
}

impl ListenerOptions {
    /// Passive capture-phase options used for every recorder listener
    pub const PASSIVE_CAPTURE: Self = Self {
        passive: true,
        capture: true,
    };
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self::PASSIVE_CAPTURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitored_events_exclude_pointer_resolution() {
        assert!(EventKind::PointerDown.is_monitored());
        assert!(!EventKind::PointerUp.is_monitored());
        assert!(!EventKind::PointerCancel.is_monitored());
        assert_eq!(MONITORED_EVENTS.len(), 5);
    }

    #[test]
    fn names_parse_back() {
        for kind in MONITORED_EVENTS {
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(EventKind::from_name("scroll"), None);
    }

    #[test]
    fn pointer_kinds() {
        assert!(EventKind::PointerCancel.is_pointer());
        assert!(!EventKind::TouchStart.is_pointer());
    }

    #[test]
    fn with_pointer_id_sets_id() {
        let event = InteractionEvent::new(EventKind::PointerDown, true, 10.0).with_pointer_id(3);
        assert_eq!(event.pointer_id, Some(3));
    }

    #[test]
    fn kind_serializes_as_dom_name() {
        let json = serde_json::to_string(&EventKind::MouseDown).expect("serialize");
        assert_eq!(json, "\"mousedown\"");
    }

    #[test]
    fn default_options_are_passive_capture() {
        let opts = ListenerOptions::default();
        assert!(opts.passive);
        assert!(opts.capture);
    }
}
