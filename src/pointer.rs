//! Pointer-down disambiguation
//!
//! A `pointerdown` may start a tap or a scroll/pinch gesture. Each one opens
//! a [`PointerSession`] that waits for the next `pointerup` (real input) or
//! `pointercancel` (scroll, pinch, zoom) on the same pointer.

use crate::event::{EventKind, InteractionEvent, ListenerOptions};
use crate::target::{EventTarget, Listener, ListenerId};
use log::debug;
use std::collections::HashMap;
use std::rc::Rc;

/// Key a session is stored under. `None` when sessions are not keyed by
/// pointer id or the event carries none.
pub type PointerKey = Option<i32>;

/// Lifecycle of a single pointer-down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for pointerup or pointercancel
    Start,
    /// Pointerup arrived: this was a tap
    ResolvedInput,
    /// Pointercancel arrived: this was a scroll or pinch
    ResolvedScroll,
}

/// Outcome handed back to the recorder when a session resolves
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Record `delay` with the original pointerdown as source
    Input { delay: f64, event: InteractionEvent },
    /// Nothing to record
    Scroll,
}

/// State kept between a pointerdown and its resolving event
#[derive(Debug, Clone)]
pub struct PointerSession {
    pub state: SessionState,
    /// Delay computed when the pointerdown was handled
    pub delay: f64,
    /// The pointerdown itself
    pub event: InteractionEvent,
    up_listener: ListenerId,
    cancel_listener: ListenerId,
}

impl PointerSession {
    fn resolve(&mut self, trigger: EventKind) -> Option<Resolution> {
        if self.state != SessionState::Start {
            return None;
        }
        match trigger {
            EventKind::PointerUp => {
                self.state = SessionState::ResolvedInput;
                Some(Resolution::Input {
                    delay: self.delay,
                    event: self.event.clone(),
                })
            }
            EventKind::PointerCancel => {
                self.state = SessionState::ResolvedScroll;
                Some(Resolution::Scroll)
            }
            _ => None,
        }
    }
}

/// Tracks open pointer sessions and their session-scoped listeners
pub struct PointerDisambiguator {
    target: Rc<dyn EventTarget>,
    options: ListenerOptions,
    key_by_pointer_id: bool,
    sessions: HashMap<PointerKey, PointerSession>,
}

impl PointerDisambiguator {
    pub fn new(target: Rc<dyn EventTarget>, options: ListenerOptions, key_by_pointer_id: bool) -> Self {
        Self {
            target,
            options,
            key_by_pointer_id,
            sessions: HashMap::new(),
        }
    }

    /// Session key for an event under the current keying mode
    pub fn key_for(&self, event: &InteractionEvent) -> PointerKey {
        if self.key_by_pointer_id {
            event.pointer_id
        } else {
            None
        }
    }

    /// Open a session for `event`, attaching the listeners built by
    /// `make_listener` for pointerup and pointercancel.
    ///
    /// An unresolved session on the same key is replaced.
    pub fn begin<F>(&mut self, delay: f64, event: &InteractionEvent, make_listener: F) -> PointerKey
    where
        F: Fn(PointerKey, EventKind) -> Listener,
    {
        let key = self.key_for(event);
        if let Some(stale) = self.sessions.remove(&key) {
            debug!("pointer {:?}: replacing unresolved session", key);
            self.detach(&stale);
        }

        let up_listener = ListenerId::next();
        let cancel_listener = ListenerId::next();
        self.target.add_event_listener(
            EventKind::PointerUp,
            up_listener,
            make_listener(key, EventKind::PointerUp),
            self.options,
        );
        self.target.add_event_listener(
            EventKind::PointerCancel,
            cancel_listener,
            make_listener(key, EventKind::PointerCancel),
            self.options,
        );

        self.sessions.insert(
            key,
            PointerSession {
                state: SessionState::Start,
                delay,
                event: event.clone(),
                up_listener,
                cancel_listener,
            },
        );
        debug!("pointer {:?}: session started, candidate delay {:.3}ms", key, delay);
        key
    }

    /// Feed a pointerup or pointercancel to the session on `key`.
    ///
    /// Events from another pointer are ignored. A resolved session has its
    /// listeners removed and is dropped.
    pub fn resolve(&mut self, key: PointerKey, event: &InteractionEvent) -> Option<Resolution> {
        if self.key_for(event) != key {
            return None;
        }
        let session = self.sessions.get_mut(&key)?;
        let resolution = session.resolve(event.kind)?;
        debug!("pointer {:?}: resolved as {:?}", key, session.state);
        if let Some(session) = self.sessions.remove(&key) {
            self.detach(&session);
        }
        Some(resolution)
    }

    /// State of the open session on `key`, if any
    pub fn state(&self, key: PointerKey) -> Option<SessionState> {
        self.sessions.get(&key).map(|s| s.state)
    }

    /// Number of sessions still waiting for resolution
    pub fn active_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn detach(&self, session: &PointerSession) {
        self.target
            .remove_event_listener(EventKind::PointerUp, session.up_listener, self.options);
        self.target.remove_event_listener(
            EventKind::PointerCancel,
            session.cancel_listener,
            self.options,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::EventHub;

    fn noop(_: PointerKey, _: EventKind) -> Listener {
        Rc::new(|_| {})
    }

    fn down(pointer_id: i32) -> InteractionEvent {
        InteractionEvent::new(EventKind::PointerDown, true, 180.0).with_pointer_id(pointer_id)
    }

    fn follow(kind: EventKind, pointer_id: i32) -> InteractionEvent {
        InteractionEvent::new(kind, false, 190.0).with_pointer_id(pointer_id)
    }

    #[test]
    fn session_attaches_two_listeners() {
        let hub = Rc::new(EventHub::new());
        let mut pointers = PointerDisambiguator::new(hub.clone(), ListenerOptions::default(), true);

        let key = pointers.begin(20.0, &down(1), noop);

        assert_eq!(key, Some(1));
        assert_eq!(pointers.state(key), Some(SessionState::Start));
        assert_eq!(hub.listeners_for(EventKind::PointerUp), 1);
        assert_eq!(hub.listeners_for(EventKind::PointerCancel), 1);
    }

    #[test]
    fn pointerup_resolves_as_input() {
        let hub = Rc::new(EventHub::new());
        let mut pointers = PointerDisambiguator::new(hub.clone(), ListenerOptions::default(), true);
        let key = pointers.begin(20.0, &down(1), noop);

        let resolution = pointers.resolve(key, &follow(EventKind::PointerUp, 1));

        assert_eq!(
            resolution,
            Some(Resolution::Input {
                delay: 20.0,
                event: down(1)
            })
        );
        assert_eq!(pointers.active_sessions(), 0);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn pointercancel_resolves_as_scroll() {
        let hub = Rc::new(EventHub::new());
        let mut pointers = PointerDisambiguator::new(hub.clone(), ListenerOptions::default(), true);
        let key = pointers.begin(20.0, &down(1), noop);

        let resolution = pointers.resolve(key, &follow(EventKind::PointerCancel, 1));

        assert_eq!(resolution, Some(Resolution::Scroll));
        assert_eq!(hub.listener_count(), 0);
        assert_eq!(pointers.resolve(key, &follow(EventKind::PointerUp, 1)), None);
    }

    #[test]
    fn other_pointer_does_not_resolve_session() {
        let hub = Rc::new(EventHub::new());
        let mut pointers = PointerDisambiguator::new(hub.clone(), ListenerOptions::default(), true);
        let first = pointers.begin(20.0, &down(1), noop);
        let second = pointers.begin(30.0, &down(2), noop);

        assert_eq!(pointers.resolve(first, &follow(EventKind::PointerUp, 2)), None);
        assert_eq!(pointers.state(first), Some(SessionState::Start));
        assert!(pointers.resolve(second, &follow(EventKind::PointerUp, 2)).is_some());
        assert_eq!(pointers.active_sessions(), 1);
    }

    #[test]
    fn unkeyed_mode_shares_one_session() {
        let hub = Rc::new(EventHub::new());
        let mut pointers = PointerDisambiguator::new(hub.clone(), ListenerOptions::default(), false);
        let first = pointers.begin(20.0, &down(1), noop);
        let second = pointers.begin(30.0, &down(2), noop);

        assert_eq!(first, None);
        assert_eq!(second, None);
        assert_eq!(pointers.active_sessions(), 1);
        assert_eq!(hub.listener_count(), 2);

        let resolution = pointers.resolve(None, &follow(EventKind::PointerUp, 7));
        assert!(matches!(resolution, Some(Resolution::Input { delay, .. }) if delay == 30.0));
    }

    #[test]
    fn repeated_pointerdown_replaces_session_listeners() {
        let hub = Rc::new(EventHub::new());
        let mut pointers = PointerDisambiguator::new(hub.clone(), ListenerOptions::default(), true);
        pointers.begin(20.0, &down(1), noop);
        pointers.begin(25.0, &down(1), noop);

        assert_eq!(pointers.active_sessions(), 1);
        assert_eq!(hub.listeners_for(EventKind::PointerUp), 1);
    }
}
