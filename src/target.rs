//! Event target abstraction and an in-memory dispatcher
//!
//! The recorder never talks to a concrete DOM. It attaches listeners through
//! [`EventTarget`], which a browser binding, a terminal host, or a test can
//! implement. [`EventHub`] is the in-memory implementation used by the probe
//! binary and the test suite.

use crate::event::{EventKind, InteractionEvent, ListenerOptions};
use log::{error, trace};
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Callback invoked for each dispatched event
pub type Listener = Rc<dyn Fn(&InteractionEvent)>;

/// Identity of a registered listener, used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

impl ListenerId {
    /// Allocate a process-unique listener id
    pub fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Something listeners can be attached to
///
/// Receivers are `&self` because DOM targets are shared and mutated through
/// interior mutability; a listener may add or remove listeners while it is
/// being dispatched.
pub trait EventTarget {
    /// Attach `listener` for `kind`. Re-adding the same id, kind and capture
    /// flag is a no-op.
    fn add_event_listener(
        &self,
        kind: EventKind,
        id: ListenerId,
        listener: Listener,
        options: ListenerOptions,
    );

    /// Detach the listener previously added with the same id, kind and
    /// capture flag. Unknown listeners are ignored.
    fn remove_event_listener(&self, kind: EventKind, id: ListenerId, options: ListenerOptions);
}

struct Registration {
    kind: EventKind,
    id: ListenerId,
    options: ListenerOptions,
    listener: Listener,
}

impl Registration {
    fn matches(&self, kind: EventKind, id: ListenerId, capture: bool) -> bool {
        self.kind == kind && self.id == id && self.options.capture == capture
    }
}

/// In-memory event target with DOM-like dispatch rules
#[derive(Default)]
pub struct EventHub {
    registrations: RefCell<Vec<Registration>>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch an event to every listener attached for its kind.
    ///
    /// Capture-phase listeners run before bubble-phase ones, each group in
    /// registration order. The listener list is snapshotted up front: a
    /// listener added during dispatch is not invoked for this event, and one
    /// removed during dispatch is skipped. A panicking listener is logged
    /// and does not stop the rest.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &InteractionEvent) -> usize {
        let snapshot: Vec<(ListenerId, bool, Listener)> = {
            let registrations = self.registrations.borrow();
            let capture = registrations
                .iter()
                .filter(|r| r.kind == event.kind && r.options.capture);
            let bubble = registrations
                .iter()
                .filter(|r| r.kind == event.kind && !r.options.capture);
            capture
                .chain(bubble)
                .map(|r| (r.id, r.options.capture, Rc::clone(&r.listener)))
                .collect()
        };

        let mut invoked = 0;
        for (id, capture, listener) in snapshot {
            if !self.is_registered(event.kind, id, capture) {
                continue;
            }
            invoked += 1;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(event)));
            if outcome.is_err() {
                error!("listener {:?} panicked while handling {}", id, event.kind);
            }
        }
        trace!("dispatched {} to {} listener(s)", event.kind, invoked);
        invoked
    }

    /// Total number of attached listeners
    pub fn listener_count(&self) -> usize {
        self.registrations.borrow().len()
    }

    /// Number of listeners attached for `kind`
    pub fn listeners_for(&self, kind: EventKind) -> usize {
        self.registrations
            .borrow()
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    /// Whether any listener is attached for `kind`
    pub fn has_listener(&self, kind: EventKind) -> bool {
        self.listeners_for(kind) > 0
    }

    fn is_registered(&self, kind: EventKind, id: ListenerId, capture: bool) -> bool {
        self.registrations
            .borrow()
            .iter()
            .any(|r| r.matches(kind, id, capture))
    }
}

impl EventTarget for EventHub {
    fn add_event_listener(
        &self,
        kind: EventKind,
        id: ListenerId,
        listener: Listener,
        options: ListenerOptions,
    ) {
        if self.is_registered(kind, id, options.capture) {
            return;
        }
        self.registrations.borrow_mut().push(Registration {
            kind,
            id,
            options,
            listener,
        });
    }

    fn remove_event_listener(&self, kind: EventKind, id: ListenerId, options: ListenerOptions) {
        self.registrations
            .borrow_mut()
            .retain(|r| !r.matches(kind, id, options.capture));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter(hits: &Rc<Cell<u32>>) -> Listener {
        let hits = Rc::clone(hits);
        Rc::new(move |_| hits.set(hits.get() + 1))
    }

    fn keydown() -> InteractionEvent {
        InteractionEvent::new(EventKind::KeyDown, true, 1.0)
    }

    #[test]
    fn listener_ids_are_unique() {
        assert_ne!(ListenerId::next(), ListenerId::next());
    }

    #[test]
    fn dispatch_reaches_matching_kind_only() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        hub.add_event_listener(
            EventKind::KeyDown,
            ListenerId::next(),
            counter(&hits),
            ListenerOptions::default(),
        );

        assert_eq!(hub.dispatch(&keydown()), 1);
        assert_eq!(
            hub.dispatch(&InteractionEvent::new(EventKind::Click, true, 1.0)),
            0
        );
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn duplicate_add_is_ignored() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        let id = ListenerId::next();
        let opts = ListenerOptions::default();
        hub.add_event_listener(EventKind::KeyDown, id, counter(&hits), opts);
        hub.add_event_listener(EventKind::KeyDown, id, counter(&hits), opts);

        assert_eq!(hub.listener_count(), 1);
        hub.dispatch(&keydown());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn remove_requires_matching_capture_flag() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        let id = ListenerId::next();
        hub.add_event_listener(EventKind::KeyDown, id, counter(&hits), ListenerOptions::default());

        let bubble = ListenerOptions {
            passive: true,
            capture: false,
        };
        hub.remove_event_listener(EventKind::KeyDown, id, bubble);
        assert!(hub.has_listener(EventKind::KeyDown));

        hub.remove_event_listener(EventKind::KeyDown, id, ListenerOptions::default());
        assert!(!hub.has_listener(EventKind::KeyDown));
    }

    #[test]
    fn capture_listeners_run_first() {
        let hub = EventHub::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let bubble_order = Rc::clone(&order);
        hub.add_event_listener(
            EventKind::KeyDown,
            ListenerId::next(),
            Rc::new(move |_| bubble_order.borrow_mut().push("bubble")),
            ListenerOptions {
                passive: true,
                capture: false,
            },
        );
        let capture_order = Rc::clone(&order);
        hub.add_event_listener(
            EventKind::KeyDown,
            ListenerId::next(),
            Rc::new(move |_| capture_order.borrow_mut().push("capture")),
            ListenerOptions::default(),
        );

        hub.dispatch(&keydown());
        assert_eq!(*order.borrow(), vec!["capture", "bubble"]);
    }

    #[test]
    fn listener_removed_mid_dispatch_is_skipped() {
        let hub = Rc::new(EventHub::new());
        let hits = Rc::new(Cell::new(0));
        let second = ListenerId::next();

        let remover_hub = Rc::clone(&hub);
        hub.add_event_listener(
            EventKind::KeyDown,
            ListenerId::next(),
            Rc::new(move |_| {
                remover_hub.remove_event_listener(
                    EventKind::KeyDown,
                    second,
                    ListenerOptions::default(),
                )
            }),
            ListenerOptions::default(),
        );
        hub.add_event_listener(
            EventKind::KeyDown,
            second,
            counter(&hits),
            ListenerOptions::default(),
        );

        assert_eq!(hub.dispatch(&keydown()), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn panicking_listener_does_not_stop_others() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        hub.add_event_listener(
            EventKind::KeyDown,
            ListenerId::next(),
            Rc::new(|_| panic!("listener failure")),
            ListenerOptions::default(),
        );
        hub.add_event_listener(
            EventKind::KeyDown,
            ListenerId::next(),
            counter(&hits),
            ListenerOptions::default(),
        );

        assert_eq!(hub.dispatch(&keydown()), 2);
        assert_eq!(hits.get(), 1);
    }
}
