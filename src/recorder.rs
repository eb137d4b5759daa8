//! First input delay recording and observer notification
//!
//! [`InputDelayRecorder`] attaches its listeners on construction, computes
//! the delay of the first qualifying input, latches it once, detaches the
//! page-wide listeners and flushes every observer. Observers registered
//! after the latch are replayed immediately.

use crate::clock::{input_delay, Clock};
use crate::config::{Config, TimingConfig};
use crate::event::{EventKind, InteractionEvent};
use crate::pointer::{PointerDisambiguator, PointerKey, Resolution};
use crate::registry::ListenerRegistry;
use crate::target::{EventTarget, Listener};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

/// One-shot callback receiving `(delay, source_event)`
pub type Observer = Box<dyn FnOnce(f64, &InteractionEvent)>;

/// The latched first input. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstInputRecord {
    delay: f64,
    event: InteractionEvent,
}

impl FirstInputRecord {
    /// Delay in milliseconds
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// The event the delay was measured on
    pub fn event(&self) -> &InteractionEvent {
        &self.event
    }
}

struct State {
    record: Option<FirstInputRecord>,
    observers: Vec<Observer>,
    registry: Option<ListenerRegistry>,
    pointers: PointerDisambiguator,
    discarded: u32,
}

struct Inner {
    clock: Rc<dyn Clock>,
    timing: TimingConfig,
    started_at: f64,
    state: RefCell<State>,
}

impl Inner {
    fn lifetime_ms(&self) -> f64 {
        self.clock.epoch_now() - self.started_at
    }

    fn is_plausible(&self, delay: f64) -> bool {
        if delay.is_nan() || delay < 0.0 {
            return false;
        }
        !self.timing.validate_lifetime || delay < self.lifetime_ms()
    }
}

/// Records the first input delay for one page lifetime
#[derive(Clone)]
pub struct InputDelayRecorder {
    inner: Rc<Inner>,
}

impl InputDelayRecorder {
    /// Create a recorder with default configuration and start listening
    pub fn new(target: Rc<dyn EventTarget>, clock: Rc<dyn Clock>) -> Self {
        Self::with_config(target, clock, &Config::default())
    }

    /// Create a recorder and start listening on `target`
    pub fn with_config(target: Rc<dyn EventTarget>, clock: Rc<dyn Clock>, config: &Config) -> Self {
        let options = config.listener.options();
        let started_at = clock.epoch_now();
        let inner = Rc::new(Inner {
            clock,
            timing: config.timing,
            started_at,
            state: RefCell::new(State {
                record: None,
                observers: Vec::new(),
                registry: None,
                pointers: PointerDisambiguator::new(
                    Rc::clone(&target),
                    options,
                    config.pointer.key_by_pointer_id,
                ),
                discarded: 0,
            }),
        });

        let weak = Rc::downgrade(&inner);
        let listener: Listener = Rc::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                on_input(&inner, event);
            }
        });
        let registry = ListenerRegistry::attach(target, listener, options);
        inner.state.borrow_mut().registry = Some(registry);

        Self { inner }
    }

    /// Register a callback for the first input delay.
    ///
    /// Runs synchronously right away when the delay is already known,
    /// otherwise it is queued and runs once, in registration order, when the
    /// first valid input is latched.
    pub fn on_first_input_delay<F>(&self, observer: F)
    where
        F: FnOnce(f64, &InteractionEvent) + 'static,
    {
        let record = self.inner.state.borrow().record.clone();
        match record {
            Some(record) => notify(vec![Box::new(observer)], &record),
            None => self.inner.state.borrow_mut().observers.push(Box::new(observer)),
        }
    }

    /// The latched record, if the first input has happened
    pub fn first_input(&self) -> Option<FirstInputRecord> {
        self.inner.state.borrow().record.clone()
    }

    /// Whether the page-wide listeners are still attached
    pub fn is_listening(&self) -> bool {
        self.inner
            .state
            .borrow()
            .registry
            .as_ref()
            .is_some_and(ListenerRegistry::is_attached)
    }

    /// Observers waiting for the first input
    pub fn pending_observers(&self) -> usize {
        self.inner.state.borrow().observers.len()
    }

    /// Pointer sessions waiting for pointerup or pointercancel
    pub fn active_pointer_sessions(&self) -> usize {
        self.inner.state.borrow().pointers.active_sessions()
    }

    /// Delays rejected as implausible so far
    pub fn discarded(&self) -> u32 {
        self.inner.state.borrow().discarded
    }

    /// Wall-clock time the recorder was created, in epoch milliseconds
    pub fn started_at(&self) -> f64 {
        self.inner.started_at
    }

    /// Wall-clock milliseconds since the recorder was created
    pub fn lifetime_ms(&self) -> f64 {
        self.inner.lifetime_ms()
    }

    /// Clock the recorder measures against
    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.inner.clock)
    }

    /// Timestamp classification threshold in use
    pub fn epoch_threshold_ms(&self) -> f64 {
        self.inner.timing.epoch_threshold_ms
    }
}

impl fmt::Debug for InputDelayRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("InputDelayRecorder")
            .field("record", &state.record)
            .field("pending_observers", &state.observers.len())
            .field("pointer_sessions", &state.pointers.active_sessions())
            .field("started_at", &self.inner.started_at)
            .finish()
    }
}

fn on_input(inner: &Rc<Inner>, event: &InteractionEvent) {
    // Only cancelable events reflect input the user expects to matter.
    if !event.cancelable {
        debug!("ignoring non-cancelable {}", event.kind);
        return;
    }

    let delay = input_delay(
        event.time_stamp,
        inner.clock.as_ref(),
        inner.timing.epoch_threshold_ms,
    );

    if event.kind == EventKind::PointerDown {
        let weak = Rc::downgrade(inner);
        inner
            .state
            .borrow_mut()
            .pointers
            .begin(delay, event, |key, _| pointer_listener(&weak, key));
        return;
    }

    record_delay(inner, delay, event.clone());
}

fn pointer_listener(weak: &Weak<Inner>, key: PointerKey) -> Listener {
    let weak = Weak::clone(weak);
    Rc::new(move |event| {
        if let Some(inner) = weak.upgrade() {
            on_pointer_followup(&inner, key, event);
        }
    })
}

fn on_pointer_followup(inner: &Rc<Inner>, key: PointerKey, event: &InteractionEvent) {
    let resolution = inner.state.borrow_mut().pointers.resolve(key, event);
    match resolution {
        Some(Resolution::Input { delay, event }) => {
            record_delay(inner, delay, event);
        }
        Some(Resolution::Scroll) => debug!("pointer {:?} was a scroll, nothing recorded", key),
        None => {}
    }
}

/// Latch `delay` if nothing is latched yet and it is plausible.
fn record_delay(inner: &Rc<Inner>, delay: f64, event: InteractionEvent) -> bool {
    let (record, observers) = {
        let mut state = inner.state.borrow_mut();
        if state.record.is_some() {
            return false;
        }
        if !inner.is_plausible(delay) {
            state.discarded += 1;
            warn!(
                "discarding implausible {} delay of {}ms after {:.1}ms of recorder lifetime",
                event.kind,
                delay,
                inner.lifetime_ms()
            );
            return false;
        }

        let record = FirstInputRecord { delay, event };
        state.record = Some(record.clone());
        if let Some(registry) = state.registry.as_mut() {
            registry.teardown();
        }
        info!("first input {} latched with delay {:.3}ms", record.event.kind, delay);
        (record, std::mem::take(&mut state.observers))
    };

    notify(observers, &record);
    true
}

fn notify(observers: Vec<Observer>, record: &FirstInputRecord) {
    for observer in observers {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer(record.delay, &record.event)));
        if outcome.is_err() {
            error!("first input delay observer panicked");
        }
    }
}
