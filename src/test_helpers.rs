//! Shared test utilities
//!
//! Provides a recorder wired to an [`EventHub`] and a [`ManualClock`], plus
//! builders for the events tests dispatch.

use crate::clock::ManualClock;
use crate::config::Config;
use crate::event::{EventKind, InteractionEvent};
use crate::recorder::InputDelayRecorder;
use crate::target::EventHub;
use std::rc::Rc;

/// Wall-clock time the fixture recorder is created at
pub const EPOCH_BASE_MS: f64 = 1_700_000_000_000.0;

/// Recorder lifetime the fixture starts with, in milliseconds
pub const DEFAULT_LIFETIME_MS: f64 = 10_000.0;

/// A recorder listening on an in-memory hub with a manual clock
pub struct Fixture {
    pub hub: Rc<EventHub>,
    pub clock: Rc<ManualClock>,
    pub recorder: InputDelayRecorder,
}

/// Fixture with default configuration.
///
/// The recorder is created at monotonic 0 / [`EPOCH_BASE_MS`], then both
/// clocks are advanced by [`DEFAULT_LIFETIME_MS`] so ordinary delays pass
/// lifetime validation.
pub fn fixture() -> Fixture {
    fixture_with_config(&Config::default())
}

/// Fixture with an explicit configuration
pub fn fixture_with_config(config: &Config) -> Fixture {
    let hub = Rc::new(EventHub::new());
    let clock = Rc::new(ManualClock::new(0.0, EPOCH_BASE_MS));
    let recorder = InputDelayRecorder::with_config(hub.clone(), clock.clone(), config);
    clock.advance(DEFAULT_LIFETIME_MS);
    Fixture {
        hub,
        clock,
        recorder,
    }
}

/// Cancelable event of `kind` at `time_stamp`
pub fn event(kind: EventKind, time_stamp: f64) -> InteractionEvent {
    InteractionEvent::new(kind, true, time_stamp)
}

/// Cancelable keydown at `time_stamp`
pub fn keydown(time_stamp: f64) -> InteractionEvent {
    event(EventKind::KeyDown, time_stamp)
}

/// Cancelable click at `time_stamp`
pub fn click(time_stamp: f64) -> InteractionEvent {
    event(EventKind::Click, time_stamp)
}

/// Pointer event of `kind` for `pointer_id`
pub fn pointer(kind: EventKind, time_stamp: f64, pointer_id: i32) -> InteractionEvent {
    event(kind, time_stamp).with_pointer_id(pointer_id)
}
