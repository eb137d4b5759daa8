//! Clock sources and timestamp normalization
//!
//! Event timestamps arrive from two clock families: a monotonic
//! high-resolution clock whose origin is page start, and wall-clock epoch
//! milliseconds. Any plausible epoch timestamp is above 10^12, so anything
//! larger than [`EPOCH_THRESHOLD_MS`] is compared against the wall clock.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::time::Instant;

/// Timestamps above this value are treated as epoch milliseconds
pub const EPOCH_THRESHOLD_MS: f64 = 1e12;

/// Source of "now" for both clock families, in milliseconds
pub trait Clock {
    /// Milliseconds since an arbitrary page-local origin
    fn monotonic_now(&self) -> f64;

    /// Milliseconds since the Unix epoch
    fn epoch_now(&self) -> f64;
}

/// Which clock family a timestamp belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampOrigin {
    Monotonic,
    Epoch,
}

impl TimestampOrigin {
    /// Classify a timestamp against `threshold_ms`
    pub fn classify(time_stamp: f64, threshold_ms: f64) -> Self {
        if time_stamp > threshold_ms {
            Self::Epoch
        } else {
            Self::Monotonic
        }
    }

    /// Read "now" from the matching clock
    pub fn now(&self, clock: &dyn Clock) -> f64 {
        match self {
            Self::Monotonic => clock.monotonic_now(),
            Self::Epoch => clock.epoch_now(),
        }
    }
}

/// Delay between `time_stamp` and now on the matching clock, floored at zero.
///
/// NaN timestamps yield NaN so validation can reject them.
pub fn input_delay(time_stamp: f64, clock: &dyn Clock, threshold_ms: f64) -> f64 {
    let now = TimestampOrigin::classify(time_stamp, threshold_ms).now(clock);
    let delay = now - time_stamp;
    if delay < 0.0 {
        0.0
    } else {
        delay
    }
}

/// Process clock: `Instant` for the monotonic family, `chrono` for epoch
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose monotonic origin is the moment of creation
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Clock with an explicit monotonic origin
    pub fn with_origin(origin: Instant) -> Self {
        Self { origin }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic_now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn epoch_now(&self) -> f64 {
        chrono::Utc::now().timestamp_micros() as f64 / 1000.0
    }
}

/// Manually driven clock for tests and deterministic embeddings
#[derive(Debug, Default)]
pub struct ManualClock {
    monotonic: Cell<f64>,
    epoch: Cell<f64>,
}

impl ManualClock {
    pub fn new(monotonic_ms: f64, epoch_ms: f64) -> Self {
        Self {
            monotonic: Cell::new(monotonic_ms),
            epoch: Cell::new(epoch_ms),
        }
    }

    pub fn set_monotonic(&self, ms: f64) {
        self.monotonic.set(ms);
    }

    pub fn set_epoch(&self, ms: f64) {
        self.epoch.set(ms);
    }

    /// Move both clocks forward by `ms`
    pub fn advance(&self, ms: f64) {
        self.monotonic.set(self.monotonic.get() + ms);
        self.epoch.set(self.epoch.get() + ms);
    }
}

impl Clock for ManualClock {
    fn monotonic_now(&self) -> f64 {
        self.monotonic.get()
    }

    fn epoch_now(&self) -> f64 {
        self.epoch.get()
    }
}
