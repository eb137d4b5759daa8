//! First Input Delay - passive first input delay recorder
//!
//! Measures the time between the operating system receiving a user's first
//! discrete interaction (click, key press, touch, pointer down) and the
//! page's event handling starting to run. The result is latched once and
//! delivered to every observer, including ones registered afterwards.

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod perf_metrics;
pub mod pointer;
pub mod recorder;
pub mod registry;
pub mod report;
pub mod target;
pub mod test_helpers;
pub mod ui;

pub use clock::{Clock, ManualClock, SystemClock, TimestampOrigin};
pub use config::Config;
pub use error::FidError;
pub use event::{EventKind, InteractionEvent, ListenerOptions};
pub use recorder::{FirstInputRecord, InputDelayRecorder};
pub use report::FirstInputReport;
pub use target::{EventHub, EventTarget};
