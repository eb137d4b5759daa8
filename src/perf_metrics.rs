//! The `perfMetrics` namespace
//!
//! This is the one deliberate global: a per-thread namespace other
//! instrumentation may share. It is created only if absent and never
//! replaced, so values stored by someone else survive installation.
//!
//! ```
//! use first_input_delay::{perf_metrics, EventHub};
//! use std::rc::Rc;
//!
//! let hub = Rc::new(EventHub::new());
//! perf_metrics::init(hub);
//! perf_metrics::on_first_input_delay(|delay, event| {
//!     println!("{} took {:.1}ms to start processing", event.kind, delay);
//! })
//! .expect("recorder installed");
//! ```

use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::{FidError, Result};
use crate::event::InteractionEvent;
use crate::recorder::InputDelayRecorder;
use crate::target::EventTarget;
use log::{debug, warn};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

thread_local! {
    static PERF_METRICS: RefCell<Option<PerfMetrics>> = const { RefCell::new(None) };
}

/// Contents of the namespace
#[derive(Debug, Default)]
pub struct PerfMetrics {
    first_input_delay: Option<InputDelayRecorder>,
    values: BTreeMap<String, Value>,
}

fn with_namespace<R>(f: impl FnOnce(&mut PerfMetrics) -> R) -> R {
    PERF_METRICS.with(|slot| {
        let mut slot = slot.borrow_mut();
        f(slot.get_or_insert_with(PerfMetrics::default))
    })
}

/// Create the namespace if it does not exist yet.
///
/// Returns whether this call created it.
pub fn ensure() -> bool {
    PERF_METRICS.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return false;
        }
        *slot = Some(PerfMetrics::default());
        true
    })
}

/// Whether the namespace exists on this thread
pub fn is_present() -> bool {
    PERF_METRICS.with(|slot| slot.borrow().is_some())
}

/// Expose `recorder` as the namespace's first input delay entry point
pub fn install(recorder: &InputDelayRecorder) {
    with_namespace(|ns| {
        if ns.first_input_delay.is_some() {
            debug!("replacing installed first input delay recorder");
        }
        ns.first_input_delay = Some(recorder.clone());
    });
}

/// Build a recorder on `target` with the system clock and the on-disk
/// configuration, then install it.
pub fn init(target: Rc<dyn EventTarget>) -> InputDelayRecorder {
    let config = Config::load().unwrap_or_else(|e| {
        warn!("using default configuration: {}", e);
        Config::default()
    });
    init_with_config(target, &config)
}

/// Like [`init`] with an explicit configuration
pub fn init_with_config(target: Rc<dyn EventTarget>, config: &Config) -> InputDelayRecorder {
    let recorder = InputDelayRecorder::with_config(target, Rc::new(SystemClock::new()), config);
    install(&recorder);
    recorder
}

/// The installed recorder, if any
pub fn recorder() -> Option<InputDelayRecorder> {
    PERF_METRICS.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|ns| ns.first_input_delay.clone())
    })
}

/// Register a callback for the first input delay on the installed recorder
pub fn on_first_input_delay<F>(observer: F) -> Result<()>
where
    F: FnOnce(f64, &InteractionEvent) + 'static,
{
    // Released before the callback runs so observers may use the namespace.
    let recorder = recorder().ok_or(FidError::NotInstalled)?;
    recorder.on_first_input_delay(observer);
    Ok(())
}

/// Store a value owned by other instrumentation
pub fn set_value(name: impl Into<String>, value: Value) {
    with_namespace(|ns| {
        ns.values.insert(name.into(), value);
    });
}

/// Read a value stored with [`set_value`]
pub fn value(name: &str) -> Option<Value> {
    PERF_METRICS.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|ns| ns.values.get(name).cloned())
    })
}
