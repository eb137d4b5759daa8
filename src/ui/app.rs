//! Probe application state and logic

use super::input::translate;
use super::widgets::ResultLine;
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::event::{EventKind, InteractionEvent};
use crate::perf_metrics;
use crate::recorder::InputDelayRecorder;
use crate::report::{FirstInputReport, Rating};
use crate::target::EventHub;
use crossterm::event::Event;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

/// Number of dispatched events kept for display
const LOG_CAPACITY: usize = 256;

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Waiting,
    Recorded,
    Quitting,
}

impl AppState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Waiting => "WAITING FOR INPUT",
            Self::Recorded => "RECORDED",
            Self::Quitting => "QUITTING",
        }
    }
}

/// A dispatched event and how many listeners observed it
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub kind: EventKind,
    pub cancelable: bool,
    pub time_stamp: f64,
    pub pointer_id: Option<i32>,
    pub listeners: usize,
}

/// Main application
pub struct App {
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// Target terminal input is dispatched on
    pub hub: Rc<EventHub>,
    /// Recorder listening on `hub`
    pub recorder: InputDelayRecorder,
    /// Clock used to stamp terminal input
    clock: Rc<dyn Clock>,
    /// Dispatched events, oldest first
    log: VecDeque<LogEntry>,
    /// Status set by the first input observer
    notified: Rc<RefCell<Option<String>>>,
    /// Application start time
    pub start_time: Instant,
    /// Total events dispatched
    pub total_events: u64,
    /// Status message
    status_message: Option<String>,
}

impl App {
    /// Create the app with a system clock and install its recorder on the
    /// `perf_metrics` namespace
    pub fn new(config: Config) -> Self {
        let hub = Rc::new(EventHub::new());
        let recorder = perf_metrics::init_with_config(hub.clone(), &config);
        Self::with_recorder(config, hub, recorder)
    }

    /// Create the app around an existing recorder listening on `hub`
    pub fn with_recorder(config: Config, hub: Rc<EventHub>, recorder: InputDelayRecorder) -> Self {
        let notified = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&notified);
        recorder.on_first_input_delay(move |delay, event| {
            *sink.borrow_mut() = Some(format!("First input: {} after {:.2} ms", event.kind, delay));
        });

        Self {
            state: AppState::Waiting,
            config,
            clock: recorder.clock(),
            hub,
            recorder,
            log: VecDeque::with_capacity(LOG_CAPACITY),
            notified,
            start_time: Instant::now(),
            total_events: 0,
            status_message: None,
        }
    }

    /// Current monotonic time on the recorder's clock
    pub fn now(&self) -> f64 {
        self.clock.monotonic_now()
    }

    /// Translate and dispatch a terminal event stamped at `time_stamp`
    pub fn handle_terminal_event(&mut self, event: &Event, time_stamp: f64) {
        for interaction in translate(event, time_stamp) {
            self.dispatch(&interaction);
        }
    }

    /// Dispatch an interaction event on the hub and log it
    pub fn dispatch(&mut self, event: &InteractionEvent) -> usize {
        let listeners = self.hub.dispatch(event);
        self.total_events += 1;

        if self.log.len() >= LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(LogEntry {
            kind: event.kind,
            cancelable: event.cancelable,
            time_stamp: event.time_stamp,
            pointer_id: event.pointer_id,
            listeners,
        });

        if let Some(message) = self.notified.borrow_mut().take() {
            self.status_message = Some(message);
        }
        if self.state == AppState::Waiting && self.recorder.first_input().is_some() {
            self.state = AppState::Recorded;
        }
        listeners
    }

    /// Dispatched events, oldest first
    pub fn log(&self) -> Vec<LogEntry> {
        self.log.iter().cloned().collect()
    }

    /// Lines for the results panel
    pub fn results(&self) -> Vec<ResultLine> {
        let mut results = Vec::new();

        match self.recorder.first_input() {
            Some(record) => {
                let rating = Rating::from_delay(record.delay());
                let delay = format!("{:.2} ms", record.delay());
                results.push(match rating {
                    Rating::Good => ResultLine::ok("First Input Delay", delay),
                    Rating::NeedsImprovement => ResultLine::warning("First Input Delay", delay),
                    Rating::Poor => ResultLine::error("First Input Delay", delay),
                });
                results.push(ResultLine::info("Rating", rating.label()));
                results.push(ResultLine::info("Event", record.event().kind.name()));
                results.push(ResultLine::info(
                    "Timestamp",
                    format!("{:.3} ms", record.event().time_stamp),
                ));
            }
            None => {
                results.push(ResultLine::warning("First Input Delay", "not recorded yet"));
            }
        }

        results.push(if self.recorder.is_listening() {
            ResultLine::warning("Page listeners", "attached")
        } else {
            ResultLine::ok("Page listeners", "detached")
        });
        results.push(ResultLine::info(
            "Pointer sessions",
            self.recorder.active_pointer_sessions().to_string(),
        ));
        let discarded = self.recorder.discarded();
        results.push(if discarded == 0 {
            ResultLine::info("Discarded delays", "0")
        } else {
            ResultLine::error("Discarded delays", discarded.to_string())
        });

        results
    }

    /// Export the first input report to JSON
    pub fn export_report(&mut self, path: &Path) -> Result<()> {
        let report = FirstInputReport::from_recorder(&self.recorder)?;
        report.export_json(path)?;
        self.status_message = Some(format!("Report exported to {}", path.display()));
        Ok(())
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Get formatted elapsed time
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    /// Get current status message
    pub fn get_status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

impl Default for App {
    fn default() -> Self {
        let hub = Rc::new(EventHub::new());
        let recorder = InputDelayRecorder::new(hub.clone(), Rc::new(SystemClock::new()));
        Self::with_recorder(Config::default(), hub, recorder)
    }
}
