//! First input report and export functionality

use crate::clock::TimestampOrigin;
use crate::error::{FidError, Result};
use crate::event::EventKind;
use crate::recorder::{FirstInputRecord, InputDelayRecorder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Complete first input report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstInputReport {
    /// Report metadata
    pub metadata: ReportMetadata,
    /// The measured input
    pub first_input: FirstInputEntry,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Report generation timestamp
    pub generated_at: String,
    /// Library version
    pub version: String,
    /// Recorder lifetime in milliseconds when the report was built
    pub recorder_lifetime_ms: f64,
}

/// The latched input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstInputEntry {
    /// First input delay in milliseconds
    pub delay_ms: f64,
    /// Event type that produced the delay
    pub event_type: EventKind,
    /// Raw event timestamp
    pub time_stamp: f64,
    /// Clock family the timestamp was compared against
    pub time_stamp_origin: TimestampOrigin,
    /// Pointer that produced the input, for pointer events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer_id: Option<i32>,
    /// Delay rating
    pub rating: Rating,
}

/// Core Web Vitals buckets for first input delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    /// Bucket a delay: good up to 100ms, poor above 300ms
    pub fn from_delay(delay_ms: f64) -> Self {
        if delay_ms <= 100.0 {
            Self::Good
        } else if delay_ms <= 300.0 {
            Self::NeedsImprovement
        } else {
            Self::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good (<=100ms)",
            Self::NeedsImprovement => "Needs improvement (<=300ms)",
            Self::Poor => "Poor (>300ms)",
        }
    }
}

impl FirstInputReport {
    /// Build a report from a record
    pub fn new(record: &FirstInputRecord, epoch_threshold_ms: f64, recorder_lifetime_ms: f64) -> Self {
        let now: DateTime<Utc> = Utc::now();
        let event = record.event();

        Self {
            metadata: ReportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                recorder_lifetime_ms,
            },
            first_input: FirstInputEntry {
                delay_ms: record.delay(),
                event_type: event.kind,
                time_stamp: event.time_stamp,
                time_stamp_origin: TimestampOrigin::classify(event.time_stamp, epoch_threshold_ms),
                pointer_id: event.pointer_id,
                rating: Rating::from_delay(record.delay()),
            },
        }
    }

    /// Build a report from a recorder's latched input
    pub fn from_recorder(recorder: &InputDelayRecorder) -> Result<Self> {
        let record = recorder.first_input().ok_or(FidError::NotRecorded)?;
        Ok(Self::new(
            &record,
            recorder.epoch_threshold_ms(),
            recorder.lifetime_ms(),
        ))
    }

    /// Export report to JSON file
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export report to JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
