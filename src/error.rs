//! Error types for the fallible library surfaces
//!
//! Recording itself never fails loudly; these cover configuration, report
//! export and the public namespace.

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FidError {
    /// `perf_metrics` has no recorder installed on this thread
    #[error("no first input delay recorder is installed")]
    NotInstalled,
    /// A report was requested before any input was recorded
    #[error("first input has not been recorded yet")]
    NotRecorded,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            FidError::NotInstalled.to_string(),
            "no first input delay recorder is installed"
        );
        let err: FidError = ConfigError::NoConfigDir.into();
        assert_eq!(err.to_string(), "Could not determine config directory");
    }
}
