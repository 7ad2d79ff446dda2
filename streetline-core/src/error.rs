//! Error types.
//!
//! The simulation itself cannot fail: out-of-range values are clamped.
//! Only loading a configuration can go wrong.

use std::path::PathBuf;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `GameConfig`
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for an `Invalid` error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Recording errors (serialised input streams).
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    /// Encoding or decoding failed
    #[error("recording codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Per-frame timing and input streams disagree
    #[error("recording is corrupt: {0}")]
    Corrupt(String),
}
