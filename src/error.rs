//! Error types shared by every pipeline stage
//!
//! Each stage either fully succeeds or aborts with one of these variants.
//! Stages are idempotent, so the remedy for any failure is to fix the cause
//! and rerun the stage.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while generating, analyzing, or reporting
#[derive(Error, Debug)]
pub enum AnovaError {
    #[error("File I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("Invalid distribution parameter for {algorithm}: {reason}")]
    InvalidDistributionParameter { algorithm: String, reason: String },

    #[error("Unknown algorithm label: {0:?} (expected PID, LQR or MPC)")]
    UnknownAlgorithm(String),

    #[error("Invalid control error value {value} for {algorithm} (must be finite)")]
    InvalidControlError { algorithm: String, value: f64 },

    #[error("Invalid significance level {0} (must be in (0, 1))")]
    InvalidAlpha(f64),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Plot rendering failed: {0}")]
    Plot(String),
}

impl AnovaError {
    /// Wrap an I/O error with the path it occurred on
    pub fn file_io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileIo {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, AnovaError>;
