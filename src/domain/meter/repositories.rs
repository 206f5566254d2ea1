use super::value_objects::{Frame, Reading};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeterError {
    #[error("Failed to read frame {path}: {source}")]
    FrameRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid frame {path}: {reason}")]
    InvalidFrame { path: PathBuf, reason: String },

    #[error("Invalid frame pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("No frames matched {0:?}")]
    NoFrames(Vec<String>),

    #[error("Reading log error: {0}")]
    LogFailed(#[from] std::io::Error),
}

/// Source of grayscale frames stored on disk.
pub trait FrameLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Frame, MeterError>;
}

/// Sink for decoded readings.
pub trait ReadingLog: Send {
    fn append(&mut self, at: NaiveDateTime, reading: &Reading) -> Result<(), MeterError>;
    fn path(&self) -> &Path;
}
