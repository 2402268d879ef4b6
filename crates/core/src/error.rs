//! Error type shared by the visualizer core.
//!
//! Errors are reserved for setup and I/O paths (configuration, layout parsing,
//! playback control, frame export). The per-frame update path never fails: bad
//! or missing data degrades to the neutral grey fallback instead.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, VizError>;

/// Errors raised by the visualizer core
#[derive(Debug)]
pub enum VizError {
    /// A configuration field failed validation.
    InvalidConfig { field: &'static str, message: String },

    /// A sensor layout definition could not be parsed.
    InvalidLayout(String),

    /// Playback was started with an empty timeline.
    NoTimestamps,

    /// A frame did not match the dimensions the recorder was opened with.
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// The recorder was used after being released.
    RecorderClosed,

    /// Filesystem error while exporting frames.
    Io { path: PathBuf, source: io::Error },
}

impl VizError {
    /// Create error for an invalid configuration field.
    ///
    /// # Arguments
    /// * `field` - The name of the offending field (e.g., `"fps"`, `"geometry.padding"`)
    /// * `message` - A description of the validation error
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Create error for a non-finite or non-positive float field.
    pub fn non_positive(field: &'static str, value: f64) -> Self {
        Self::invalid_config(field, format!("must be finite and positive, got {value}"))
    }

    /// Wrap an I/O error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for VizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { field, message } => {
                write!(f, "Invalid configuration '{field}': {message}")
            }
            Self::InvalidLayout(message) => write!(f, "Invalid sensor layout: {message}"),
            Self::NoTimestamps => write!(f, "No timestamps to animate"),
            Self::FrameSizeMismatch { expected, actual } => write!(
                f,
                "Frame is {}x{} but recorder expects {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            Self::RecorderClosed => write!(f, "Recorder has already been released"),
            Self::Io { path, source } => write!(f, "I/O error at {}: {source}", path.display()),
        }
    }
}

impl std::error::Error for VizError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
