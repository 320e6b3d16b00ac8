//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading a trace log
///
/// Lines that do not look like trace entries are never errors; they are
/// skipped by the entry parser.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read trace log: {0}")]
    ReadFailed(#[from] std::io::Error),
}

/// Errors raised while replaying frame events into a profile
#[derive(Error, Debug, PartialEq)]
pub enum ProfileError {
    #[error("Event references unknown frame {frame} (frame table has {frame_count} entries)")]
    UnknownFrame { frame: usize, frame_count: usize },

    #[error("Event at {at} is earlier than the previous event at {previous}")]
    NonMonotonic { at: f64, previous: f64 },

    #[error("Close of frame {frame} at {at} with no open frame")]
    UnexpectedClose { frame: usize, at: f64 },

    #[error("Close of frame {frame} at {at} does not match innermost open frame {open}")]
    MismatchedClose { frame: usize, open: usize, at: f64 },

    #[error("{0} frame(s) still open when the profile was built")]
    UnclosedFrames(usize),
}

/// Errors that can occur during the whole import pipeline
///
/// Decoding and line parsing never fail; only replaying the reconstructed
/// events can.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to build call tree profile: {0}")]
    Profile(#[from] ProfileError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
