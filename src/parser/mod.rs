//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Extracting entries from raw xtrace lines
//! - Restoring chronological order
//! - Defining the speedscope output schema

pub mod entry;
pub mod schema;
pub mod zsh_trace;

// Re-export main types
pub use entry::{parse_line, parse_log, LinePattern, ParsedEntry};
pub use schema::{
    EventType, EventedProfile, ExecutedCode, Frame, FrameEvent, ProfileType, SpeedscopeFile,
    ValueUnit,
};
pub use zsh_trace::{
    decode_lossy, parse_trace, parse_trace_file, parse_trace_text, reorder_entries, ParsedTrace,
};
