//! Main trace parser for zsh xtrace logs.
//!
//! Decodes the raw log, extracts entries line by line and restores
//! chronological order. Several subshells can share one trace file
//! descriptor, so physical line order is not execution order.

use super::entry::{parse_log, ParsedEntry};
use crate::utils::error::ParseError;
use log::{debug, warn};
use std::borrow::Cow;
use std::path::Path;

/// Parsed trace data (internal representation)
#[derive(Debug, Clone)]
pub struct ParsedTrace {
    /// Entries sorted by timestamp
    pub entries: Vec<ParsedEntry>,

    /// Physical lines in the log
    pub total_lines: usize,

    /// Non-blank lines that held no recognisable entry
    pub skipped_lines: usize,
}

/// Parse a raw trace log
///
/// **Public** - main entry point for parsing
///
/// Invalid UTF-8 sequences are dropped. Traced commands can echo
/// arbitrary bytes, and the surrounding entries are still usable.
///
/// # Arguments
/// * `contents` - Raw bytes of the log file
///
/// # Returns
/// Entries in chronological order, ready for call tree reconstruction
pub fn parse_trace(contents: &[u8]) -> ParsedTrace {
    let (text, dropped) = decode_lossy(contents);
    if dropped > 0 {
        warn!("Dropped {} byte(s) of invalid UTF-8 from trace log", dropped);
    }
    parse_trace_text(&text)
}

/// Decode bytes as UTF-8, skipping invalid sequences
///
/// # Returns
/// The decoded text and the number of bytes dropped
pub fn decode_lossy(contents: &[u8]) -> (Cow<'_, str>, usize) {
    if let Ok(text) = std::str::from_utf8(contents) {
        return (Cow::Borrowed(text), 0);
    }

    let mut text = String::with_capacity(contents.len());
    let mut dropped = 0;
    for chunk in contents.utf8_chunks() {
        text.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    (Cow::Owned(text), dropped)
}

/// Parse a trace log that is already text
///
/// Never fails: unrecognised lines are skipped.
pub fn parse_trace_text(text: &str) -> ParsedTrace {
    let total_lines = text.lines().count();
    let (entries, skipped_lines) = parse_log(text);

    debug!(
        "Parsed {} entries from {} lines ({} skipped)",
        entries.len(),
        total_lines,
        skipped_lines
    );

    if entries.is_empty() && total_lines > 0 {
        warn!("No trace entries found; is this an xtrace log with the expected PS4?");
    }

    ParsedTrace {
        entries: reorder_entries(entries),
        total_lines,
        skipped_lines,
    }
}

/// Read and parse a trace log from disk
///
/// # Errors
/// * `ParseError::ReadFailed` - The file cannot be read
pub fn parse_trace_file(path: impl AsRef<Path>) -> Result<ParsedTrace, ParseError> {
    let path = path.as_ref();
    debug!("Reading trace log from: {}", path.display());

    let contents = std::fs::read(path)?;
    Ok(parse_trace(&contents))
}

/// Sort entries by timestamp, keeping file order for equal timestamps
///
/// **Public** - exposed for testing
pub fn reorder_entries(mut entries: Vec<ParsedEntry>) -> Vec<ParsedEntry> {
    // slice::sort_by is stable
    entries.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
    entries
}
