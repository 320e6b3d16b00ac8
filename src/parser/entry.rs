//! Line-level parsing of zsh xtrace output.
//!
//! The shell hook sets PS4 so that every traced statement is printed as:
//!
//! ```text
//! +0mZ|<level>|<timestamp>|<name>|<file>|<line>> <code>
//! ```
//!
//! Buffered writes from several subshells can glue multiple statements onto
//! one physical line, so each line is first split at trace markers. Only if
//! that yields nothing is the whole line tried as a single entry.

use crate::utils::config::TRACE_MARKER;
use log::debug;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// One complete entry. The multi-entry strategy applies it to each
/// marker-delimited segment, the single-entry strategy to the whole line.
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\+0mZ\|(?P<level>\d+)\|(?P<timestamp>[\d.]+)\|(?P<name>[^|]+)\|(?P<file>[^|]+)\|(?P<line>\d+)>\s(?P<code>.*)$",
    )
    .expect("entry pattern is a valid regex")
});

/// A single traced statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntry {
    /// Nesting depth as reported by the tracer (`%e`)
    pub level: u32,

    /// Seconds since the epoch, sub-millisecond precision
    pub timestamp: f64,

    /// Function or script executing the statement
    pub name: String,

    /// Source file path
    pub file: String,

    /// Source line of the statement
    pub line_number: u32,

    /// The statement text itself
    pub code: String,
}

/// Strategy used to pull entries out of a physical line
///
/// Strategies are tried in declaration order; the first one that yields at
/// least one entry wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePattern {
    /// Any number of marker-delimited entries on one line
    MultiEntry,
    /// The whole trimmed line is one entry
    SingleEntry,
}

impl LinePattern {
    pub const PRECEDENCE: [LinePattern; 2] = [LinePattern::MultiEntry, LinePattern::SingleEntry];

    /// Apply this strategy to an already trimmed line
    pub fn extract(self, line: &str) -> Vec<ParsedEntry> {
        match self {
            LinePattern::MultiEntry => split_segments(line)
                .into_iter()
                .filter_map(|segment| ENTRY_PATTERN.captures(segment))
                .filter_map(|caps| entry_from_captures(&caps))
                .collect(),
            LinePattern::SingleEntry => ENTRY_PATTERN
                .captures(line)
                .and_then(|caps| entry_from_captures(&caps))
                .into_iter()
                .collect(),
        }
    }
}

/// Parse one physical line into zero or more entries
///
/// **Public** - used by the trace parser and tests
pub fn parse_line(line: &str) -> Vec<ParsedEntry> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }

    for pattern in LinePattern::PRECEDENCE {
        let entries = pattern.extract(line);
        if !entries.is_empty() {
            return entries;
        }
    }

    Vec::new()
}

/// Parse a whole log, returning entries in file order and the number of
/// non-blank lines that produced nothing
///
/// **Public** - main entry point for line parsing
pub fn parse_log(text: &str) -> (Vec<ParsedEntry>, usize) {
    let mut entries = Vec::new();
    let mut skipped = 0;

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let parsed = parse_line(line);
        if parsed.is_empty() {
            debug!("Skipping unrecognised line {}", index + 1);
            skipped += 1;
        }
        entries.extend(parsed);
    }

    (entries, skipped)
}

/// Split a line at every trace marker that starts a new segment
///
/// A marker followed by `%` (or by nothing) is literal text in the previous
/// segment. Anything before the first marker is dropped.
fn split_segments(line: &str) -> Vec<&str> {
    let starts: Vec<usize> = line
        .match_indices(TRACE_MARKER)
        .map(|(pos, _)| pos)
        .filter(|&pos| {
            line[pos + TRACE_MARKER.len()..]
                .chars()
                .next()
                .is_some_and(|c| c != '%')
        })
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(line.len());
            &line[start..end]
        })
        .collect()
}

fn entry_from_captures(caps: &Captures<'_>) -> Option<ParsedEntry> {
    Some(ParsedEntry {
        level: caps.name("level")?.as_str().parse().ok()?,
        timestamp: caps.name("timestamp")?.as_str().parse().ok()?,
        name: caps.name("name")?.as_str().trim().to_string(),
        file: caps.name("file")?.as_str().trim().to_string(),
        line_number: caps.name("line")?.as_str().parse().ok()?,
        code: caps.name("code")?.as_str().trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_entry_line() {
        let entries = parse_line("+0mZ|1|100.0|funcA|a.sh|10> echo a");

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.level, 1);
        assert_eq!(entry.timestamp, 100.0);
        assert_eq!(entry.name, "funcA");
        assert_eq!(entry.file, "a.sh");
        assert_eq!(entry.line_number, 10);
        assert_eq!(entry.code, "echo a");
    }

    #[test]
    fn test_parse_concatenated_entries() {
        let line = "+0mZ|1|1.5|f|/etc/zshrc|3> foo bar+0mZ|2|1.6|g|/etc/zshrc|9> baz";
        let entries = parse_line(line);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].code, "foo bar");
        assert_eq!(entries[1].name, "g");
        assert_eq!(entries[1].level, 2);
        assert_eq!(entries[1].code, "baz");
    }

    #[test]
    fn test_percent_after_marker_is_literal() {
        let line = "+0mZ|1|1.5|f|a.sh|3> print '+0mZ|%e'";
        let entries = parse_line(line);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "print '+0mZ|%e'");
    }

    #[test]
    fn test_text_before_marker_is_ignored() {
        let entries = parse_line("partial output+0mZ|1|2.0|f|a.sh|3> true");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "true");
    }

    #[test]
    fn test_fields_are_trimmed() {
        let entries = parse_line("  +0mZ|3|7.25| my func | my file.zsh |42>   ls -la   ");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "my func");
        assert_eq!(entries[0].file, "my file.zsh");
        assert_eq!(entries[0].code, "ls -la");
    }

    #[test]
    fn test_malformed_lines_yield_nothing() {
        assert!(parse_line("").is_empty());
        assert!(parse_line("   ").is_empty());
        assert!(parse_line("zsh: command not found: foo").is_empty());
        assert!(parse_line("+0mZ|1|100.0 funcA a.sh 10> echo").is_empty());
        // Timestamp that is not a float
        assert!(parse_line("+0mZ|1|1.2.3|f|a.sh|3> echo").is_empty());
        // No whitespace after the prompt
        assert!(parse_line("+0mZ|1|1.0|f|a.sh|3>").is_empty());
    }

    #[test]
    fn test_malformed_segment_does_not_hide_valid_ones() {
        let line = "+0mZ|x|bad+0mZ|1|3.0|f|a.sh|4> ok";
        let entries = parse_line(line);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].code, "ok");
    }

    #[test]
    fn test_single_entry_pattern_matches_whole_line() {
        let single = LinePattern::SingleEntry;

        let entries = single.extract("+0mZ|2|5.5|f|a.sh|8> echo done");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line_number, 8);

        assert!(single.extract("noise +0mZ|2|5.5|f|a.sh|8> x").is_empty());
    }

    #[test]
    fn test_parse_log_counts_skipped_lines() {
        let text = "+0mZ|1|1.0|f|a.sh|1> a\n\ngarbage\n+0mZ|1|2.0|f|a.sh|2> b\n";
        let (entries, skipped) = parse_log(text);

        assert_eq!(entries.len(), 2);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_level_overflow_is_rejected() {
        assert!(parse_line("+0mZ|99999999999|1.0|f|a.sh|1> a").is_empty());
    }
}
