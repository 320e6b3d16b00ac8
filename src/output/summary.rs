//! Plain-text summary tables for the terminal.

use crate::aggregator::metrics::{FrameStats, HotPath};
use crate::profile::ValueFormatter;

const STACK_WIDTH: usize = 48;

/// Horizontal rule of the hot path table
fn border(left: char, mid: char, right: char) -> String {
    let rule = |width: usize| "━".repeat(width);
    format!(
        "  {left}{}{mid}{}{mid}{}{right}",
        rule(STACK_WIDTH + 2),
        rule(14),
        rule(9)
    )
}

/// Render hot paths and the slowest call sites as text tables
///
/// **Public** - printed by `convert --summary`
pub fn generate_text_summary(
    hot_paths: &[HotPath],
    frame_stats: &[FrameStats],
    formatter: ValueFormatter,
    max_lines: usize,
) -> String {
    let mut lines = Vec::new();

    lines.push("  HOT PATHS (self time)".to_string());
    lines.push(border('┏', '┳', '┓'));
    lines.push(format!(
        "  ┃ {:<width$} ┃ {:^12} ┃ {:^7} ┃",
        "Call Path (Hottest First)",
        "TIME",
        "%",
        width = STACK_WIDTH
    ));
    lines.push(border('┣', '╋', '┫'));

    for path in hot_paths.iter().take(max_lines) {
        lines.push(format!(
            "  ┃ {:<width$} ┃ {:>12} ┃ {:>6.1}% ┃",
            truncate_front(&path.stack, STACK_WIDTH),
            formatter.format(path.seconds),
            path.percentage,
            width = STACK_WIDTH
        ));
    }

    lines.push(border('┗', '┻', '┛'));

    if hot_paths.len() > max_lines {
        lines.push(format!(
            "   (Showing top {} of {} paths)",
            max_lines,
            hot_paths.len()
        ));
    }

    lines.push(String::new());
    lines.push("  SLOWEST CALL SITES".to_string());

    for stats in frame_stats.iter().take(max_lines) {
        lines.push(format!(
            "  {:>12}  {:>5} call(s)  {}  ({}:{})",
            formatter.format(stats.total_seconds),
            stats.calls,
            stats.name,
            stats.file,
            stats.line
        ));
    }

    lines.join("\n")
}

/// Keep the tail of a long call path, which names the innermost frames
fn truncate_front(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }

    let tail: String = text.chars().skip(count - (width - 3)).collect();
    format!("...{tail}")
}
