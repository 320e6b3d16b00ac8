//! Calculate performance metrics and hot paths from trace data.
//!
//! Hot paths are the call paths where the shell spent the most time.
//! These are the primary targets for speeding up shell startup.

use super::stack_builder::CollapsedStack;
use crate::parser::schema::Frame;
use log::debug;
use serde::{Deserialize, Serialize};

/// A hot path in the execution (stack trace with time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotPath {
    /// Collapsed stack representation (e.g., "main;compinit;compdump")
    pub stack: String,

    /// Self time of this path in seconds
    pub seconds: f64,

    /// Percentage of total profile time
    pub percentage: f64,
}

/// Calculate hot paths from collapsed stacks
///
/// **Public** - main entry point for metrics calculation
///
/// # Arguments
/// * `stacks` - Collapsed stacks from stack_builder
/// * `total_seconds` - Total time covered by the profile
/// * `top_n` - Number of top paths to return (e.g., 10)
///
/// # Returns
/// Vector of hot paths, sorted by time (descending)
pub fn calculate_hot_paths(
    stacks: &[CollapsedStack],
    total_seconds: f64,
    top_n: usize,
) -> Vec<HotPath> {
    debug!(
        "Calculating top {} hot paths from {} stacks",
        top_n,
        stacks.len()
    );

    // Stacks are already sorted by weight from stack_builder
    stacks
        .iter()
        .take(top_n)
        .map(|stack| create_hot_path(stack, total_seconds))
        .collect()
}

/// Create a HotPath from a CollapsedStack
pub fn create_hot_path(stack: &CollapsedStack, total_seconds: f64) -> HotPath {
    let percentage = if total_seconds > 0.0 {
        (stack.weight / total_seconds) * 100.0
    } else {
        0.0
    };

    HotPath {
        stack: stack.stack.clone(),
        seconds: stack.weight,
        percentage,
    }
}

/// Per call site statistics taken from the frame table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub name: String,
    pub file: String,
    pub line: u32,

    /// Number of completed calls
    pub calls: usize,

    /// Sum of call durations, in seconds
    pub total_seconds: f64,

    /// Longest single call, in seconds
    pub max_seconds: f64,

    /// Statement of the longest call
    pub slowest_code: Option<String>,
}

/// Summarise each frame's executed code samples
///
/// **Public** - sorted by total time (descending)
///
/// Nested and recursive calls each count their full duration, so totals
/// across frames can exceed the profile duration.
pub fn calculate_frame_stats(frames: &[Frame]) -> Vec<FrameStats> {
    let mut stats: Vec<FrameStats> = frames
        .iter()
        .map(|frame| {
            let slowest = frame
                .executed_code
                .iter()
                .max_by(|a, b| a.duration.total_cmp(&b.duration));

            FrameStats {
                name: frame.name.clone(),
                file: frame.file.clone(),
                line: frame.line,
                calls: frame.executed_code.len(),
                total_seconds: frame.total_duration(),
                max_seconds: slowest.map_or(0.0, |c| c.duration),
                slowest_code: slowest.map(|c| c.code.clone()),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.total_seconds.total_cmp(&a.total_seconds));
    stats
}

/// Time distribution statistics across collapsed stacks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeDistribution {
    /// Total self time across all stacks
    pub total_seconds: f64,

    /// Number of unique stacks
    pub stack_count: usize,

    pub mean_seconds_per_stack: f64,

    pub median_seconds_per_stack: f64,

    /// Time in the top 10% of stacks
    pub top_10_percent_seconds: f64,

    /// Share of total time in the top 10% of stacks
    pub top_10_percent_percentage: f64,
}

impl TimeDistribution {
    /// Check if time is highly concentrated
    ///
    /// Returns true if the top 10% of stacks take more than 80% of the time
    pub fn is_highly_concentrated(&self) -> bool {
        self.top_10_percent_percentage > 80.0
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.6}s | Stacks: {} | Mean: {:.6}s | Median: {:.6}s | Top 10%: {:.1}%",
            self.total_seconds,
            self.stack_count,
            self.mean_seconds_per_stack,
            self.median_seconds_per_stack,
            self.top_10_percent_percentage
        )
    }
}

/// Calculate time distribution statistics
///
/// **Public** - expects stacks sorted by weight (descending)
pub fn calculate_time_distribution(stacks: &[CollapsedStack]) -> TimeDistribution {
    if stacks.is_empty() {
        return TimeDistribution::default();
    }

    let total: f64 = stacks.iter().map(|s| s.weight).sum();
    let count = stacks.len();

    let mut weights: Vec<f64> = stacks.iter().map(|s| s.weight).collect();
    weights.sort_by(|a, b| a.total_cmp(b));
    let median = weights[weights.len() / 2];

    let top_count = (count as f64 * 0.1).ceil() as usize;
    let top: f64 = stacks.iter().take(top_count).map(|s| s.weight).sum();

    TimeDistribution {
        total_seconds: total,
        stack_count: count,
        mean_seconds_per_stack: total / count as f64,
        median_seconds_per_stack: median,
        top_10_percent_seconds: top,
        top_10_percent_percentage: if total > 0.0 {
            (top / total) * 100.0
        } else {
            0.0
        },
    }
}
