//! Aggregation of trace entries into a call tree and metrics.
//!
//! This module transforms parsed trace entries into:
//! - Open/close frame events and a frame table
//! - Collapsed stacks (per call path self time)
//! - Hot path analysis and per-frame statistics

pub mod call_tree;
pub mod metrics;
pub mod stack_builder;

// Re-export main types and functions
pub use call_tree::{build_call_tree, CallTree};
pub use metrics::{
    calculate_frame_stats, calculate_hot_paths, calculate_time_distribution, FrameStats, HotPath,
    TimeDistribution,
};
pub use stack_builder::{build_collapsed_stacks, CollapsedStack};
