//! Build collapsed stack format from a call tree profile.
//!
//! Format: "parent;child;grandchild weight"
//!
//! Example: "main;compinit;compdump 0.042"
//! This means: main called compinit which called compdump, which itself
//! (excluding its own callees) took 42ms.

use crate::profile::CallTreeProfile;
use log::debug;
use serde::{Deserialize, Serialize};

/// A single collapsed stack entry
///
/// **Public** - used by metrics and the text summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollapsedStack {
    /// Stack trace as semicolon-separated string
    pub stack: String,

    /// Self time of the innermost frame, in seconds
    pub weight: f64,
}

impl CollapsedStack {
    /// Create a new collapsed stack
    pub fn new(stack: String, weight: f64) -> Self {
        Self { stack, weight }
    }

    /// Render as a line of the collapsed stack file format
    pub fn to_line(&self) -> String {
        format!("{} {}", self.stack, self.weight)
    }
}

/// Build collapsed stacks from a call tree profile
///
/// **Public** - main entry point for stack building
///
/// # Returns
/// One collapsed stack per call path, sorted by weight (descending).
/// Paths with identical names at different call sites are merged.
pub fn build_collapsed_stacks(profile: &CallTreeProfile) -> Vec<CollapsedStack> {
    debug!(
        "Building collapsed stacks from {} call paths",
        profile.nodes.len().saturating_sub(1)
    );

    let mut stacks: Vec<CollapsedStack> = Vec::new();

    for (index, node) in profile.nodes.iter().enumerate() {
        if node.frame.is_none() {
            continue;
        }

        let stack = profile.path(index).join(";");
        match stacks.iter_mut().find(|s| s.stack == stack) {
            Some(existing) => existing.weight += node.self_time,
            None => stacks.push(CollapsedStack::new(stack, node.self_time)),
        }
    }

    // Stable, so equal weights keep tree order
    stacks.sort_by(|a, b| b.weight.total_cmp(&a.weight));

    debug!("Built {} unique collapsed stacks", stacks.len());

    stacks
}
