//! Turning evented profiles into call tree profiles.
//!
//! This module handles:
//! - The `ProfileBuilder` seam that consumes open/close events
//! - A call tree builder with total and self time per call path
//! - The import entry point for raw trace logs

pub mod builder;
pub mod import;

pub use builder::{
    CallTreeNode, CallTreeProfile, CallTreeProfileBuilder, FrameInfo, ProfileBuilder,
    ValueFormatter,
};
pub use import::{
    build_profile, import_zsh_trace, replay_events, try_import_zsh_trace, validate_events,
    ProfileGroup,
};
