//! Output JSON schema definitions for profile data.
//!
//! This module defines the speedscope document we write to disk. Field
//! names follow https://www.speedscope.app/file-format-schema.json so the
//! files open directly in speedscope.

use crate::utils::config::{exporter, DOCUMENT_NAME, SPEEDSCOPE_SCHEMA_URL};
use serde::{Deserialize, Serialize};

/// Top-level speedscope file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedscopeFile {
    #[serde(rename = "$schema")]
    pub schema: String,

    /// Document title shown by the viewer
    pub name: String,

    /// Tool and version that produced the file
    pub exporter: String,

    /// Frame table shared by all profiles
    pub shared: SharedFrames,

    pub profiles: Vec<EventedProfile>,

    #[serde(rename = "activeProfileIndex")]
    pub active_profile_index: usize,
}

impl SpeedscopeFile {
    /// Wrap a single evented profile and its frame table
    pub fn new(profile: EventedProfile, frames: Vec<Frame>) -> Self {
        Self {
            schema: SPEEDSCOPE_SCHEMA_URL.to_string(),
            name: DOCUMENT_NAME.to_string(),
            exporter: exporter(),
            shared: SharedFrames { frames },
            profiles: vec![profile],
            active_profile_index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedFrames {
    pub frames: Vec<Frame>,
}

/// A call site, deduplicated by function name and line
///
/// The frame's id is its index in the frame table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    pub file: String,
    pub line: u32,

    /// One sample per completed call, in the order the calls ended
    #[serde(rename = "executedCode", default)]
    pub executed_code: Vec<ExecutedCode>,
}

impl Frame {
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line,
            executed_code: Vec::new(),
        }
    }

    /// Sum of all recorded sample durations
    pub fn total_duration(&self) -> f64 {
        self.executed_code.iter().map(|c| c.duration).sum()
    }
}

/// Statement text with the time spent until its call ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedCode {
    pub code: String,
    pub duration: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Evented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueUnit {
    Seconds,
}

/// Profile expressed as ordered open/close events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventedProfile {
    #[serde(rename = "type")]
    pub profile_type: ProfileType,

    pub name: String,
    pub unit: ValueUnit,

    #[serde(rename = "startValue")]
    pub start_value: f64,

    #[serde(rename = "endValue")]
    pub end_value: f64,

    pub events: Vec<FrameEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "O")]
    OpenFrame,
    #[serde(rename = "C")]
    CloseFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,

    pub at: f64,

    /// Index into the shared frame table
    pub frame: usize,
}

impl FrameEvent {
    pub fn open(frame: usize, at: f64) -> Self {
        Self {
            event_type: EventType::OpenFrame,
            at,
            frame,
        }
    }

    pub fn close(frame: usize, at: f64) -> Self {
        Self {
            event_type: EventType::CloseFrame,
            at,
            frame,
        }
    }
}
