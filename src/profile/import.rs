//! Import entry point: raw trace log in, built profile group out.

use super::builder::{
    CallTreeProfile, CallTreeProfileBuilder, FrameInfo, ProfileBuilder, ValueFormatter,
};
use crate::aggregator::call_tree::build_call_tree;
use crate::output::speedscope::to_speedscope_file;
use crate::parser::schema::{EventType, Frame, FrameEvent, SpeedscopeFile, ValueUnit};
use crate::parser::zsh_trace::parse_trace;
use crate::utils::error::{ImportError, ProfileError};
use log::{debug, error};

/// Named group of built profiles
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileGroup {
    pub name: String,
    pub index_to_view: usize,
    pub profiles: Vec<CallTreeProfile>,
}

/// Replay frame events into any builder
///
/// # Errors
/// * `ProfileError::UnknownFrame` - An event points outside the frame table
/// * Any error the builder raises for out-of-order events
pub fn replay_events<B: ProfileBuilder>(
    builder: &mut B,
    events: &[FrameEvent],
    frames: &[Frame],
) -> Result<(), ProfileError> {
    let infos: Vec<FrameInfo> = frames
        .iter()
        .enumerate()
        .map(|(key, frame)| FrameInfo::from_frame(key, frame))
        .collect();

    for event in events {
        let info = infos.get(event.frame).ok_or(ProfileError::UnknownFrame {
            frame: event.frame,
            frame_count: infos.len(),
        })?;

        match event.event_type {
            EventType::OpenFrame => builder.enter_frame(info, event.at)?,
            EventType::CloseFrame => builder.leave_frame(info, event.at)?,
        }
    }

    Ok(())
}

/// Build the call tree profile for the active profile of a document
///
/// **Public** - also used to validate profiles read back from disk
pub fn build_profile(file: &SpeedscopeFile, name: &str) -> Result<CallTreeProfile, ProfileError> {
    let mut builder = CallTreeProfileBuilder::new();
    builder.set_name(name);
    builder.set_value_formatter(ValueFormatter::Time(ValueUnit::Seconds));

    if let Some(profile) = file.profiles.get(file.active_profile_index) {
        replay_events(&mut builder, &profile.events, &file.shared.frames)?;
    }

    builder.build()
}

/// Check that events are balanced, properly nested, in time order and
/// only reference known frames
pub fn validate_events(events: &[FrameEvent], frames: &[Frame]) -> Result<(), ProfileError> {
    let mut builder = CallTreeProfileBuilder::new();
    replay_events(&mut builder, events, frames)?;
    builder.build().map(|_| ())
}

/// Import a zsh trace log, returning the error on failure
///
/// # Arguments
/// * `contents` - Raw bytes of the trace log
/// * `file_name` - Display name for the group and its profile
pub fn try_import_zsh_trace(
    contents: &[u8],
    file_name: &str,
) -> Result<ProfileGroup, ImportError> {
    let parsed = parse_trace(contents);
    let tree = build_call_tree(&parsed.entries);
    let file = to_speedscope_file(file_name, tree);
    let profile = build_profile(&file, file_name)?;

    debug!(
        "Imported '{}': {} frames, {} call paths",
        file_name,
        file.shared.frames.len(),
        profile.nodes.len().saturating_sub(1)
    );

    Ok(ProfileGroup {
        name: file_name.to_string(),
        index_to_view: 0,
        profiles: vec![profile],
    })
}

/// Import a zsh trace log
///
/// **Public** - main import entry point
///
/// # Returns
/// A group holding exactly one profile, or `None` if the log could not be
/// imported. The reason is logged at error level; no partial profile is
/// ever returned.
pub fn import_zsh_trace(contents: &[u8], file_name: &str) -> Option<ProfileGroup> {
    match try_import_zsh_trace(contents, file_name) {
        Ok(group) => Some(group),
        Err(e) => {
            error!("Failed to import zsh trace '{}': {}", file_name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_names_group_and_profile() {
        let log = b"+0mZ|1|1.0|main|m.zsh|1> source plugins\n+0mZ|2|1.5|load|m.zsh|9> . x\n";
        let group = import_zsh_trace(log, "startup.log").unwrap();

        assert_eq!(group.name, "startup.log");
        assert_eq!(group.index_to_view, 0);
        assert_eq!(group.profiles.len(), 1);

        let profile = &group.profiles[0];
        assert_eq!(profile.name, "startup.log");
        assert_eq!(profile.formatter, ValueFormatter::Time(ValueUnit::Seconds));
        assert_eq!(profile.start_value, 1.0);
        assert_eq!(profile.end_value, 1.5);
    }

    #[test]
    fn test_import_keeps_entries_around_invalid_bytes() {
        let log = b"+0mZ|1|1.0|main|m.zsh|1> echo caf\xE9\n+0mZ|1|2.0|main|m.zsh|2> true\n";
        let group = import_zsh_trace(log, "latin1.log").unwrap();

        let profile = &group.profiles[0];
        // root, main@1, main@2
        assert_eq!(profile.nodes.len(), 3);
        assert_eq!(profile.start_value, 1.0);
        assert_eq!(profile.end_value, 2.0);
    }

    #[test]
    fn test_replay_rejects_unknown_frame() {
        let mut builder = CallTreeProfileBuilder::new();
        let result = replay_events(&mut builder, &[FrameEvent::open(2, 0.0)], &[]);
        assert_eq!(
            result,
            Err(ProfileError::UnknownFrame {
                frame: 2,
                frame_count: 0
            })
        );
    }

    #[test]
    fn test_validate_events_detects_unbalanced_stream() {
        let frames = vec![Frame::new("a", "a.sh", 1)];
        assert!(validate_events(&[FrameEvent::open(0, 0.0)], &frames).is_err());
        assert!(validate_events(
            &[FrameEvent::open(0, 0.0), FrameEvent::close(0, 1.0)],
            &frames
        )
        .is_ok());
    }
}
