//! Package a reconstructed call tree as a speedscope evented profile.

use crate::aggregator::call_tree::CallTree;
use crate::parser::schema::{EventedProfile, FrameEvent, ProfileType, SpeedscopeFile, ValueUnit};
use log::debug;

/// Wrap events into an evented profile
///
/// **Public** - start and end values come from the first and last events,
/// or are both zero when there are none.
pub fn to_evented_profile(name: impl Into<String>, events: Vec<FrameEvent>) -> EventedProfile {
    let start_value = events.first().map_or(0.0, |e| e.at);
    let end_value = events.last().map_or(0.0, |e| e.at);

    EventedProfile {
        profile_type: ProfileType::Evented,
        name: name.into(),
        unit: ValueUnit::Seconds,
        start_value,
        end_value,
        events,
    }
}

/// Convert a call tree into a complete speedscope document
///
/// **Public** - used by the convert command and the importer
///
/// # Arguments
/// * `name` - Profile name, usually the trace file name
/// * `tree` - Events and frames from `build_call_tree`
pub fn to_speedscope_file(name: impl Into<String>, tree: CallTree) -> SpeedscopeFile {
    let CallTree { events, frames } = tree;
    let profile = to_evented_profile(name, events);

    debug!(
        "Emitting profile '{}' spanning {:.6}s with {} events",
        profile.name,
        profile.end_value - profile.start_value,
        profile.events.len()
    );

    SpeedscopeFile::new(profile, frames)
}
