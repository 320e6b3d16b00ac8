use crate::output::read_profile;
use crate::profile::validate_events;
use crate::utils::config::{SCHEMA_VERSION, SPEEDSCOPE_SCHEMA_URL};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Validate a speedscope profile JSON file
pub fn validate_profile_file(file_path: PathBuf) -> Result<()> {
    println!("Validating profile: {}", file_path.display());

    let file = read_profile(&file_path)?;

    for profile in &file.profiles {
        validate_events(&profile.events, &file.shared.frames)
            .with_context(|| format!("Profile '{}' has malformed events", profile.name))?;
    }

    println!("✓ Valid profile JSON");
    println!("  Exporter: {}", file.exporter);
    println!("  Frames: {}", file.shared.frames.len());

    for profile in &file.profiles {
        println!("  Profile: {}", profile.name);
        println!("    Events: {}", profile.events.len());
        println!(
            "    Duration: {:.6}s",
            profile.end_value - profile.start_value
        );
        if let Some(started) = wall_clock(profile.start_value) {
            println!("    Started: {}", started.to_rfc3339());
        }
    }

    Ok(())
}

/// Convert epoch seconds from the trace into a UTC timestamp
///
/// Returns `None` for profiles without events (start value 0) or values
/// outside chrono's range.
pub fn wall_clock(epoch_seconds: f64) -> Option<DateTime<Utc>> {
    if !epoch_seconds.is_finite() || epoch_seconds <= 0.0 {
        return None;
    }

    let secs = epoch_seconds.floor();
    let nanos = ((epoch_seconds - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Zsh Trace Studio Profile Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!("Format: {}", SPEEDSCOPE_SCHEMA_URL);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  $schema: string            - Speedscope schema URL");
        println!("  name: string               - Document title");
        println!("  exporter: string           - Producing tool and version");
        println!("  shared.frames: array       - Call sites, deduplicated by name and line");
        println!("    name: string             - Function or script name");
        println!("    file: string             - Source file");
        println!("    line: number             - Source line");
        println!("    executedCode: array      - {{code, duration}} per completed call");
        println!("  profiles: array            - One evented profile");
        println!("    type: \"evented\"");
        println!("    unit: \"seconds\"");
        println!("    startValue: number       - Time of first event");
        println!("    endValue: number         - Time of last event");
        println!("    events: array            - {{type: O|C, at, frame}}");
        println!("  activeProfileIndex: number - Always 0");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Zsh Trace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Profile Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Turns zsh xtrace logs into speedscope flamegraphs and timelines.");
}
