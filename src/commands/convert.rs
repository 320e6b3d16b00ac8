//! Convert command implementation.
//!
//! The convert command:
//! 1. Reads and parses the trace log
//! 2. Rebuilds the call tree
//! 3. Writes the speedscope profile
//! 4. Optionally prints a hot path summary

use crate::aggregator::{
    build_call_tree, build_collapsed_stacks, calculate_frame_stats, calculate_hot_paths,
    calculate_time_distribution,
};
use crate::commands::models::ConvertArgs;
use crate::output::{default_output_path, generate_text_summary, to_speedscope_file, write_profile};
use crate::parser::{parse_trace_file, SpeedscopeFile};
use crate::profile::build_profile;
use crate::utils::config::MAX_TOP_PATHS;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

/// Execute the convert command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The path of the written profile
///
/// # Errors
/// * Unreadable trace log
/// * File write errors
/// * Summary requested but the events cannot be replayed
///
/// # Example
/// ```ignore
/// let args = ConvertArgs {
///     input: PathBuf::from("/tmp/zsh_trace.log"),
///     print_summary: true,
///     ..Default::default()
/// };
///
/// execute_convert(args)?;
/// ```
pub fn execute_convert(args: ConvertArgs) -> Result<PathBuf> {
    let start_time = Instant::now();

    info!("Converting trace log: {}", args.input.display());

    info!("Parsing trace log...");
    let parsed = parse_trace_file(&args.input)
        .with_context(|| format!("Failed to read trace log {}", args.input.display()))?;

    debug!(
        "Parsed {} entries ({} of {} lines skipped)",
        parsed.entries.len(),
        parsed.skipped_lines,
        parsed.total_lines
    );

    info!("Rebuilding call tree...");
    let tree = build_call_tree(&parsed.entries);

    let name = profile_name(&args);
    let file = to_speedscope_file(name.clone(), tree);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    write_profile(&file, &output).context("Failed to write profile JSON")?;
    info!("✓ Profile written to: {}", output.display());

    if args.print_summary {
        print_summary(&file, &name, args.top_paths)?;
    }

    let elapsed = start_time.elapsed();
    info!("Conversion completed in {:.2}s", elapsed.as_secs_f64());

    Ok(output)
}

/// Profile name: explicit name, else the input's file name
fn profile_name(args: &ConvertArgs) -> String {
    args.name.clone().unwrap_or_else(|| {
        args.input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.input.display().to_string())
    })
}

/// Print hot paths and call site statistics
///
/// **Private** - internal helper for execute_convert
fn print_summary(file: &SpeedscopeFile, name: &str, top_paths: usize) -> Result<()> {
    let profile = build_profile(file, name)
        .context("Failed to build call tree profile")?;
    let stacks = build_collapsed_stacks(&profile);

    let distribution = calculate_time_distribution(&stacks);
    info!("Time distribution: {}", distribution.summary());

    let hot_paths = calculate_hot_paths(&stacks, profile.total_weight(), top_paths);
    let frame_stats = calculate_frame_stats(&file.shared.frames);

    println!("\n{}", "=".repeat(80));
    println!("PROFILE SUMMARY");
    println!("{}", "=".repeat(80));
    let duration = profile.end_value - profile.start_value;
    println!("Profile:     {}", profile.name);
    println!("Duration:    {}", profile.formatter.format(duration));
    println!("Frames:      {}", file.shared.frames.len());
    println!("Call Paths:  {}", stacks.len());

    let summary = generate_text_summary(
        &hot_paths,
        &frame_stats,
        profile.formatter,
        top_paths.min(10),
    );
    println!("\n{}", summary);
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Validate convert arguments
///
/// **Public** - can be called before execute_convert for early validation
pub fn validate_args(args: &ConvertArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input trace log path cannot be empty");
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    if same_path(&output, &args.input) {
        anyhow::bail!(
            "Output path {} would overwrite the trace log",
            output.display()
        );
    }

    if args.top_paths == 0 {
        anyhow::bail!("top_paths must be greater than 0");
    }

    if args.top_paths > MAX_TOP_PATHS {
        anyhow::bail!("top_paths is too large (max {})", MAX_TOP_PATHS);
    }

    Ok(())
}

/// Whether two paths name the same file
///
/// Existing files are compared by canonical path; otherwise `.` components
/// are ignored and the rest compared literally.
fn same_path(a: &Path, b: &Path) -> bool {
    if let (Ok(a), Ok(b)) = (a.canonicalize(), b.canonicalize()) {
        return a == b;
    }

    let normalize = |path: &Path| -> PathBuf {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    };
    normalize(a) == normalize(b)
}
