//! Output writers for profile data.
//!
//! This module handles:
//! - Building speedscope documents from a call tree
//! - Writing and reading them as JSON
//! - Text summaries for the terminal

pub mod json;
pub mod speedscope;
pub mod summary;

// Re-export main functions
pub use json::{profile_to_string, read_profile, write_profile};
pub use speedscope::{to_evented_profile, to_speedscope_file};
pub use summary::generate_text_summary;

use crate::utils::config::PROFILE_EXTENSION;
use crate::utils::error::OutputError;
use std::path::{Path, PathBuf};

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Output path used when none is given: the trace path with a `.json`
/// extension in place of its own
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension(PROFILE_EXTENSION)
}
