use crate::utils::config::DEFAULT_TOP_PATHS;
use std::path::PathBuf;

/// Arguments for the convert command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the xtrace log
    pub input: PathBuf,

    /// Output path for the speedscope JSON (defaults to input with .json)
    pub output: Option<PathBuf>,

    /// Profile name (defaults to the input file name)
    pub name: Option<String>,

    /// Number of hot paths to include in the summary
    pub top_paths: usize,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            name: None,
            top_paths: DEFAULT_TOP_PATHS,
            print_summary: false,
        }
    }
}
