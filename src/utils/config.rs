//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Every traced statement starts with this marker. It comes from the PS4
// prompt the shell hook installs before enabling xtrace.
pub const TRACE_MARKER: &str = "+0mZ|";

// Speedscope document header values
pub const SPEEDSCOPE_SCHEMA_URL: &str = "https://www.speedscope.app/file-format-schema.json";
pub const DOCUMENT_NAME: &str = "Zsh Trace Flamegraph";
pub const EXPORTER_NAME: &str = "zsh-trace-studio";

/// Extension given to converted profiles when no output path is supplied
pub const PROFILE_EXTENSION: &str = "json";

/// Default number of hot paths shown in the text summary
pub const DEFAULT_TOP_PATHS: usize = 20;
pub const MAX_TOP_PATHS: usize = 1000;

/// Exporter string written into every speedscope document
pub fn exporter() -> String {
    format!("{}@{}", EXPORTER_NAME, env!("CARGO_PKG_VERSION"))
}
