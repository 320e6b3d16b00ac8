//! Zsh Trace Studio
//!
//! Converts zsh xtrace logs into speedscope evented profiles.
//!
//! The pipeline:
//! 1. [`parser`] pulls entries out of raw log lines and sorts them by time
//! 2. [`aggregator`] rebuilds call nesting into open/close events and a
//!    frame table
//! 3. [`output`] packages them as a speedscope document
//! 4. [`profile`] replays the events into a call tree profile
//!
//! ## Getting Started
//!
//! ```bash
//! cargo install zsh-trace-studio
//! zsh-trace convert --input ~/.zsh_trace.log --summary
//! ```
//!
//! Library users can go straight from log bytes to a built profile with
//! [`profile::import_zsh_trace`].

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod profile;
pub mod utils;
