//! Zsh Trace Studio CLI
//!
//! A profiling tool for zsh startup and scripts.
//! Converts xtrace logs into speedscope profiles for flamegraph and
//! timeline views.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use zsh_trace_studio::commands::{
    display_schema, display_version, execute_convert, validate_args, validate_profile_file,
    ConvertArgs,
};
use zsh_trace_studio::utils::config::DEFAULT_TOP_PATHS;

/// Zsh Trace Studio - Flamegraphs for zsh xtrace logs
#[derive(Parser, Debug)]
#[command(name = "zsh-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert an xtrace log into a speedscope profile
    Convert {
        /// Trace log written by the shell hook
        #[arg(short, long, env = "ZSH_TRACE_LOG")]
        input: PathBuf,

        /// Output path for the JSON profile (defaults to the input with .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Profile name (defaults to the input file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Number of top hot paths to include in the summary
        #[arg(long, default_value_t = DEFAULT_TOP_PATHS)]
        top_paths: usize,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a profile JSON file
    Validate {
        /// Path to profile JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Convert {
            input,
            output,
            name,
            top_paths,
            summary,
        } => {
            let args = ConvertArgs {
                input,
                output,
                name,
                top_paths,
                print_summary: summary,
            };

            // Validate args first
            validate_args(&args)?;

            execute_convert(args)?;
        }

        Commands::Validate { file } => {
            validate_profile_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
