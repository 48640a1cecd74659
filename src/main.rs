//! layercov CLI
//!
//! Analyzes LCOV coverage by architectural layer and writes a markdown
//! report with prioritized recommendations.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use layercov::commands::{classify_paths, display_version, execute_analyze, validate_args, AnalyzeArgs};
use layercov::utils::config::{DEFAULT_INPUT, DEFAULT_OUTPUT};

/// layercov - coverage analysis by architectural layer
#[derive(Parser, Debug)]
#[command(name = "layercov")]
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
    /// Analyze an LCOV tracefile and write the layer report
    Analyze {
        /// LCOV tracefile to read
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,

        /// Output path for the markdown report
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Output path for a JSON summary (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Files below this line coverage are listed (percent)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Path to a layercov.toml config file
        #[arg(short, long, env = "LAYERCOV_CONFIG")]
        config: Option<PathBuf>,

        /// Additional exclusion regex (repeatable)
        #[arg(short, long = "exclude")]
        exclude: Vec<String>,

        /// Do not apply the built-in exclusion patterns
        #[arg(long)]
        no_default_excludes: bool,

        /// Exit non-zero when overall line coverage is below this percent
        #[arg(long)]
        fail_under: Option<f64>,

        /// Do not echo the report to stdout
        #[arg(short, long)]
        quiet: bool,
    },

    /// Show how paths are classified
    Classify {
        /// Source paths as they appear in SF: lines
        #[arg(required = true)]
        paths: Vec<String>,
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
        Commands::Analyze {
            input,
            output,
            json,
            threshold,
            config,
            exclude,
            no_default_excludes,
            fail_under,
            quiet,
        } => {
            let args = AnalyzeArgs {
                input,
                output,
                output_json: json,
                threshold,
                config_path: config,
                extra_excludes: exclude,
                no_default_excludes,
                fail_under,
                quiet,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Classify { paths } => {
            classify_paths(&paths);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
