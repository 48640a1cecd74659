//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Malformed trace content is never an error: the parser recovers line by
//! line and reports what it skipped through `ParseStats`.

use std::path::PathBuf;
use thiserror::Error;

/// Whole-run failures surfaced by the analyze command
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("LCOV file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to read tracefile: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("No coverage data found or all files excluded ({records} records, {excluded} excluded)")]
    EmptyResult { records: usize, excluded: usize },

    #[error("Overall line coverage {actual:.1}% is below the required {required:.1}%")]
    BelowFailUnder { actual: f64, required: f64 },
}

/// Errors that can occur while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid exclusion pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid threshold for {name}: {value} (must be between 0 and 100)")]
    InvalidThreshold { name: String, value: f64 },

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
