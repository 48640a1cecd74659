//! JSON analysis output writer.
//!
//! Writes `CoverageAnalysis` values to JSON files with pretty formatting,
//! for dashboards and CI artifacts that want numbers instead of markdown.

use super::prepare_output_path;
use crate::aggregator::CoverageAnalysis;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write an analysis to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_analysis(
    analysis: &CoverageAnalysis,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing JSON summary to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, analysis)
        .map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "JSON summary written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}

/// Serialize an analysis to a pretty JSON string
pub fn analysis_to_string(analysis: &CoverageAnalysis) -> Result<String, OutputError> {
    serde_json::to_string_pretty(analysis).map_err(OutputError::SerializationFailed)
}
