//! Output writers for coverage reports.
//!
//! This module handles writing data to disk in various formats:
//! - Markdown reports
//! - JSON analysis summaries

pub mod json;
pub mod report;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use json::{analysis_to_string, write_analysis};
pub use report::write_report;

/// Validate an output path and create its parent directories
///
/// **Private** - shared by the writers
fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_output_path_empty() {
        assert!(prepare_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_prepare_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(prepare_output_path(temp_dir.path()).is_err());
    }

    #[test]
    fn test_prepare_output_path_creates_parents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("nested/dirs/report.md");
        prepare_output_path(&nested).unwrap();
        assert!(nested.parent().unwrap().is_dir());
    }
}
