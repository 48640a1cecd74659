//! Markdown report writer.

use super::prepare_output_path;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a rendered report to a file
///
/// **Public** - main entry point for report output
///
/// # Arguments
/// * `content` - Markdown from `render_report`
/// * `output_path` - Destination file; parent directories are created
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
pub fn write_report(content: &str, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    writer
        .write_all(content.as_bytes())
        .map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Report written successfully ({} bytes)", content.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_report() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("reports/coverage.md");

        write_report("# Report\n", &path).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Report\n");
    }

    #[test]
    fn test_write_report_overwrites() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        write_report("first", temp_file.path()).unwrap();
        write_report("second", temp_file.path()).unwrap();
        assert_eq!(std::fs::read_to_string(temp_file.path()).unwrap(), "second");
    }

    #[test]
    fn test_write_report_to_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_report("x", temp_dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }
}
