//! CLI command implementations.

pub mod analyze;
pub mod describe;
pub mod models;
pub mod serve;

use std::path::Path;

use opsanalyst::{AnalystConfig, ParserConfig};

use crate::cli::DelimiterChoice;

/// Read an input file, failing with a readable message if it is missing.
pub(crate) fn read_input(file: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(std::fs::read(file)?)
}

/// Display name used in reports for an input path.
pub(crate) fn display_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string())
}

/// Apply the delimiter choice to a configuration.
pub(crate) fn with_delimiter(config: AnalystConfig, delimiter: DelimiterChoice) -> AnalystConfig {
    config.with_parser(ParserConfig {
        delimiter: delimiter.as_option(),
        ..ParserConfig::default()
    })
}
