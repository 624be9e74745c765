//! Describe command - print the statistical summary of a CSV file.

use std::path::PathBuf;

use colored::Colorize;
use opsanalyst::{Analyst, AnalystConfig};

use super::{display_name, read_input, with_delimiter};
use crate::cli::DelimiterChoice;

pub fn run(file: PathBuf, delimiter: DelimiterChoice) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_input(&file)?;

    // No provider: describing never touches the network.
    let config = with_delimiter(AnalystConfig::default(), delimiter);
    let analyst = Analyst::from_config(config)?;
    let preview = analyst.preview(&display_name(&file), &bytes)?;

    println!(
        "{} {} ({} rows, {} columns, sha256 {})",
        "Summary of".cyan().bold(),
        preview.source.file.white(),
        preview.total_rows,
        preview.headers.len(),
        preview.source.short_hash().dimmed()
    );
    println!();
    println!("{}", preview.summary_text);

    Ok(())
}
