//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use opsanalyst::SummaryStrategy;

/// Opsanalyst: plain-language operations reports from business CSV data
#[derive(Parser)]
#[command(name = "opsanalyst")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a CSV file and write the report
    Analyze {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Model to use (see `opsanalyst models`)
        #[arg(short, long, env = "OPSANALYST_MODEL")]
        model: Option<String>,

        /// Directory for exported reports (default: current directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Write business_report.pdf
        #[arg(long)]
        pdf: bool,

        /// Write report.html
        #[arg(long)]
        html: bool,

        /// How the executive summary is produced
        #[arg(long, default_value = "model")]
        summary: SummaryChoice,

        /// Decimal places in the metrics table
        #[arg(long, default_value = "2")]
        precision: usize,

        /// Field delimiter: a single character, or "auto" to detect
        #[arg(short, long, default_value = ",")]
        delimiter: DelimiterChoice,

        /// Use canned model output instead of calling the API
        #[arg(long)]
        mock_llm: bool,
    },

    /// Print the statistical summary of a CSV file (no network)
    Describe {
        /// Path to the CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Field delimiter: a single character, or "auto" to detect
        #[arg(short, long, default_value = ",")]
        delimiter: DelimiterChoice,
    },

    /// List the models that can be selected
    Models,

    /// Open the interactive report view in the browser
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "8501")]
        port: u16,

        /// Don't automatically open browser
        #[arg(long)]
        no_open: bool,

        /// Use canned model output instead of calling the API
        #[arg(long)]
        mock_llm: bool,
    },
}

/// Executive summary strategy choice
#[derive(Clone, Copy, Debug, Default)]
pub enum SummaryChoice {
    /// Ask the model to condense its own analysis
    #[default]
    Model,
    /// Pull bullets out of the analysis locally
    Extract,
}

impl std::str::FromStr for SummaryChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "model" | "llm" => Ok(SummaryChoice::Model),
            "extract" | "local" => Ok(SummaryChoice::Extract),
            _ => Err(format!("Unknown summary strategy: {}. Use model or extract.", s)),
        }
    }
}

impl std::fmt::Display for SummaryChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryChoice::Model => write!(f, "model"),
            SummaryChoice::Extract => write!(f, "extract"),
        }
    }
}

impl From<SummaryChoice> for SummaryStrategy {
    fn from(choice: SummaryChoice) -> Self {
        match choice {
            SummaryChoice::Model => SummaryStrategy::Model,
            SummaryChoice::Extract => SummaryStrategy::Extract,
        }
    }
}

/// Delimiter choice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DelimiterChoice {
    /// Detect from the first line
    Auto,
    /// Fixed single-byte delimiter
    Char(u8),
}

impl DelimiterChoice {
    /// Delimiter for the loader (None = auto-detect).
    pub fn as_option(self) -> Option<u8> {
        match self {
            DelimiterChoice::Auto => None,
            DelimiterChoice::Char(c) => Some(c),
        }
    }
}

impl std::str::FromStr for DelimiterChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(DelimiterChoice::Auto),
            "\\t" | "tab" => Ok(DelimiterChoice::Char(b'\t')),
            _ if s.len() == 1 && s.is_ascii() => Ok(DelimiterChoice::Char(s.as_bytes()[0])),
            _ => Err(format!(
                "Invalid delimiter: {}. Use a single ASCII character, tab, or auto.",
                s
            )),
        }
    }
}

impl std::fmt::Display for DelimiterChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DelimiterChoice::Auto => write!(f, "auto"),
            DelimiterChoice::Char(b'\t') => write!(f, "tab"),
            DelimiterChoice::Char(c) => write!(f, "{}", *c as char),
        }
    }
}
