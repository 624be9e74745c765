//! Opsanalyst: AI operations analyst for small-business CSV data.
//!
//! Upload revenue, expense or project records and get back a plain-language
//! report on profit leaks, inefficiencies and anomalies.
//!
//! # Pipeline
//!
//! - **Load**: CSV bytes into a [`RecordTable`] with normalized column names
//! - **Summarize**: descriptive statistics per column ([`SummaryDocument`])
//! - **Generate**: one prompt to a hosted model through [`LlmProvider`]
//! - **Normalize**: repair formatting defects in the returned Markdown
//! - **Report**: interactive HTML view and a paginated PDF export
//!
//! # Example
//!
//! ```no_run
//! use opsanalyst::{Analyst, AnalystConfig, PdfExporter};
//!
//! let config = AnalystConfig::from_env().unwrap();
//! let analyst = Analyst::from_config(config).unwrap();
//!
//! let bytes = std::fs::read("clients.csv").unwrap();
//! let report = analyst.analyze("clients.csv", &bytes).unwrap();
//!
//! for bullet in &report.executive_summary {
//!     println!("- {}", bullet);
//! }
//! let pdf = PdfExporter::new().render(&report).unwrap();
//! std::fs::write("business_report.pdf", pdf).unwrap();
//! ```

pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod normalize;
pub mod report;
pub mod stats;

mod analyst;

pub use crate::analyst::{Analyst, DataPreview};
pub use config::{AnalystConfig, Credential, SummaryStrategy};
pub use error::{AnalystError, ErrorKind, Result};
pub use input::{Loader, ParserConfig, RecordTable, SourceMetadata, Value};
pub use llm::{GeminiProvider, LlmProvider, MockProvider, ModelId};
pub use normalize::Normalizer;
pub use report::{AnalysisReport, DerivedMetrics, MetricsTable, PdfExporter};
pub use stats::{Summarizer, SummaryDocument};
