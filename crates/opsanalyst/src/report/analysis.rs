//! The report bundle produced by one analysis run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::SourceMetadata;
use crate::llm::ModelId;
use crate::normalize;
use crate::stats::SummaryDocument;

use super::metrics::{scatter_series, DerivedMetrics, ProfitBreakdown, ScatterSeries};
use super::paragraphs::build_paragraphs;
use super::table::MetricsTable;

/// Everything needed to render the interactive view or the export.
///
/// Built fresh for every request and never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Uploaded file details.
    pub source: SourceMetadata,
    /// Normalized column names.
    pub headers: Vec<String>,
    /// First rows of the table, rendered as strings.
    pub preview: Vec<Vec<String>>,
    /// Statistical summary sent to the model.
    pub summary: SummaryDocument,
    /// Per-record derived metrics.
    pub metrics: Vec<DerivedMetrics>,
    /// Profit grouped by a categorical key, when metrics exist.
    pub profit_breakdown: Option<ProfitBreakdown>,
    /// Model that produced the analysis.
    pub model: ModelId,
    /// Analysis text exactly as returned.
    pub analysis_raw: String,
    /// Analysis text after normalization.
    pub analysis: String,
    /// Executive summary bullets (at most five).
    pub executive_summary: Vec<String>,
    /// Decimal places for rendered figures.
    pub precision: usize,
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Metrics table at the report's precision.
    pub fn metrics_table(&self) -> MetricsTable {
        MetricsTable::build(&self.metrics, self.precision)
    }

    /// Body paragraphs for paginated output.
    pub fn body_paragraphs(&self) -> Vec<String> {
        build_paragraphs(&normalize::flatten(&self.analysis))
    }

    /// Scatter chart data.
    pub fn scatter_series(&self) -> Vec<ScatterSeries> {
        scatter_series(&self.metrics)
    }
}
