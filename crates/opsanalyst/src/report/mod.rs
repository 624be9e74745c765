//! Report assembly and rendering.
//!
//! An [`AnalysisReport`] bundles the normalized analysis with derived
//! metrics. It renders two ways: a self-contained HTML view and a
//! paginated PDF export.

mod analysis;
pub mod html;
mod metrics;
mod paragraphs;
mod pdf;
mod summary;
mod table;

pub use analysis::AnalysisReport;
pub use html::{render_fragment, render_preview_table, render_report_html};
pub use metrics::{
    compute_metrics, profit_by_key, scatter_series, DerivedMetrics, ProfitBreakdown,
    ScatterSeries, CLIENT_COLUMN, EXPENSES_COLUMN, HOURS_COLUMN, REVENUE_COLUMN,
};
pub use paragraphs::{build_paragraphs, MAX_PAIRED_PARAGRAPHS};
pub use pdf::{PdfExporter, EXPORT_FILE_NAME, EXPORT_MIME, FOOTER_DISCLAIMER};
pub use summary::{extract_bullets, MAX_SUMMARY_BULLETS};
pub use table::{MetricsTable, MAX_PRECISION, METRICS_HEADER};
