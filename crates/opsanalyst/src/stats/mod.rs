//! Descriptive statistics over a record table.

mod summary;

pub use summary::{
    CategoricalSummary, ColumnStats, ColumnSummary, NumericSummary, Summarizer, SummaryDocument,
};
