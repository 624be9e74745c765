//! Descriptive statistics per column, rendered as a fixed-width table.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{ColumnKind, RecordTable, Value};

// =============================================================================
// STREAMING STATISTICS
// =============================================================================
// Welford's online algorithm for mean and variance in a single pass.

/// Streaming mean/variance accumulator using Welford's algorithm.
#[derive(Debug, Clone)]
struct StreamingStats {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
}

impl StreamingStats {
    fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Sample standard deviation (n - 1); NaN below two values.
    fn std(&self) -> f64 {
        if self.count < 2 {
            f64::NAN
        } else {
            (self.m2 / (self.count - 1) as f64).sqrt()
        }
    }
}

/// Linear-interpolated percentile of sorted values (`p` in 0..=1).
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let rank = p * (n - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = rank.ceil() as usize;
            let frac = rank - lower as f64;
            sorted[lower] + (sorted[upper] - sorted[lower]) * frac
        }
    }
}

// =============================================================================
// SUMMARY TYPES
// =============================================================================

/// Statistics for a numeric column.
///
/// Undefined statistics are `NaN`, serialized as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    #[serde(deserialize_with = "nan_if_null")]
    pub mean: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub std: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub min: f64,
    /// First quartile (25th percentile).
    #[serde(deserialize_with = "nan_if_null")]
    pub q1: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub median: f64,
    /// Third quartile (75th percentile).
    #[serde(deserialize_with = "nan_if_null")]
    pub q3: f64,
    #[serde(deserialize_with = "nan_if_null")]
    pub max: f64,
}

fn nan_if_null<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Statistics for a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    /// Number of distinct non-missing values.
    pub unique: usize,
    /// Most frequent value (first seen wins ties).
    pub top: Option<String>,
    /// Occurrences of `top`.
    pub freq: usize,
}

/// Kind-specific statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStats {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Summary of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Non-missing values.
    pub count: usize,
    /// Missing values.
    pub missing: usize,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

/// Descriptive statistics for every column of a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    /// Per-column summaries in table order.
    pub columns: IndexMap<String, ColumnSummary>,
}

impl SummaryDocument {
    /// Get a column summary by name.
    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Render as a fixed-width table: one column per table column, one row
    /// per statistic, `NaN` where a statistic does not apply.
    pub fn to_text(&self) -> String {
        if self.columns.is_empty() {
            return "Empty table: no columns".to_string();
        }

        let has_categorical = self
            .columns
            .values()
            .any(|c| matches!(c.stats, ColumnStats::Categorical(_)));
        let has_numeric = self
            .columns
            .values()
            .any(|c| matches!(c.stats, ColumnStats::Numeric(_)));
        let has_missing = self.columns.values().any(|c| c.missing > 0);

        let mut labels: Vec<&str> = vec!["count"];
        if has_missing {
            labels.push("missing");
        }
        if has_categorical {
            labels.extend(["unique", "top", "freq"]);
        }
        if has_numeric {
            labels.extend(["mean", "std", "min", "25%", "50%", "75%", "max"]);
        }

        // Build cells column by column.
        let mut columns: Vec<Vec<String>> = Vec::with_capacity(self.columns.len());
        for (name, summary) in &self.columns {
            let mut cells = vec![name.clone()];
            cells.extend(labels.iter().map(|label| summary.cell(label)));
            columns.push(cells);
        }

        let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);
        let widths: Vec<usize> = columns
            .iter()
            .map(|cells| cells.iter().map(|c| c.chars().count()).max().unwrap_or(0))
            .collect();

        let mut lines = Vec::with_capacity(labels.len() + 1);
        for row in 0..=labels.len() {
            let label = if row == 0 { "" } else { labels[row - 1] };
            let mut line = format!("{:<width$}", label, width = label_width);
            for (cells, width) in columns.iter().zip(&widths) {
                line.push_str("  ");
                line.push_str(&format!("{:>width$}", cells[row], width = *width));
            }
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }
}

impl fmt::Display for SummaryDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl ColumnSummary {
    /// Text for one statistic row of the rendered table.
    fn cell(&self, label: &str) -> String {
        match (&self.stats, label) {
            (ColumnStats::Numeric(_), "count") => format!("{:.6}", self.count as f64),
            (ColumnStats::Categorical(_), "count") => self.count.to_string(),
            (_, "missing") => self.missing.to_string(),
            (ColumnStats::Categorical(c), "unique") => c.unique.to_string(),
            (ColumnStats::Categorical(c), "top") => {
                c.top.clone().unwrap_or_else(|| "NaN".to_string())
            }
            (ColumnStats::Categorical(c), "freq") => {
                if c.top.is_some() {
                    c.freq.to_string()
                } else {
                    "NaN".to_string()
                }
            }
            (ColumnStats::Numeric(n), stat) => {
                let value = match stat {
                    "mean" => n.mean,
                    "std" => n.std,
                    "min" => n.min,
                    "25%" => n.q1,
                    "50%" => n.median,
                    "75%" => n.q3,
                    "max" => n.max,
                    _ => f64::NAN,
                };
                format_stat(value)
            }
            _ => "NaN".to_string(),
        }
    }
}

/// Six-decimal rendering with `NaN`/`inf` spelled out.
fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.6}", value)
    }
}

// =============================================================================
// SUMMARIZER
// =============================================================================

/// Computes a [`SummaryDocument`] for a record table.
#[derive(Debug, Clone, Default)]
pub struct Summarizer;

impl Summarizer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize every column of the table.
    pub fn summarize(&self, table: &RecordTable) -> SummaryDocument {
        let mut columns = IndexMap::with_capacity(table.column_count());

        for (index, name) in table.headers.iter().enumerate() {
            let values: Vec<&Value> = table.column_values(index).collect();
            let summary = match table.kinds[index] {
                ColumnKind::Numeric => summarize_numeric(&values),
                ColumnKind::Categorical => summarize_categorical(&values),
            };
            // Duplicate names keep the first column's summary.
            columns.entry(name.clone()).or_insert(summary);
        }

        SummaryDocument { columns }
    }
}

fn summarize_numeric(values: &[&Value]) -> ColumnSummary {
    let mut stats = StreamingStats::new();
    let mut sorted: Vec<f64> = Vec::with_capacity(values.len());

    for value in values {
        if let Some(n) = value.as_number() {
            stats.add(n);
            sorted.push(n);
        }
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let numeric = if stats.count == 0 {
        NumericSummary {
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q1: f64::NAN,
            median: f64::NAN,
            q3: f64::NAN,
            max: f64::NAN,
        }
    } else {
        NumericSummary {
            mean: stats.mean,
            std: stats.std(),
            min: stats.min,
            q1: percentile(&sorted, 0.25),
            median: percentile(&sorted, 0.5),
            q3: percentile(&sorted, 0.75),
            max: stats.max,
        }
    };

    ColumnSummary {
        count: stats.count,
        missing: values.len() - stats.count,
        stats: ColumnStats::Numeric(numeric),
    }
}

fn summarize_categorical(values: &[&Value]) -> ColumnSummary {
    let mut value_counts: IndexMap<&str, usize> = IndexMap::new();
    let mut missing = 0;

    for value in values {
        match value.as_text() {
            Some(text) => *value_counts.entry(text).or_insert(0) += 1,
            None => missing += 1,
        }
    }

    // max_by_key returns the last maximum; fold keeps the first.
    let top = value_counts.iter().fold(None, |best: Option<(&str, usize)>, (&v, &c)| {
        match best {
            Some((_, bc)) if bc >= c => best,
            _ => Some((v, c)),
        }
    });

    ColumnSummary {
        count: values.len() - missing,
        missing,
        stats: ColumnStats::Categorical(CategoricalSummary {
            unique: value_counts.len(),
            top: top.map(|(v, _)| v.to_string()),
            freq: top.map(|(_, c)| c).unwrap_or(0),
        }),
    }
}
