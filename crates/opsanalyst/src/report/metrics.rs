//! Per-row profit and margin figures derived from the record table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::{ColumnKind, RecordTable, Value};

/// Column holding the client label.
pub const CLIENT_COLUMN: &str = "client";
/// Column holding revenue.
pub const REVENUE_COLUMN: &str = "revenue";
/// Column holding expenses.
pub const EXPENSES_COLUMN: &str = "expenses";
/// Column holding hours worked.
pub const HOURS_COLUMN: &str = "hours_worked";

/// Derived figures for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    /// Client label, or `Row N` when the table has no client value.
    pub client: String,
    pub revenue: f64,
    pub expenses: f64,
    pub hours_worked: Option<f64>,
    /// `revenue - expenses`.
    pub profit: f64,
    /// `profit / revenue * 100`; `None` when revenue is zero.
    pub margin: Option<f64>,
}

impl DerivedMetrics {
    /// Derive metrics from raw figures.
    pub fn new(client: impl Into<String>, revenue: f64, expenses: f64, hours_worked: Option<f64>) -> Self {
        let profit = revenue - expenses;
        let margin = if revenue == 0.0 {
            None
        } else {
            Some(profit / revenue * 100.0)
        };
        Self {
            client: client.into(),
            revenue,
            expenses,
            hours_worked,
            profit,
            margin,
        }
    }
}

/// Compute metrics for every row with numeric revenue and expenses.
///
/// Returns nothing when either column is absent.
pub fn compute_metrics(table: &RecordTable) -> Vec<DerivedMetrics> {
    let (Some(rev_idx), Some(exp_idx)) = (
        table.column_index(REVENUE_COLUMN),
        table.column_index(EXPENSES_COLUMN),
    ) else {
        return Vec::new();
    };
    let client_idx = table.column_index(CLIENT_COLUMN);
    let hours_idx = table.column_index(HOURS_COLUMN);

    table
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let revenue = row.get(rev_idx)?.as_number()?;
            let expenses = row.get(exp_idx)?.as_number()?;
            let hours = hours_idx.and_then(|h| row.get(h)).and_then(Value::as_number);
            let client = client_idx
                .and_then(|c| row.get(c))
                .filter(|v| !v.is_missing())
                .map(Value::display)
                .unwrap_or_else(|| format!("Row {}", i + 1));
            Some(DerivedMetrics::new(client, revenue, expenses, hours))
        })
        .collect()
}

/// Profit totals grouped by a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    /// Grouping column name.
    pub key: String,
    /// Total profit per group, in first-appearance order.
    pub totals: IndexMap<String, f64>,
}

/// Group profit by the `client` column, or the first categorical column.
///
/// Falls back to one group per record label when no categorical column
/// exists. Returns `None` when there are no metrics.
pub fn profit_by_key(table: &RecordTable) -> Option<ProfitBreakdown> {
    let rev_idx = table.column_index(REVENUE_COLUMN)?;
    let exp_idx = table.column_index(EXPENSES_COLUMN)?;

    let key_idx = table.column_index(CLIENT_COLUMN).or_else(|| {
        table
            .kinds
            .iter()
            .position(|k| *k == ColumnKind::Categorical)
    });

    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for (i, row) in table.rows.iter().enumerate() {
        let (Some(revenue), Some(expenses)) = (
            row.get(rev_idx).and_then(Value::as_number),
            row.get(exp_idx).and_then(Value::as_number),
        ) else {
            continue;
        };
        let label = match key_idx.and_then(|k| row.get(k)) {
            Some(v) if !v.is_missing() => v.display(),
            Some(_) => "(missing)".to_string(),
            None => format!("Row {}", i + 1),
        };
        *totals.entry(label).or_insert(0.0) += revenue - expenses;
    }

    if totals.is_empty() {
        return None;
    }

    let key = key_idx
        .map(|k| table.headers[k].clone())
        .unwrap_or_else(|| "row".to_string());
    Some(ProfitBreakdown { key, totals })
}

/// Points for a two-variable scatter chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

/// Revenue against expenses, plus hours against profit when hours exist.
pub fn scatter_series(metrics: &[DerivedMetrics]) -> Vec<ScatterSeries> {
    if metrics.is_empty() {
        return Vec::new();
    }

    let mut series = vec![ScatterSeries {
        x_label: REVENUE_COLUMN.to_string(),
        y_label: EXPENSES_COLUMN.to_string(),
        points: metrics.iter().map(|m| (m.revenue, m.expenses)).collect(),
    }];

    let hours: Vec<(f64, f64)> = metrics
        .iter()
        .filter_map(|m| m.hours_worked.map(|h| (h, m.profit)))
        .collect();
    if !hours.is_empty() {
        series.push(ScatterSeries {
            x_label: HOURS_COLUMN.to_string(),
            y_label: "profit".to_string(),
            points: hours,
        });
    }

    series
}
