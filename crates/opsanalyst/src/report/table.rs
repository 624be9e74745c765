//! Key metrics table for the exported report.

use serde::{Deserialize, Serialize};

use super::metrics::DerivedMetrics;

/// Column titles of the metrics table.
pub const METRICS_HEADER: [&str; 5] = ["client", "revenue", "expenses", "profit", "margin"];

/// Largest number of decimal places rendered.
pub const MAX_PRECISION: usize = 10;

/// Rendered metrics table: one header row plus one row per record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl MetricsTable {
    /// Build the table, rounding numbers to `precision` decimal places
    /// (at most [`MAX_PRECISION`]).
    pub fn build(metrics: &[DerivedMetrics], precision: usize) -> Self {
        let precision = precision.min(MAX_PRECISION);
        let rows = metrics
            .iter()
            .map(|m| {
                vec![
                    m.client.clone(),
                    format!("{:.*}", precision, m.revenue),
                    format!("{:.*}", precision, m.expenses),
                    format!("{:.*}", precision, m.profit),
                    m.margin
                        .map(|v| format!("{:.*}", precision, v))
                        .unwrap_or_else(|| "n/a".to_string()),
                ]
            })
            .collect();

        Self {
            header: METRICS_HEADER.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    /// Header row followed by the data rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &Vec<String>> {
        std::iter::once(&self.header).chain(self.rows.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_records_three_rows() {
        let metrics = vec![
            DerivedMetrics::new("A", 1000.0, 333.333, None),
            DerivedMetrics::new("B", 0.0, 10.0, None),
        ];
        let table = MetricsTable::build(&metrics, 2);

        assert_eq!(table.all_rows().count(), 3);
        assert_eq!(table.header, METRICS_HEADER.to_vec());
        assert_eq!(table.rows[0], vec!["A", "1000.00", "333.33", "666.67", "66.67"]);
        assert_eq!(table.rows[1][4], "n/a");
    }

    #[test]
    fn test_precision_is_capped() {
        let metrics = vec![DerivedMetrics::new("A", 1.5, 0.5, None)];
        let table = MetricsTable::build(&metrics, usize::MAX);

        assert_eq!(table.rows[0][1], "1.5000000000");
        assert_eq!(table.rows[0][1].len(), 2 + MAX_PRECISION);
    }

    #[test]
    fn test_precision_zero() {
        let table = MetricsTable::build(&[DerivedMetrics::new("A", 10.4, 2.0, None)], 0);
        assert_eq!(table.rows[0][1], "10");
        assert_eq!(table.rows[0][3], "8");
    }
}
