//! In-memory record table built from an uploaded CSV.

use serde::{Deserialize, Serialize};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Numeric cell (only in numeric columns).
    Number(f64),
    /// Text cell, kept exactly as it appeared in the file.
    Text(String),
    /// Empty or NA-like cell.
    Missing,
}

impl Value {
    /// Numeric value, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text value, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Render the value for previews and tables.
    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Missing => String::new(),
        }
    }
}

/// Format a number without a trailing `.0` for whole values.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Column classification decided at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing cell is a number.
    Numeric,
    /// At least one non-missing cell is not a number.
    Categorical,
}

impl ColumnKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

/// Represents a loaded CSV: normalized headers and typed rows.
///
/// Row count and column set are fixed once the table is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTable {
    /// Normalized column names, in file order.
    pub headers: Vec<String>,
    /// Per-column classification.
    pub kinds: Vec<ColumnKind>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Value>>,
}

impl RecordTable {
    /// Build a table from normalized headers and raw string rows.
    ///
    /// Rows must already be padded to the header width.
    pub fn from_raw(headers: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let mut kinds = Vec::with_capacity(width);
        let mut columns: Vec<Vec<Value>> = Vec::with_capacity(width);

        for col in 0..width {
            let cells: Vec<&str> = raw_rows
                .iter()
                .map(|row| row.get(col).map(|s| s.as_str()).unwrap_or(""))
                .collect();

            let numeric = cells
                .iter()
                .filter(|c| !Self::is_null_value(c))
                .all(|c| parse_number(c).is_some());

            let values = cells
                .iter()
                .map(|c| {
                    if Self::is_null_value(c) {
                        Value::Missing
                    } else if numeric {
                        parse_number(c).map(Value::Number).unwrap_or(Value::Missing)
                    } else {
                        Value::Text(c.to_string())
                    }
                })
                .collect();

            kinds.push(if numeric {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            });
            columns.push(values);
        }

        let rows = (0..raw_rows.len())
            .map(|r| columns.iter().map(|col| col[r].clone()).collect())
            .collect();

        Self {
            headers,
            kinds,
            rows,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether a column with this name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Kind of the named column.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.column_index(name).map(|i| self.kinds[i])
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by column name.
    pub fn get_by_name(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.column_index(name)?;
        self.get(row, col)
    }

    /// First `n` rows rendered as strings, for previews.
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .take(n)
            .map(|row| row.iter().map(Value::display).collect())
            .collect()
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("#n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("<na>")
    }
}

/// Parse a cell as a number.
fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    // Digit-free words other than "inf" are labels, not numbers.
    if trimmed.chars().any(|c| c.is_ascii_digit()) || trimmed.to_ascii_lowercase().ends_with("inf") {
        trimmed.parse::<f64>().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_column_kinds() {
        let table = RecordTable::from_raw(
            vec!["client".into(), "revenue".into(), "mixed".into()],
            raw(&[&["A", "100", "5"], &["B", "", "x"], &["C", "250.5", "7"]]),
        );

        assert_eq!(table.kinds, vec![
            ColumnKind::Categorical,
            ColumnKind::Numeric,
            ColumnKind::Categorical
        ]);
        assert_eq!(table.get(0, 1), Some(&Value::Number(100.0)));
        assert_eq!(table.get(1, 1), Some(&Value::Missing));
        // numbers in a categorical column stay text
        assert_eq!(table.get(0, 2), Some(&Value::Text("5".to_string())));
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        let table = RecordTable::from_raw(vec!["notes".into()], raw(&[&[""], &["NA"]]));
        assert_eq!(table.kinds, vec![ColumnKind::Numeric]);
        assert!(table.column_values(0).all(Value::is_missing));
    }

    #[test]
    fn test_is_null_value() {
        assert!(RecordTable::is_null_value(""));
        assert!(RecordTable::is_null_value("NA"));
        assert!(RecordTable::is_null_value("n/a"));
        assert!(RecordTable::is_null_value("NaN"));
        assert!(RecordTable::is_null_value("null"));
        assert!(RecordTable::is_null_value("<NA>"));
        assert!(!RecordTable::is_null_value("value"));
        assert!(!RecordTable::is_null_value("0"));
        assert!(!RecordTable::is_null_value("-"));
    }

    #[test]
    fn test_parse_number_rejects_words() {
        assert_eq!(parse_number("12"), Some(12.0));
        assert_eq!(parse_number(" -3.5 "), Some(-3.5));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("infinity"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Number(1200.0).display(), "1200");
        assert_eq!(Value::Number(12.5).display(), "12.5");
        assert_eq!(Value::Text("Acme".into()).display(), "Acme");
        assert_eq!(Value::Missing.display(), "");
    }
}
