//! CSV loader with header normalization and optional delimiter detection.

use tracing::debug;

use super::table::RecordTable;
use crate::error::{AnalystError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b',', b'\t', b';', b'|'];

/// Loader configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: Some(b','),
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Loads uploaded CSV bytes into a [`RecordTable`].
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: ParserConfig,
}

impl Loader {
    /// Create a loader with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Load a table, returning `None` on any structural failure.
    ///
    /// The failure reason is logged at debug level and otherwise discarded.
    pub fn load(&self, bytes: &[u8]) -> Option<RecordTable> {
        match self.try_load(bytes) {
            Ok(table) => Some(table),
            Err(e) => {
                debug!(error = %e, "CSV upload rejected");
                None
            }
        }
    }

    /// Load a table, keeping the reason for failure.
    pub fn try_load(&self, bytes: &[u8]) -> Result<RecordTable> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AnalystError::Input("No columns to parse from file".to_string()));
        }

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes, self.config.quote),
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AnalystError::Input(e.to_string()))?
            .iter()
            .map(normalize_column_name)
            .collect();

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(AnalystError::Input("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result.map_err(|e| AnalystError::Input(e.to_string()))?;

            // Blank lines come through as a single empty field.
            if record.len() == 1 && record[0].trim().is_empty() && expected_cols > 1 {
                continue;
            }

            if record.len() > expected_cols {
                return Err(AnalystError::Input(format!(
                    "Expected {} fields in line {}, saw {}",
                    expected_cols,
                    row_idx + 2,
                    record.len()
                )));
            }

            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        debug!(
            rows = rows.len(),
            columns = expected_cols,
            delimiter = %(delimiter as char).escape_default(),
            "CSV loaded"
        );

        Ok(RecordTable::from_raw(headers, rows))
    }
}

/// Normalize a header: trim, lowercase, spaces to underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Rows sampled when sniffing the delimiter.
const SNIFF_ROWS: usize = 10;

/// Pick the candidate delimiter that splits the header into the most
/// columns while keeping sampled rows within that width.
///
/// Rows are read with the same quoting the loader uses, so a delimiter
/// inside a quoted field does not count. Rows wider than the header would
/// make the load fail, so such a candidate is rejected. Falls back to a
/// comma (a single-column file).
fn detect_delimiter(bytes: &[u8], quote: u8) -> u8 {
    let mut best = (b',', 0usize, 1usize);

    for &delim in DELIMITERS {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delim)
            .quote(quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let widths: Vec<usize> = reader
            .byte_records()
            .map_while(|r| r.ok())
            .filter(|r| !(r.len() == 1 && r[0].iter().all(u8::is_ascii_whitespace)))
            .take(SNIFF_ROWS)
            .map(|r| r.len())
            .collect();

        let Some((&width, rest)) = widths.split_first() else {
            continue;
        };
        if width < 2 || rest.iter().any(|&w| w > width) {
            continue;
        }

        let full_rows = rest.iter().filter(|&&w| w == width).count();
        if (full_rows, width) > (best.1, best.2) {
            best = (delim, full_rows, width);
        }
    }

    best.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ColumnKind, Value};

    #[test]
    fn test_normalizes_headers() {
        let data = b" Client ,Revenue,Expenses,Hours Worked\nA,100,40,5\nB,200,90,8\nC,50,70,2\n";
        let table = Loader::new().load(data).unwrap();

        assert_eq!(
            table.headers,
            vec!["client", "revenue", "expenses", "hours_worked"]
        );
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.kind_of("revenue"), Some(ColumnKind::Numeric));
        assert_eq!(table.kind_of("client"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn test_each_space_becomes_underscore() {
        assert_eq!(normalize_column_name("Hours  Worked"), "hours__worked");
        assert_eq!(normalize_column_name("\tNet Profit "), "net_profit");
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert!(Loader::new().load(b"").is_none());
        assert!(Loader::new().load(b"   \n\n").is_none());
    }

    #[test]
    fn test_invalid_utf8_is_absent() {
        let data = b"name,value\n\xff\xfe\xfd,1\n";
        assert!(Loader::new().load(data).is_none());
    }

    #[test]
    fn test_too_many_fields_is_absent() {
        let data = b"a,b\n1,2\n3,4,5\n";
        let err = Loader::new().try_load(data).unwrap_err();
        assert!(err.to_string().contains("Expected 2 fields"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = b"client,revenue,expenses\nA,100\n";
        let table = Loader::new().load(data).unwrap();
        assert_eq!(table.get_by_name(0, "expenses"), Some(&Value::Missing));
    }

    #[test]
    fn test_header_only_has_no_rows() {
        let table = Loader::new().load(b"client,revenue\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = Loader::new().load(b"\xEF\xBB\xBFClient,Revenue\nA,1\n").unwrap();
        assert_eq!(table.headers[0], "client");
    }

    #[test]
    fn test_max_rows() {
        let loader = Loader::with_config(ParserConfig {
            max_rows: Some(2),
            ..Default::default()
        });
        let table = loader.load(b"x\n1\n2\n3\n").unwrap();
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter(b"a,b,c\n1,2,3\n4,5,6", b'"'), b',');
        assert_eq!(detect_delimiter(b"a\tb\tc\n1\t2\t3", b'"'), b'\t');
        assert_eq!(detect_delimiter(b"a;b\n\"1;5\";2", b'"'), b';');
        assert_eq!(detect_delimiter(b"revenue\n10\n", b'"'), b',');
    }

    #[test]
    fn test_detect_delimiter_rejects_overflowing_rows() {
        // thousands separators make comma-split rows wider than the header
        let data = b"client,region;amount\nAcme,East;1,200,000\nGlobex,West;950,000\n";
        assert_eq!(detect_delimiter(data, b'"'), b';');
    }

    #[test]
    fn test_detect_delimiter_uses_configured_quote() {
        let data = b"client;note\n'A;B';x\n'C;D';y\n";
        assert_eq!(detect_delimiter(data, b'\''), b';');
    }

    #[test]
    fn test_auto_detect_semicolon_file() {
        let loader = Loader::with_config(ParserConfig {
            delimiter: None,
            ..Default::default()
        });
        let table = loader.load(b"Client;Revenue\nA;10\nB;20\n").unwrap();
        assert_eq!(table.headers, vec!["client", "revenue"]);
        assert_eq!(table.get(1, 1), Some(&Value::Number(20.0)));
    }
}
