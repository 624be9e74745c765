//! Upload parsing into a normalized record table.

mod loader;
mod source;
mod table;

pub use loader::{normalize_column_name, Loader, ParserConfig};
pub use source::{content_hash, SourceMetadata};
pub use table::{ColumnKind, RecordTable, Value};
