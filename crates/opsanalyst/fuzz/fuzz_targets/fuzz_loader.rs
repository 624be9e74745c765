//! Fuzz target for the CSV loader.
//!
//! This fuzzer tests that the loader:
//! 1. Never panics on malformed input
//! 2. Handles every delimiter under auto-detection
//! 3. Keeps every row at the header width

#![no_main]

use libfuzzer_sys::fuzz_target;
use opsanalyst::{Loader, ParserConfig};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let _ = Loader::new().load(data);

    let auto = Loader::with_config(ParserConfig {
        delimiter: None,
        ..ParserConfig::default()
    });
    if let Some(table) = auto.load(data) {
        for row in &table.rows {
            assert_eq!(row.len(), table.column_count());
        }
    }
});
