//! Fuzz target for the text normalizer.
//!
//! Normalization must never panic and must leave no runs of blank lines.

#![no_main]

use libfuzzer_sys::fuzz_target;
use opsanalyst::normalize::{flatten, normalize};

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }

    let text = String::from_utf8_lossy(data);
    let once = normalize(&text);
    let _ = flatten(&text);
    assert!(!once.contains("\n\n\n"));
});
