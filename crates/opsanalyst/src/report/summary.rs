//! Executive summary bullet extraction.

/// Maximum number of executive summary bullets.
pub const MAX_SUMMARY_BULLETS: usize = 5;

/// Pull up to `limit` bullet items out of Markdown text, in order.
///
/// Recognizes `-`, `*` and `•` markers and numbered `1.` / `1)` items.
/// Markers and bold are stripped. Nothing is invented when the text has
/// fewer bullets than `limit`.
pub fn extract_bullets(text: &str, limit: usize) -> Vec<String> {
    text.lines()
        .filter_map(bullet_body)
        .map(|body| body.replace("**", "").trim().to_string())
        .filter(|body| !body.is_empty())
        .take(limit)
        .collect()
}

/// The text after a bullet marker, if the line is a bullet.
fn bullet_body(line: &str) -> Option<&str> {
    let line = line.trim();

    for marker in ['-', '*', '\u{2022}'] {
        if let Some(rest) = line.strip_prefix(marker) {
            if rest.starts_with(char::is_whitespace) {
                return Some(rest.trim_start());
            }
        }
    }

    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        let rest = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')'))?;
        if rest.starts_with(char::is_whitespace) {
            return Some(rest.trim_start());
        }
    }

    None
}
