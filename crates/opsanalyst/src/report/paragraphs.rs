//! Grouping of flattened analysis lines into body paragraphs.

/// Maximum number of two-line paragraphs before the remainder is merged.
pub const MAX_PAIRED_PARAGRAPHS: usize = 6;

/// Group cleaned lines into paragraphs.
///
/// Consecutive non-empty lines are joined in pairs. After
/// [`MAX_PAIRED_PARAGRAPHS`] pairs, every remaining line goes into one
/// final paragraph.
pub fn build_paragraphs(lines: &[String]) -> Vec<String> {
    let lines: Vec<&str> = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let paired = lines.len().min(MAX_PAIRED_PARAGRAPHS * 2);
    let mut paragraphs: Vec<String> = lines[..paired].chunks(2).map(|c| c.join(" ")).collect();

    if paired < lines.len() {
        paragraphs.push(lines[paired..].join(" "));
    }

    paragraphs
}
