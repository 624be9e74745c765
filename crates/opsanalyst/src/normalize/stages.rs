//! Individual text repair stages.

use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Bold marker corruptions seen in model output, longest first.
const BOLD_VARIANTS: &[&str] = &[
    "\u{00E2}\u{02C6}\u{2014}\u{00E2}\u{02C6}\u{2014}", // cp1252 reading of U+2217 U+2217
    "\u{2217}\u{2217}",                                 // asterisk operator pair
    "\u{FF0A}\u{FF0A}",                                 // fullwidth asterisk pair
    r"\*\*",                                            // escaped markdown bold
];

/// A single text repair step.
///
/// Stages are pure: the same input always yields the same output and no
/// stage can fail.
pub trait TextStage: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Apply the stage.
    fn apply(&self, text: &str) -> String;
}

/// Replaces corrupted bold markers with `**`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepairBoldMarkers;

impl TextStage for RepairBoldMarkers {
    fn name(&self) -> &'static str {
        "repair_bold_markers"
    }

    /// Repeats until nothing changes: replacing `\*\*` can expose a new
    /// escaped pair, as in `\*\\*\*`. Every replacement shortens the text.
    fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = BOLD_VARIANTS
                .iter()
                .fold(current.clone(), |acc, variant| acc.replace(variant, "**"));
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

/// Collapses horizontal whitespace runs and strips trailing whitespace.
///
/// Line breaks are kept. `\r\n` and lone `\r` become `\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseWhitespace;

impl TextStage for CollapseWhitespace {
    fn name(&self) -> &'static str {
        "collapse_whitespace"
    }

    fn apply(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n").replace('\r', "\n");
        let collapsed = HORIZONTAL_WS.replace_all(&unified, " ");
        collapsed
            .split('\n')
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Puts headings and bullets on their own lines, separated by a blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeparateBlocks;

impl TextStage for SeparateBlocks {
    fn name(&self) -> &'static str {
        "separate_blocks"
    }

    fn apply(&self, text: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        for line in text.split('\n') {
            for piece in split_inline_headings(line) {
                let fixed = space_after_marker(&piece);
                let previous_blank = lines.last().map(|l| l.trim().is_empty());
                if is_block_start(&fixed) && previous_blank == Some(false) {
                    lines.push(String::new());
                }
                lines.push(fixed);
            }
        }
        lines.join("\n")
    }
}

/// Collapses three or more consecutive newlines into one blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollapseBlankLines;

impl TextStage for CollapseBlankLines {
    fn name(&self) -> &'static str {
        "collapse_blank_lines"
    }

    fn apply(&self, text: &str) -> String {
        EXCESS_NEWLINES.replace_all(text, "\n\n").into_owned()
    }
}

// =============================================================================
// LINE HELPERS
// =============================================================================

/// Length of the `#` run at the start of `s`.
fn hash_run(s: &str) -> usize {
    s.bytes().take_while(|&b| b == b'#').count()
}

/// Split a line wherever a `##`..`######` heading follows other text.
fn split_inline_headings(line: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut rest = line;

    'outer: loop {
        let bytes = rest.as_bytes();
        let mut i = 1;
        while i < bytes.len() {
            if bytes[i] == b'#' && bytes[i - 1] != b'#' {
                let run = hash_run(&rest[i..]);
                let after = rest[i + run..].trim_start_matches(' ');
                let starts_word = after
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_alphabetic() || c == '*');
                let before = rest[..i].trim_end();
                if (2..=6).contains(&run) && starts_word && !before.trim_start().is_empty() {
                    pieces.push(before.to_string());
                    rest = &rest[i..];
                    continue 'outer;
                }
                i += run;
            } else {
                i += 1;
            }
        }
        pieces.push(rest.to_string());
        return pieces;
    }
}

/// Ensure a space follows a leading heading run or `-` bullet marker.
fn space_after_marker(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];

    if body.starts_with('#') {
        let run = hash_run(body);
        let next = body[run..].chars().next();
        if run <= 6 && next.is_some_and(|c| c != ' ' && !c.is_ascii_digit()) {
            return format!("{}{} {}", indent, &body[..run], &body[run..]);
        }
    } else if let Some(after) = body.strip_prefix('-') {
        let next = after.chars().next();
        if next.is_some_and(|c| c != ' ' && c != '-' && c != '.' && !c.is_ascii_digit()) {
            return format!("{}- {}", indent, after);
        }
    }
    line.to_string()
}

/// Whether a line opens a heading or bullet block.
pub(crate) fn is_block_start(line: &str) -> bool {
    let body = line.trim_start();
    let run = hash_run(body);
    if (1..=6).contains(&run) {
        return body[run..].starts_with(' ');
    }
    body.starts_with("- ") || body.starts_with("* ") || body.starts_with("\u{2022} ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repair_bold_variants() {
        let stage = RepairBoldMarkers;
        assert_eq!(stage.apply("\u{2217}\u{2217}Revenue\u{2217}\u{2217}"), "**Revenue**");
        assert_eq!(stage.apply("\u{FF0A}\u{FF0A}x\u{FF0A}\u{FF0A}"), "**x**");
        assert_eq!(stage.apply(r"\*\*x\*\*"), "**x**");
        assert_eq!(
            stage.apply("\u{00E2}\u{02C6}\u{2014}\u{00E2}\u{02C6}\u{2014}Cost"),
            "**Cost"
        );
        assert_eq!(stage.apply("plain * text"), "plain * text");
    }

    #[test]
    fn test_repair_bold_exposed_escape() {
        let stage = RepairBoldMarkers;
        let once = stage.apply(r"\*\\*\*");
        assert_eq!(once, "***");
        assert_eq!(stage.apply(&once), once);
    }

    #[test]
    fn test_collapse_whitespace() {
        let stage = CollapseWhitespace;
        assert_eq!(stage.apply("a  \t b\u{00A0}\u{00A0}c   \r\nd  "), "a b c\nd");
        assert_eq!(stage.apply("keep\n\n\nnewlines"), "keep\n\n\nnewlines");
    }

    #[test]
    fn test_separate_inline_heading() {
        let stage = SeparateBlocks;
        assert_eq!(
            stage.apply("Overview text.## Profit Leaks"),
            "Overview text.\n\n## Profit Leaks"
        );
        assert_eq!(stage.apply("a ## b ## c"), "a\n\n## b\n\n## c");
    }

    #[test]
    fn test_marker_spacing() {
        let stage = SeparateBlocks;
        assert_eq!(stage.apply("##Profit"), "## Profit");
        assert_eq!(stage.apply("-Client A"), "- Client A");
        assert_eq!(stage.apply("-5% margin"), "-5% margin");
        assert_eq!(stage.apply("---"), "---");
        assert_eq!(stage.apply("#1 client"), "#1 client");
    }

    #[test]
    fn test_blank_line_before_blocks() {
        let stage = SeparateBlocks;
        assert_eq!(stage.apply("## A\ntext\n- b\n- c"), "## A\ntext\n\n- b\n\n- c");
        assert_eq!(stage.apply("text\n\n- b"), "text\n\n- b");
    }

    #[test]
    fn test_inline_hash_in_words_untouched() {
        let stage = SeparateBlocks;
        assert_eq!(stage.apply("Use C# daily"), "Use C# daily");
        assert_eq!(stage.apply("Ticket ##42 closed"), "Ticket ##42 closed");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(CollapseBlankLines.apply("a\n\n\n\nb\n\n\nc"), "a\n\nb\n\nc");
        assert_eq!(CollapseBlankLines.apply("a\n\nb"), "a\n\nb");
    }
}
