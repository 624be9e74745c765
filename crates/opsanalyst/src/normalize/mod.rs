//! Repair of formatting defects in generated Markdown.
//!
//! Model output sometimes arrives with corrupted bold markers, runs of
//! spaces, headings glued to the previous sentence, and stray blank lines.
//! [`Normalizer`] applies an ordered list of [`TextStage`]s to fix these.
//! Normalization never fails; a defect it cannot repair is left in place.

mod stages;

use tracing::debug;

use crate::llm::SECTION_NAMES;

pub use stages::{CollapseBlankLines, CollapseWhitespace, RepairBoldMarkers, SeparateBlocks, TextStage};

/// Ordered text repair pipeline.
pub struct Normalizer {
    stages: Vec<Box<dyn TextStage>>,
}

impl Normalizer {
    /// Create a normalizer with no stages. Only blank-line trimming applies.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard pipeline: bold repair, whitespace, block separation,
    /// blank line collapse.
    pub fn standard() -> Self {
        Self::new()
            .with_stage(RepairBoldMarkers)
            .with_stage(CollapseWhitespace)
            .with_stage(SeparateBlocks)
            .with_stage(CollapseBlankLines)
    }

    /// Append a stage.
    pub fn with_stage(mut self, stage: impl TextStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Names of the configured stages, in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage, then trim leading and trailing blank lines.
    pub fn normalize(&self, text: &str) -> String {
        let out = self
            .stages
            .iter()
            .fold(text.to_string(), |acc, stage| stage.apply(&acc));
        let trimmed = out.trim_matches('\n').to_string();
        debug!(
            input_chars = text.len(),
            output_chars = trimmed.len(),
            "Normalized text"
        );
        trimmed
    }

    /// Normalize, then reduce to plain content lines for paginated output.
    ///
    /// Heading, bold and bullet markers are removed. Empty lines and lines
    /// that are just one of the standard section titles are dropped.
    pub fn flatten(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .lines()
            .map(plain_line)
            .filter(|line| !line.is_empty())
            .filter(|line| {
                let lower = line.to_lowercase();
                !SECTION_NAMES.iter().any(|name| lower.starts_with(name))
            })
            .collect()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::standard()
    }
}

/// Normalize with the standard pipeline.
pub fn normalize(text: &str) -> String {
    Normalizer::standard().normalize(text)
}

/// Flatten with the standard pipeline.
pub fn flatten(text: &str) -> Vec<String> {
    Normalizer::standard().flatten(text)
}

/// Strip heading, bullet and bold markers from a single line.
pub(crate) fn plain_line(line: &str) -> String {
    let mut body = line.trim();
    body = body.trim_start_matches('#').trim_start();
    for marker in ["- ", "* ", "\u{2022} "] {
        if let Some(rest) = body.strip_prefix(marker) {
            body = rest;
            break;
        }
    }
    body.replace("**", "").trim().to_string()
}
