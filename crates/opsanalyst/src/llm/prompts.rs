//! Prompt templates for the analysis requests.

use crate::stats::SummaryDocument;

/// Fixed instruction block sent ahead of every request.
pub const SYSTEM_PROMPT: &str = r#"You are a senior AI Operations Analyst for SMBs.

STRICT OUTPUT RULES:
- Use clean Markdown
- Use proper bullet points
- Use normal numbers (e.g. 2775, 8000)
- Do NOT insert special characters, symbols, or broken formatting
- Do NOT space out words or numbers
- Do NOT use unicode math symbols
- Use plain English only

TASK:
Analyze business data and:
- Identify profit leaks
- Find inefficiencies
- Highlight anomalies
- Give clear, actionable recommendations

FORMAT:
- Use exactly these headings: ## Analysis Overview, ## Profit Leaks, ## Inefficiencies, ## Anomalies, ## Actionable Recommendations
- Bullet points with -
- Short paragraphs"#;

/// Instruction line for the executive-summary request. Plain bullets only.
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a senior AI Operations Analyst for SMBs. Reply in plain English with Markdown bullets only.";

/// Section headings the model is asked to produce, lowercased.
pub const SECTION_NAMES: &[&str] = &[
    "analysis overview",
    "profit leaks",
    "inefficiencies",
    "anomalies",
    "actionable",
];

/// Build the detailed-analysis prompt for a table summary.
pub fn compose_analysis_prompt(summary: &SummaryDocument) -> String {
    format!(
        r#"{SYSTEM_PROMPT}

Here is a summary of business data:

{}

Tasks:
1. Identify profit leaks
2. Identify inefficient clients or projects
3. Detect unusual costs or anomalies
4. Suggest 5 very specific actions to improve profitability

Explain everything in simple business language."#,
        summary.to_text()
    )
}

/// Build the executive-summary prompt from a finished analysis.
///
/// The input is the detailed analysis text, not the data summary, so the
/// result condenses what was already said.
pub fn compose_summary_prompt(analysis: &str) -> String {
    format!(
        r#"{SUMMARY_SYSTEM_PROMPT}

From the analysis below, extract ONLY 5 bullets:
- Each bullet must be one clear business insight
- Focus on money, risk, or efficiency
- Start every bullet with "- "
- No headings and no extra text

Analysis:
{}"#,
        analysis.trim()
    )
}
