//! Interactive HTML view of an analysis report.
//!
//! The output is a single self-contained document with inline CSS and SVG
//! charts, so it works offline and can be saved next to the PDF export.
//! [`render_fragment`] returns just the report body for the web UI.

use std::fmt::Write;

use once_cell::sync::Lazy;
use regex::Regex;

use super::analysis::AnalysisReport;
use super::metrics::{ProfitBreakdown, ScatterSeries};

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

const BAR_WIDTH: f64 = 640.0;
const BAR_HEIGHT: f64 = 280.0;
const SCATTER_WIDTH: f64 = 320.0;
const SCATTER_HEIGHT: f64 = 240.0;
const PAD: f64 = 40.0;

/// Render a complete HTML document for a report.
pub fn render_report_html(report: &AnalysisReport) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI Operations Analyst - {file}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
        {body}
    </div>
</body>
</html>"#,
        file = html_escape(&report.source.file),
        css = inline_css(),
        body = render_fragment(report),
    )
}

/// Render the report body without the surrounding document.
pub fn render_fragment(report: &AnalysisReport) -> String {
    let mut out = String::new();
    out.push_str(&render_header(report));
    out.push_str(&card(
        "Data Preview",
        &render_preview_table(&report.headers, &report.preview),
    ));
    out.push_str(&render_charts(report));
    out.push_str(&card(
        "Executive Summary",
        &render_bullets(&report.executive_summary),
    ));
    out.push_str(&card("Detailed Insights", &markdown_to_html(&report.analysis)));
    out.push_str(
        r#"<footer class="muted">Generated by AI. Verify figures before acting on them.</footer>"#,
    );
    out
}

/// Render a preview table from headers and string rows.
pub fn render_preview_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut html = String::from("<div class=\"table-wrap\"><table>\n<thead><tr>");
    for h in headers {
        let _ = write!(html, "<th>{}</th>", html_escape(h));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", html_escape(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody></table></div>");
    html
}

/// Convert normalized analysis Markdown into HTML.
///
/// Handles headings, `-`/`*`/`•` bullets, numbered items, paragraphs and
/// bold. Everything else is escaped and shown as text.
pub fn markdown_to_html(text: &str) -> String {
    let mut html = String::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut open_list: Option<&'static str> = None;

    let flush_paragraph = |html: &mut String, paragraph: &mut Vec<String>| {
        if !paragraph.is_empty() {
            let _ = writeln!(html, "<p>{}</p>", paragraph.join(" "));
            paragraph.clear();
        }
    };
    let close_list = |html: &mut String, open_list: &mut Option<&'static str>| {
        if let Some(tag) = open_list.take() {
            let _ = writeln!(html, "</{}>", tag);
        }
    };

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            flush_paragraph(&mut html, &mut paragraph);
            continue;
        }

        if let Some((level, title)) = heading(line) {
            flush_paragraph(&mut html, &mut paragraph);
            close_list(&mut html, &mut open_list);
            let tag = (level + 1).min(6);
            let _ = writeln!(html, "<h{tag}>{}</h{tag}>", inline(title));
        } else if let Some((tag, item)) = list_item(line) {
            flush_paragraph(&mut html, &mut paragraph);
            if open_list != Some(tag) {
                close_list(&mut html, &mut open_list);
                let _ = writeln!(html, "<{}>", tag);
                open_list = Some(tag);
            }
            let _ = writeln!(html, "<li>{}</li>", inline(item));
        } else {
            close_list(&mut html, &mut open_list);
            paragraph.push(inline(line));
        }
    }
    flush_paragraph(&mut html, &mut paragraph);
    close_list(&mut html, &mut open_list);
    html
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if (1..=6).contains(&level) {
        line[level..].strip_prefix(' ').map(|t| (level, t.trim()))
    } else {
        None
    }
}

fn list_item(line: &str) -> Option<(&'static str, &str)> {
    for marker in ["- ", "* ", "\u{2022} "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(("ul", rest.trim()));
        }
    }
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(item) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(("ol", item.trim()));
        }
    }
    None
}

/// Escape text and render `**bold**`.
fn inline(text: &str) -> String {
    BOLD.replace_all(&html_escape(text), "<strong>$1</strong>")
        .into_owned()
}

fn render_header(report: &AnalysisReport) -> String {
    format!(
        r#"<header class="card">
    <h1>AI Operations Analyst</h1>
    <p class="muted">Turn messy business data into clear profit decisions.</p>
    <div class="meta">
        <span>File: <b>{file}</b> ({rows} rows, {cols} columns)</span>
        <span>Model: <b>{model}</b></span>
        <span>Generated: {generated}</span>
    </div>
</header>
"#,
        file = html_escape(&report.source.file),
        rows = report.source.row_count,
        cols = report.source.column_count,
        model = html_escape(report.model.as_str()),
        generated = report.generated_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

fn card(title: &str, body: &str) -> String {
    format!(
        "<section class=\"card\">\n<h2>{}</h2>\n{}\n</section>\n",
        html_escape(title),
        body
    )
}

fn render_bullets(items: &[String]) -> String {
    if items.is_empty() {
        return "<p class=\"muted\">No summary points were returned.</p>".to_string();
    }
    let mut html = String::from("<ul>\n");
    for item in items {
        let _ = writeln!(html, "<li>{}</li>", inline(item));
    }
    html.push_str("</ul>");
    html
}

fn render_charts(report: &AnalysisReport) -> String {
    let mut charts = String::new();
    if let Some(breakdown) = &report.profit_breakdown {
        charts.push_str(&bar_chart_svg(breakdown));
    }
    for series in report.scatter_series() {
        charts.push_str(&scatter_svg(&series));
    }
    if charts.is_empty() {
        return String::new();
    }
    card("Charts", &format!("<div class=\"charts\">{}</div>", charts))
}

// =============================================================================
// SVG CHARTS
// =============================================================================

/// Map `value` from `[lo, hi]` onto `[out_lo, out_hi]`.
fn scale(value: f64, lo: f64, hi: f64, out_lo: f64, out_hi: f64) -> f64 {
    if (hi - lo).abs() < f64::EPSILON {
        return (out_lo + out_hi) / 2.0;
    }
    out_lo + (value - lo) / (hi - lo) * (out_hi - out_lo)
}

/// Bar chart of profit per group, with a zero baseline.
pub fn bar_chart_svg(breakdown: &ProfitBreakdown) -> String {
    let values: Vec<f64> = breakdown.totals.values().copied().collect();
    let lo = values.iter().copied().fold(0.0_f64, f64::min);
    let hi = values.iter().copied().fold(0.0_f64, f64::max);
    let plot_w = BAR_WIDTH - 2.0 * PAD;
    let slot = plot_w / values.len().max(1) as f64;
    let bar_w = (slot * 0.7).max(2.0);
    let y = |v: f64| scale(v, lo, hi, BAR_HEIGHT - PAD, PAD);
    let baseline = y(0.0);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' class='chart' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}' role='img'>",
        BAR_WIDTH, BAR_HEIGHT, BAR_WIDTH, BAR_HEIGHT
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='20' class='chart-title'>Profit by {}</text>",
        PAD,
        html_escape(&breakdown.key)
    );
    let _ = writeln!(
        svg,
        "  <line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' class='axis'/>",
        PAD,
        baseline,
        BAR_WIDTH - PAD,
        baseline
    );

    for (i, (label, value)) in breakdown.totals.iter().enumerate() {
        let x = PAD + i as f64 * slot + (slot - bar_w) / 2.0;
        let top = y(*value).min(baseline);
        let height = (y(*value) - baseline).abs();
        let class = if *value < 0.0 { "bar negative" } else { "bar" };
        let _ = writeln!(
            svg,
            "  <rect x='{:.1}' y='{:.1}' width='{:.1}' height='{:.1}' class='{}'><title>{}: {:.2}</title></rect>",
            x,
            top,
            bar_w,
            height,
            class,
            html_escape(label),
            value
        );
        let short: String = label.chars().take(12).collect();
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' class='tick' text-anchor='middle'>{}</text>",
            x + bar_w / 2.0,
            BAR_HEIGHT - PAD + 16.0,
            html_escape(&short)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Scatter chart of one series.
pub fn scatter_svg(series: &ScatterSeries) -> String {
    let (xs, ys): (Vec<f64>, Vec<f64>) = series.points.iter().copied().unzip();
    let bounds = |v: &[f64]| {
        let lo = v.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lo, hi)
    };
    let (x_lo, x_hi) = bounds(&xs);
    let (y_lo, y_hi) = bounds(&ys);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' class='chart' width='{:.0}' height='{:.0}' viewBox='0 0 {:.0} {:.0}' role='img'>",
        SCATTER_WIDTH, SCATTER_HEIGHT, SCATTER_WIDTH, SCATTER_HEIGHT
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='20' class='chart-title'>{} vs {}</text>",
        PAD,
        html_escape(&series.y_label),
        html_escape(&series.x_label)
    );
    let _ = writeln!(
        svg,
        "  <polyline points='{px:.1},{top:.1} {px:.1},{bottom:.1} {right:.1},{bottom:.1}' class='axis' fill='none'/>",
        px = PAD,
        top = PAD,
        bottom = SCATTER_HEIGHT - PAD,
        right = SCATTER_WIDTH - PAD
    );

    for (x, y) in &series.points {
        let cx = scale(*x, x_lo, x_hi, PAD, SCATTER_WIDTH - PAD);
        let cy = scale(*y, y_lo, y_hi, SCATTER_HEIGHT - PAD, PAD);
        let _ = writeln!(
            svg,
            "  <circle cx='{:.1}' cy='{:.1}' r='4' class='point'><title>{:.2}, {:.2}</title></circle>",
            cx, cy, x, y
        );
    }

    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='{:.1}' class='tick' text-anchor='middle'>{}</text>",
        SCATTER_WIDTH / 2.0,
        SCATTER_HEIGHT - 8.0,
        html_escape(&series.x_label)
    );
    svg.push_str("</svg>\n");
    svg
}

/// Escape text for safe embedding in HTML.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Inline CSS styles
pub fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; margin: 0; padding: 0; }
body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    line-height: 1.6;
    color: #e6edf3;
    background: #0e1117;
}
.container { max-width: 1200px; margin: 0 auto; padding: 2rem; }
.card {
    background: #161b22;
    padding: 20px;
    border-radius: 14px;
    margin-bottom: 20px;
    border: 1px solid #30363d;
}
h1, h2, h3, h4 { color: #ffffff; margin: 0.75rem 0 0.5rem; }
p { margin: 0.5rem 0; }
ul, ol { margin: 0.5rem 0 0.5rem 1.5rem; }
.muted { color: #9ba3af; font-size: 14px; }
.meta { display: flex; gap: 1.5rem; flex-wrap: wrap; color: #9ba3af; font-size: 14px; }
.table-wrap { overflow-x: auto; }
table { border-collapse: collapse; width: 100%; font-size: 14px; }
th, td { padding: 6px 10px; border-bottom: 1px solid #30363d; text-align: left; white-space: nowrap; }
th { color: #9ba3af; font-weight: 600; }
.charts { display: flex; flex-wrap: wrap; gap: 1rem; }
.chart { background: #0e1117; border-radius: 8px; }
.chart-title { fill: #e6edf3; font-size: 13px; font-weight: 600; }
.tick { fill: #9ba3af; font-size: 11px; }
.axis { stroke: #30363d; stroke-width: 1; }
.bar { fill: #3fb950; }
.bar.negative { fill: #f85149; }
.point { fill: #58a6ff; fill-opacity: 0.8; }
footer { text-align: center; margin-top: 1rem; }
"#
}
