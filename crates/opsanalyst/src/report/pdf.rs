//! Paginated PDF export.
//!
//! Pages are laid out top to bottom with a running cursor. Anything that
//! does not fit moves to a fresh page, and the footer is stamped on every
//! page once the page count is known. Text uses the standard Helvetica
//! fonts with WinAnsi encoding, so no font files are embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use tracing::debug;

use crate::error::Result;

use super::analysis::AnalysisReport;
use super::metrics::ProfitBreakdown;
use super::summary::MAX_SUMMARY_BULLETS;
use super::table::MetricsTable;

/// File name offered for download.
pub const EXPORT_FILE_NAME: &str = "business_report.pdf";
/// MIME type of the export.
pub const EXPORT_MIME: &str = "application/pdf";

/// Disclaimer printed at the bottom of every page.
pub const FOOTER_DISCLAIMER: &str =
    "Generated by AI from uploaded data. Review figures before making business decisions.";

const A4: (f32, f32) = (595.0, 842.0);

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

const BODY_SIZE: f32 = 10.5;
const BODY_LEADING: f32 = 14.0;
const TABLE_SIZE: f32 = 9.0;
const TABLE_ROW: f32 = 16.0;
const CHART_HEIGHT: f32 = 170.0;

/// Renders an [`AnalysisReport`] into PDF bytes.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    page_size: (f32, f32),
    margin: f32,
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self {
            page_size: A4,
            margin: 56.0,
        }
    }
}

impl PdfExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the report to an in-memory PDF.
    pub fn render(&self, report: &AnalysisReport) -> Result<Vec<u8>> {
        let pages = self.layout(report);
        let page_count = pages.len();

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular_id,
                BOLD => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for operations in pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let (width, height) = self.page_size;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![Object::Integer(0), Object::Integer(0), real(width), real(height)],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
        debug!(pages = page_count, bytes = bytes.len(), "Rendered PDF export");
        Ok(bytes)
    }

    /// Lay out every section and return the content operations per page.
    fn layout(&self, report: &AnalysisReport) -> Vec<Vec<Operation>> {
        let mut w = PageWriter::new(self.page_size, self.margin);

        // Title block
        w.text_line(BOLD, 20.0, "AI Operations Analyst Report", 28.0);
        w.set_color(0.4);
        w.text_line(
            REGULAR,
            10.0,
            &format!(
                "Source: {} ({} rows, {} columns, {})",
                report.source.file,
                report.source.row_count,
                report.source.column_count,
                report.source.short_hash()
            ),
            14.0,
        );
        w.text_line(REGULAR, 10.0, &format!("Model: {}", report.model), 14.0);
        w.text_line(
            REGULAR,
            10.0,
            &format!("Generated: {}", report.generated_at.format("%Y-%m-%d %H:%M UTC")),
            14.0,
        );
        w.set_color(0.0);
        w.rule();

        // Executive summary
        w.heading("Executive Summary");
        if report.executive_summary.is_empty() {
            w.paragraph("No summary points were returned.");
        }
        for bullet in report.executive_summary.iter().take(MAX_SUMMARY_BULLETS) {
            w.bullet(bullet);
        }
        w.gap(8.0);

        // Key metrics
        w.heading("Key Metrics");
        let table = report.metrics_table();
        if table.is_empty() {
            w.paragraph("No metrics available. The data needs numeric revenue and expenses columns.");
        } else {
            w.table(&table);
        }
        w.gap(8.0);

        if let Some(breakdown) = &report.profit_breakdown {
            // heading and chart stay on one page
            w.ensure_space(CHART_HEIGHT + 72.0);
            w.heading(&format!("Profit by {}", breakdown.key));
            w.bar_chart(breakdown);
            w.gap(8.0);
        }

        // Detailed analysis
        w.heading("Detailed Analysis");
        let paragraphs = report.body_paragraphs();
        if paragraphs.is_empty() {
            w.paragraph("The model returned no analysis text.");
        }
        for p in &paragraphs {
            w.paragraph(p);
            w.gap(6.0);
        }

        w.finish()
    }
}

fn font_dictionary(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn real(v: f32) -> Object {
    Object::Real(v.into())
}

// =============================================================================
// PAGE WRITER
// =============================================================================

/// Cursor-based page builder.
struct PageWriter {
    page_size: (f32, f32),
    margin: f32,
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: f32,
}

impl PageWriter {
    fn new(page_size: (f32, f32), margin: f32) -> Self {
        Self {
            page_size,
            margin,
            pages: Vec::new(),
            current: Vec::new(),
            y: page_size.1 - margin,
        }
    }

    fn content_width(&self) -> f32 {
        self.page_size.0 - 2.0 * self.margin
    }

    /// Lowest y the body may reach; the footer sits below it.
    fn bottom(&self) -> f32 {
        self.margin + 10.0
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.y = self.page_size.1 - self.margin;
    }

    /// Start a new page unless `height` points still fit.
    fn ensure_space(&mut self, height: f32) {
        if self.y - height < self.bottom() && !self.current.is_empty() {
            self.new_page();
        }
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn set_color(&mut self, gray: f32) {
        self.current
            .push(Operation::new("rg", vec![real(gray), real(gray), real(gray)]));
    }

    fn draw_text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// One line of text at the left margin, advancing by `leading`.
    fn text_line(&mut self, font: &str, size: f32, text: &str, leading: f32) {
        self.ensure_space(leading);
        self.y -= leading;
        let x = self.margin;
        self.draw_text(font, size, x, self.y, text);
    }

    fn heading(&mut self, title: &str) {
        // keep a heading together with at least two body lines
        self.ensure_space(24.0 + 2.0 * BODY_LEADING);
        self.gap(6.0);
        self.text_line(BOLD, 14.0, title, 18.0);
        self.gap(4.0);
    }

    fn paragraph(&mut self, text: &str) {
        let width = self.content_width();
        for line in wrap_text(text, BODY_SIZE, width) {
            self.text_line(REGULAR, BODY_SIZE, &line, BODY_LEADING);
        }
    }

    fn bullet(&mut self, text: &str) {
        let indent = 14.0;
        let width = self.content_width() - indent;
        for (i, line) in wrap_text(text, BODY_SIZE, width).into_iter().enumerate() {
            self.ensure_space(BODY_LEADING);
            self.y -= BODY_LEADING;
            if i == 0 {
                let x = self.margin + 2.0;
                self.draw_text(REGULAR, BODY_SIZE, x, self.y, "\u{2022}");
            }
            let x = self.margin + indent;
            self.draw_text(REGULAR, BODY_SIZE, x, self.y, &line);
        }
    }

    fn rule(&mut self) {
        self.gap(8.0);
        let (x1, x2, y) = (self.margin, self.page_size.0 - self.margin, self.y);
        self.current.extend([
            Operation::new("w", vec![real(0.5)]),
            Operation::new("m", vec![real(x1), real(y)]),
            Operation::new("l", vec![real(x2), real(y)]),
            Operation::new("S", vec![]),
        ]);
        self.gap(4.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rgb: (f32, f32, f32)) {
        self.current.extend([
            Operation::new("rg", vec![real(rgb.0), real(rgb.1), real(rgb.2)]),
            Operation::new("re", vec![real(x), real(y), real(w), real(h)]),
            Operation::new("f", vec![]),
            Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
        ]);
    }

    fn column_positions(&self) -> Vec<f32> {
        let first = 150.0;
        let rest = (self.content_width() - first) / 4.0;
        let mut xs = vec![self.margin];
        for i in 0..4 {
            xs.push(self.margin + first + rest * i as f32);
        }
        xs
    }

    fn table_row(&mut self, cells: &[String], header: bool) {
        self.y -= TABLE_ROW;
        if header {
            let (x, w) = (self.margin, self.content_width());
            self.fill_rect(x, self.y - 4.0, w, TABLE_ROW, (0.88, 0.9, 0.93));
        }
        let font = if header { BOLD } else { REGULAR };
        let xs = self.column_positions();
        for (cell, x) in cells.iter().zip(xs) {
            let clipped = truncate_to_width(cell, TABLE_SIZE, 140.0);
            self.draw_text(font, TABLE_SIZE, x + 4.0, self.y, &clipped);
        }
    }

    /// Metrics table; the header row repeats after a page break.
    fn table(&mut self, table: &MetricsTable) {
        self.ensure_space(TABLE_ROW * 2.0);
        self.table_row(&table.header, true);
        for row in &table.rows {
            if self.y - TABLE_ROW < self.bottom() {
                self.new_page();
                self.table_row(&table.header, true);
            }
            self.table_row(row, false);
        }
    }

    /// Vertical bars around a zero baseline.
    fn bar_chart(&mut self, breakdown: &ProfitBreakdown) {
        self.ensure_space(CHART_HEIGHT + 20.0);
        let top = self.y;
        let bottom = top - CHART_HEIGHT;
        let values: Vec<f32> = breakdown.totals.values().map(|v| *v as f32).collect();
        let lo = values.iter().copied().fold(0.0_f32, f32::min);
        let hi = values.iter().copied().fold(0.0_f32, f32::max);
        let span = if hi - lo > 0.0 { hi - lo } else { 1.0 };
        let to_y = |v: f32| bottom + 14.0 + (v - lo) / span * (CHART_HEIGHT - 24.0);
        let baseline = to_y(0.0);

        let slot = self.content_width() / values.len().max(1) as f32;
        let bar_w = (slot * 0.7).max(1.0);

        for (i, (label, value)) in breakdown.totals.iter().enumerate() {
            let x = self.margin + i as f32 * slot + (slot - bar_w) / 2.0;
            let y_val = to_y(*value as f32);
            let (y0, h) = if y_val >= baseline {
                (baseline, y_val - baseline)
            } else {
                (y_val, baseline - y_val)
            };
            let color = if *value < 0.0 {
                (0.85, 0.3, 0.3)
            } else {
                (0.25, 0.6, 0.35)
            };
            self.fill_rect(x, y0, bar_w, h.max(0.5), color);
            let clipped = truncate_to_width(label, 7.0, slot - 2.0);
            self.draw_text(REGULAR, 7.0, x, bottom, &clipped);
        }

        let (x1, x2) = (self.margin, self.margin + self.content_width());
        self.current.extend([
            Operation::new("w", vec![real(0.5)]),
            Operation::new("m", vec![real(x1), real(baseline)]),
            Operation::new("l", vec![real(x2), real(baseline)]),
            Operation::new("S", vec![]),
        ]);
        self.y = bottom - 6.0;
    }

    /// Close the last page and stamp footers.
    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        let total = self.pages.len();
        let (margin, width) = (self.margin, self.page_size.0);
        let mut pages = std::mem::take(&mut self.pages);
        for (i, page) in pages.iter_mut().enumerate() {
            let footer_y = margin / 2.0;
            let number = format!("Page {} of {}", i + 1, total);
            let number_x = width - margin - text_width(&number, 8.0);
            page.push(Operation::new("rg", vec![real(0.45), real(0.45), real(0.45)]));
            for (x, text) in [(margin, FOOTER_DISCLAIMER.to_string()), (number_x, number)] {
                page.extend([
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![REGULAR.into(), real(8.0)]),
                    Operation::new("Td", vec![real(x), real(footer_y)]),
                    Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(&text))]),
                    Operation::new("ET", vec![]),
                ]);
            }
        }
        pages
    }
}

// =============================================================================
// TEXT METRICS
// =============================================================================

/// Approximate Helvetica advance width of a character, in 1/1000 em.
fn char_width(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | '.' | ',' | ';' | ':' | '\'' | '|' | '!' => 250.0,
        ' ' | 'f' | 't' | 'I' | '(' | ')' | '[' | ']' | '/' => 300.0,
        'r' => 333.0,
        'm' | 'w' | 'M' | 'W' | '%' | '@' => 850.0,
        'A'..='Z' => 680.0,
        '0'..='9' => 556.0,
        _ => 540.0,
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_width).sum::<f32>() * size / 1000.0
}

/// Greedy word wrap to a maximum line width in points.
///
/// A single word wider than the line is placed on its own line.
pub(crate) fn wrap_text(text: &str, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && text_width(&candidate, size) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate_to_width(text: &str, size: f32, max_width: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }
    let mut out = String::new();
    for c in text.chars() {
        if text_width(&out, size) + char_width(c) * size / 1000.0 + text_width("...", size) > max_width {
            break;
        }
        out.push(c);
    }
    out.push_str("...");
    out
}

/// Encode text for a WinAnsi (cp1252) Type1 font.
///
/// Characters outside the encoding become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
