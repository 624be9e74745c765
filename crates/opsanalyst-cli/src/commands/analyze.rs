//! Analyze command - run the pipeline on a CSV file and export the report.

use std::path::PathBuf;

use colored::Colorize;
use opsanalyst::report::{render_report_html, EXPORT_FILE_NAME};
use opsanalyst::{Analyst, AnalystConfig, DataPreview, MockProvider, ModelId, PdfExporter};

use super::{display_name, read_input, with_delimiter};
use crate::cli::{DelimiterChoice, SummaryChoice};

/// HTML report file name.
pub const HTML_FILE_NAME: &str = "report.html";

pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub model: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub pdf: bool,
    pub html: bool,
    pub summary: SummaryChoice,
    pub precision: usize,
    pub delimiter: DelimiterChoice,
    pub mock_llm: bool,
    pub verbose: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = read_input(&args.file)?;
    let name = display_name(&args.file);

    let mut config = AnalystConfig::from_env()?
        .with_summary_strategy(args.summary.into())
        .with_precision(args.precision);
    config = with_delimiter(config, args.delimiter);
    if let Some(model) = &args.model {
        config = config.with_model(ModelId::parse(model)?);
    }

    let analyst = if args.mock_llm {
        Analyst::with_provider(config, MockProvider::new().offline())
    } else {
        Analyst::from_config(config)?
    };

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        args.file.display().to_string().white()
    );

    let preview = analyst.preview(&name, &bytes)?;
    print_preview(&preview);

    if args.verbose {
        println!("{}", "Statistical summary:".yellow().bold());
        println!("{}", preview.summary_text);
        println!();
    }

    println!(
        "{} {} {}",
        "Generating insights with".cyan(),
        analyst.config().model.to_string().white().bold(),
        analyst
            .provider_name()
            .map(|p| format!("({})", p))
            .unwrap_or_default()
            .dimmed()
    );

    let report = analyst.analyze(&name, &bytes)?;

    println!();
    println!("{}", "Executive Summary".green().bold());
    for bullet in &report.executive_summary {
        println!("  {} {}", "•".green(), bullet);
    }

    println!();
    println!("{}", "Detailed Insights".green().bold());
    println!("{}", report.analysis);
    println!();

    let out_dir = args.output_dir.unwrap_or_else(|| PathBuf::from("."));
    if (args.pdf || args.html) && !out_dir.exists() {
        std::fs::create_dir_all(&out_dir)?;
    }

    if args.pdf {
        let path = out_dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, PdfExporter::new().render(&report)?)?;
        println!(
            "{} {}",
            "Saved PDF to".green().bold(),
            path.display().to_string().white()
        );
    }

    if args.html {
        let path = out_dir.join(HTML_FILE_NAME);
        std::fs::write(&path, render_report_html(&report))?;
        println!(
            "{} {}",
            "Saved HTML to".green().bold(),
            path.display().to_string().white()
        );
    }

    if !args.pdf && !args.html {
        println!(
            "Run with {} or {} to export the report",
            "--pdf".cyan().bold(),
            "--html".cyan().bold()
        );
    }

    Ok(())
}

/// Print the first rows as an aligned table.
fn print_preview(preview: &DataPreview) {
    let widths: Vec<usize> = preview
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            preview
                .rows
                .iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
                .min(24)
        })
        .collect();

    println!();
    println!(
        "{} ({} rows, {} columns)",
        "Data Preview".yellow().bold(),
        preview.total_rows,
        preview.headers.len()
    );

    let header: Vec<String> = preview
        .headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:w$}", clip(h, *w), w = w))
        .collect();
    println!("  {}", header.join("  ").bold());

    for row in &preview.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:w$}", clip(c, *w), w = w))
            .collect();
        println!("  {}", cells.join("  "));
    }

    if preview.total_rows > preview.rows.len() {
        println!(
            "  {}",
            format!("... {} more rows", preview.total_rows - preview.rows.len()).dimmed()
        );
    }
    println!();
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clip() {
        assert_eq!(clip("revenue", 10), "revenue");
        assert_eq!(clip("hours_worked", 6), "hours…");
    }

    #[test]
    fn test_mock_run_writes_reports() {
        let dir = tempfile::tempdir().expect("tempdir");
        let csv = dir.path().join("ops.csv");
        let mut f = std::fs::File::create(&csv).expect("create");
        f.write_all(b"Client,Revenue,Expenses\nAcme,100,40\nGlobex,50,60\n")
            .expect("write");

        let out = dir.path().join("out");
        run(AnalyzeArgs {
            file: csv,
            model: None,
            output_dir: Some(out.clone()),
            pdf: true,
            html: true,
            summary: SummaryChoice::Extract,
            precision: 2,
            delimiter: DelimiterChoice::Char(b','),
            mock_llm: true,
            verbose: false,
        })
        .expect("analyze");

        let pdf = std::fs::read(out.join(EXPORT_FILE_NAME)).expect("pdf");
        assert!(pdf.starts_with(b"%PDF"));
        let html = std::fs::read_to_string(out.join(HTML_FILE_NAME)).expect("html");
        assert!(html.contains("Executive Summary"));
    }

    #[test]
    fn test_missing_file() {
        let err = run(AnalyzeArgs {
            file: PathBuf::from("/nonexistent/ops.csv"),
            model: None,
            output_dir: None,
            pdf: false,
            html: false,
            summary: SummaryChoice::Model,
            precision: 2,
            delimiter: DelimiterChoice::Auto,
            mock_llm: true,
            verbose: false,
        })
        .unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
