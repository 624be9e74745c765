//! Pipeline performance benchmarks.
//!
//! Measures loading, summarizing and normalizing, plus a full analysis run
//! against the mock provider so no network time is included.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use opsanalyst::normalize::normalize;
use opsanalyst::llm::MOCK_ANALYSIS;
use opsanalyst::{Analyst, AnalystConfig, Loader, MockProvider, PdfExporter, Summarizer};

/// Generate realistic client/project records.
fn generate_ops_data(rows: usize) -> String {
    let clients = ["Acme", "Globex", "Initech", "Umbrella", "Hooli"];
    let projects = ["Website", "Audit", "Migration", "Support"];

    let mut data = String::from("Client,Project,Revenue,Expenses,Hours Worked\n");
    for row in 0..rows {
        let revenue = 1000 + (row * 37) % 9000;
        let expenses = 500 + (row * 53) % 8000;
        // leave an occasional gap like real exports do
        let hours = if row % 40 == 0 {
            String::new()
        } else {
            format!("{}", 5 + row % 120)
        };
        data.push_str(&format!(
            "{},{},{},{},{}\n",
            clients[row % clients.len()],
            projects[row % projects.len()],
            revenue,
            expenses,
            hours
        ));
    }
    data
}

/// Model output with the usual formatting defects.
fn corrupted_analysis(sections: usize) -> String {
    (0..sections)
        .map(|i| {
            format!(
                "\u{2217}\u{2217}Point {}\u{2217}\u{2217} costs   rose.##Section {}\n-Client {}\n\n\n\n",
                i, i, i
            )
        })
        .collect()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_ops_data(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            b.iter(|| black_box(Loader::new().load(data.as_bytes())))
        });
    }

    group.finish();
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for rows in [100, 1_000, 10_000].iter() {
        let table = Loader::new()
            .load(generate_ops_data(*rows).as_bytes())
            .unwrap();
        group.bench_with_input(BenchmarkId::new("rows", rows), &table, |b, table| {
            b.iter(|| black_box(Summarizer::new().summarize(table).to_text()))
        });
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for sections in [5, 50, 500].iter() {
        let text = corrupted_analysis(*sections);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("sections", sections), &text, |b, text| {
            b.iter(|| black_box(normalize(text)))
        });
    }

    group.finish();
}

fn bench_full_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_analysis");
    let config = AnalystConfig::default().with_api_key("bench");

    for rows in [10, 100, 1_000].iter() {
        let data = generate_ops_data(*rows);
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let analyst = Analyst::with_provider(config.clone(), MockProvider::new());
            b.iter(|| black_box(analyst.analyze("bench.csv", data.as_bytes()).unwrap()))
        });
    }

    group.finish();
}

fn bench_pdf_export(c: &mut Criterion) {
    let analyst = Analyst::with_provider(
        AnalystConfig::default().with_api_key("bench"),
        MockProvider::new().with_response(MOCK_ANALYSIS.repeat(10)),
    );
    let report = analyst
        .analyze("bench.csv", generate_ops_data(200).as_bytes())
        .unwrap();

    c.bench_function("pdf_export_200_rows", |b| {
        b.iter(|| black_box(PdfExporter::new().render(&report).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_load,
    bench_summarize,
    bench_normalize,
    bench_full_analysis,
    bench_pdf_export,
);
criterion_main!(benches);
