//! Extraction throughput benchmarks
//!
//! Run with: cargo bench -p riskscan-classifier

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use riskscan_classifier::{parse_classification, EvidenceExtractor, DEFAULT_MAX_CHARS};

fn synthetic_page(paragraphs: usize) -> String {
    let mut html =
        String::from("<html><head><title>Bench</title></head><body><nav><p>Home</p></nav>");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p id=\"p{i}\">Paragraph {i} describes a <a href=\"/wiki/AI\">machine learning</a> system[{i}] \
             that processes personal data &amp; images to make automated decisions.</p>\n"
        ));
    }
    html.push_str("</body></html>");
    html
}

/// Benchmark evidence extraction across page sizes
fn benchmark_extractor(c: &mut Criterion) {
    let extractor = EvidenceExtractor::new().expect("Failed to create extractor");

    let mut group = c.benchmark_group("Evidence_Extractor");
    group.sample_size(50);

    for paragraphs in [5usize, 50, 500] {
        let html = synthetic_page(paragraphs);
        group.bench_with_input(BenchmarkId::new("extract", paragraphs), &html, |b, html| {
            b.iter(|| extractor.extract(black_box(html), DEFAULT_MAX_CHARS));
        });
    }

    group.finish();
}

/// Benchmark parsing of model output
fn benchmark_contract_parse(c: &mut Criterion) {
    let content = r#"{"uses_ai": true, "risk_level": "high", "top_risks": ["privacy","bias","security"]}"#;

    c.bench_function("parse_classification", |b| {
        b.iter(|| parse_classification(black_box(content)).unwrap());
    });
}

criterion_group!(benches, benchmark_extractor, benchmark_contract_parse);
criterion_main!(benches);
