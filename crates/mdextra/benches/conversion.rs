//! Benchmarks for conversion with Markdown Extra constructs.

#![allow(clippy::format_push_string)] // Benchmark setup code, performance not critical

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mdextra::{ExtraOptions, Highlighter, MarkdownExtra};
use mdextra_renderer::Converter;

/// Generate markdown with one table, code block and definition list per section.
fn generate_markdown(sections: usize, rows_per_table: usize) -> String {
    let mut md = String::with_capacity(sections * (300 + rows_per_table * 40));
    md.push_str("# Document Title {#top}\n\n");

    for i in 0..sections {
        md.push_str(&format!("## Section {i} {{.section}}\n\n"));
        md.push_str("Intro paragraph with **bold** and *italic* text.\n\n");

        md.push_str("| Name | Value | Notes |\n|:-----|:-----:|------:|\n");
        for j in 0..rows_per_table {
            md.push_str(&format!("| item {j} | `{j}` | *note* {i} |\n"));
        }
        md.push('\n');

        md.push_str(&format!("```rust\nfn section_{i}() -> usize {{ {i} }}\n```\n\n"));
        md.push_str(&format!("Term {i}\n:   Definition with [a link](http://example.com/{i}).\n\n"));
    }
    md
}

fn extra_converter(sanitize: bool) -> Converter {
    let mut converter = if sanitize {
        Converter::sanitizing()
    } else {
        Converter::new()
    };
    MarkdownExtra::init(
        &mut converter,
        ExtraOptions::default()
            .with_highlighter(Highlighter::Prettify)
            .with_sanitize(sanitize),
    );
    converter
}

fn bench_baseline_vs_extra(c: &mut Criterion) {
    let markdown = generate_markdown(10, 5);
    let mut baseline = Converter::new();
    let mut extra = extra_converter(false);

    let mut group = c.benchmark_group("baseline_vs_extra");
    group.bench_function("baseline", |b| {
        b.iter(|| baseline.make_html(&markdown));
    });
    group.bench_function("extra", |b| {
        b.iter(|| extra.make_html(&markdown));
    });
    group.finish();
}

fn bench_sanitized(c: &mut Criterion) {
    let markdown = generate_markdown(10, 5);
    let mut converter = extra_converter(true);

    c.bench_function("extra_sanitized_10_sections", |b| {
        b.iter(|| converter.make_html(&markdown));
    });
}

fn bench_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("extra_by_size");

    for sections in [1, 10, 50] {
        let markdown = generate_markdown(sections, 10);
        let mut converter = extra_converter(true);

        group.throughput(Throughput::Bytes(markdown.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(sections),
            &markdown,
            |b, markdown| {
                b.iter(|| converter.make_html(markdown));
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_baseline_vs_extra,
    bench_sanitized,
    bench_varying_sizes
);
criterion_main!(benches);
