//! Criterion benchmarks for the INI codec and section resolution.
//!
//! Run with:
//! ```bash
//! cargo bench --package serverconf-core --bench ini_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serverconf_core::{parse, resolve, serialize, IniDocument, SettingsSchema};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn make_document(sections: usize, keys_per_section: usize) -> IniDocument {
    let mut doc = IniDocument::new();
    for s in 0..sections {
        let name = format!("Section{s}");
        for k in 0..keys_per_section {
            doc.set(&name, &format!("key_{k}"), format!("value {s}-{k}"));
        }
    }
    doc
}

fn make_schema() -> SettingsSchema {
    SettingsSchema::new()
        .string("host", "127.0.0.1")
        .and_then(|s| s.integer("port", 3080))
        .and_then(|s| s.boolean("auto_start", true))
        .and_then(|s| s.float("timeout", 1.5))
        .expect("valid schema")
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for sections in [1usize, 10, 50] {
        let text = serialize(&make_document(sections, 20));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &text, |b, text| {
            b.iter(|| parse(black_box(text)).expect("parse"))
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for sections in [1usize, 10, 50] {
        let doc = make_document(sections, 20);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &doc, |b, doc| {
            b.iter(|| serialize(black_box(doc)))
        });
    }
    group.finish();
}

fn bench_resolve(c: &mut Criterion) {
    let schema = make_schema();
    let doc = parse("[Server]\nhost = 0.0.0.0\nport = 8000\nauto_start = no\n").expect("parse");
    c.bench_function("resolve_server_section", |b| {
        b.iter(|| resolve("Server", black_box(&schema), doc.section("Server")).expect("resolve"))
    });
}

criterion_group!(benches, bench_parse, bench_serialize, bench_resolve);
criterion_main!(benches);
