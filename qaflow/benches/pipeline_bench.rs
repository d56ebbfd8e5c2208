//! Benchmarks for pipeline execution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use qaflow::core::{render_context, ContextItem};
use qaflow::pipeline::create_agent;
use qaflow::testing::{EchoLanguageModel, StaticRetriever, StaticWebSearch};
use qaflow::config::Settings;
use serde_json::json;
use std::sync::Arc;

fn pipeline_benchmark(c: &mut Criterion) {
    let pipeline = create_agent(
        Arc::new(StaticRetriever::from_texts((0..20).map(|i| format!("document {i}")))),
        Arc::new(StaticWebSearch::new(vec![
            ContextItem::text("France is in Europe."),
            ContextItem::structured(json!({"title": "France", "rank": 1})),
        ])),
        Arc::new(EchoLanguageModel),
        Arc::new(Settings::default()),
    );

    c.bench_function("run_in_memory", |b| {
        b.iter(|| tokio_test::block_on(pipeline.run(black_box("What is the capital of France?"))));
    });

    let items: Vec<ContextItem> = (0..100)
        .map(|i| ContextItem::structured(json!({"id": i, "text": "snippet"})))
        .collect();
    c.bench_function("render_context_structured", |b| {
        b.iter(|| render_context(black_box(&items)));
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
