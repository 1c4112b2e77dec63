//! HTTP/1.x message benchmarks
//!
//! Measures serialization and parsing throughput for requests and responses
//! with small and large bodies.
//!
//! Run with: cargo bench --bench message_performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use h1wire::http::{Message, Method, Parser, ParserConfig};

fn sample_request() -> Message {
    let mut message = Message::request(Method::Get, "/index.html");
    message
        .set_header("Host", "example.com")
        .set_header("User-Agent", "bench/1.0")
        .set_header("Accept", "text/html")
        .set_header("Connection", "keep-alive");
    message
}

fn sample_response(body_size: usize) -> Message {
    let mut message = Message::response(200);
    message
        .set_header("Content-Type", "application/octet-stream")
        .set_header("Server", "bench")
        .set_message_body(vec![b'x'; body_size]);
    message
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    let request = sample_request();
    group.bench_function("request", |b| {
        b.iter(|| black_box(black_box(&request).serialize()));
    });

    for size in [0usize, 1024, 1024 * 1024] {
        let response = sample_response(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("response", size), &response, |b, r| {
            b.iter(|| black_box(r.serialize()));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    let request = sample_request().serialize();
    group.bench_function("request", |b| {
        b.iter(|| black_box(Message::parse(black_box(&request)).unwrap()));
    });

    let strict = Parser::with_config(ParserConfig::builder().strict(true).build());
    group.bench_function("request_strict", |b| {
        b.iter(|| {
            let mut message = Message::new();
            strict.parse(&mut message, black_box(&request)).unwrap();
            black_box(message);
        });
    });

    for size in [0usize, 1024, 1024 * 1024] {
        let wire = sample_response(size).serialize();
        group.throughput(Throughput::Bytes(wire.len() as u64));
        group.bench_with_input(BenchmarkId::new("response", size), &wire, |b, w| {
            b.iter(|| black_box(Message::parse(w).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_serialize, bench_parse);
criterion_main!(benches);
