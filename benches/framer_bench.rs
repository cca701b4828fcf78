//! Performance benchmarks for reader framing.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench framer_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use latchkey_protocol::{StreamParser, TokenFramer, is_valid_token};
use std::hint::black_box;
use std::io::Cursor;

/// Build a stream of `count` frames carrying ten character tokens.
fn create_stream(count: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(count * 12);
    for i in 0..count {
        data.push(0x02);
        data.extend_from_slice(format!("{:010X}", i).as_bytes());
        data.push(0x03);
    }
    data
}

/// Benchmark the parser on streams fed in one piece.
fn bench_parser_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_feed");

    for count in [1usize, 16, 256] {
        let stream = create_stream(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &stream, |b, stream| {
            b.iter(|| {
                let mut parser = StreamParser::new();
                parser.feed(black_box(stream));
                black_box(parser.drain_tokens().count());
            });
        });
    }

    group.finish();
}

/// Benchmark the parser when the serial line delivers one byte per read.
fn bench_parser_byte_by_byte(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_byte_by_byte");
    group.throughput(Throughput::Elements(16));

    let stream = create_stream(16);

    group.bench_function("sixteen_frames", |b| {
        b.iter(|| {
            let mut parser = StreamParser::new();
            for byte in &stream {
                parser.feed(std::slice::from_ref(black_box(byte)));
            }
            black_box(parser.drain_tokens().count());
        });
    });

    group.finish();
}

/// Benchmark the blocking framer over an in-memory source.
fn bench_framer(c: &mut Criterion) {
    let mut group = c.benchmark_group("framer");
    group.throughput(Throughput::Elements(256));

    let stream = create_stream(256);

    group.bench_function("cursor_256_frames", |b| {
        b.iter(|| {
            let framer = TokenFramer::new(Cursor::new(stream.clone()));
            let tokens = framer.take(256).filter_map(Result::ok).count();
            black_box(tokens);
        });
    });

    group.finish();
}

/// Benchmark the sentinel check.
fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    for token in ["0000000000", "FFFFFFFFFF", "00000000A1"] {
        group.bench_with_input(BenchmarkId::from_parameter(token), token, |b, token| {
            b.iter(|| black_box(is_valid_token(black_box(token))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_feed,
    bench_parser_byte_by_byte,
    bench_framer,
    bench_validation
);

criterion_main!(benches);
