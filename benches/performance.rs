// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for trackweave
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Variable-length quantity encoding
//! - Quantizer throughput
//! - Build pass over relatively timed notes
//! - Splicing explicitly timed events into a long track
//! - Merging one track into another

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use trackweave::events::vlq;
use trackweave::{Message, NoteEvent, Quantizer, TextKind, Track, TrackEvent};

fn notes(count: usize, duration: &str) -> Vec<NoteEvent> {
    (0..count)
        .map(|i| {
            NoteEvent::builder()
                .pitch(48 + (i % 24))
                .duration(duration)
                .build()
                .expect("valid note")
        })
        .collect()
}

fn relative_track(count: usize) -> Track {
    let mut track = Track::new();
    track.add_events(notes(count, "8t")).expect("valid notes");
    track
}

/// Benchmark variable-length quantity encoding (track body core)
fn bench_vlq_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("vlq_encoding");

    for value in [0u32, 127, 128, 16383, 2097151].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(value), value, |b, &value| {
            b.iter(|| vlq::encode(black_box(value)))
        });
    }

    group.finish();
}

/// Benchmark residual-carrying quantization
fn bench_quantization(c: &mut Criterion) {
    c.bench_function("quantize_1000_triplets", |b| {
        b.iter(|| {
            let mut quantizer = Quantizer::default();
            let mut sum = 0u64;
            for _ in 0..1000 {
                sum += quantizer.next(black_box(128.0 / 3.0)) as u64;
            }
            black_box(sum)
        })
    });
}

/// Benchmark the build pass over relatively timed notes
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("relative", size), size, |b, &size| {
            b.iter_batched(
                || relative_track(size),
                |mut track| {
                    track.build().expect("build");
                    black_box(track.size())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark splicing explicitly timed markers into a built track
fn bench_splice(c: &mut Criterion) {
    let mut group = c.benchmark_group("splice");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("markers", size), size, |b, &size| {
            b.iter_batched(
                || {
                    let mut track = relative_track(size);
                    track.build().expect("build");
                    track
                },
                |mut track| {
                    for i in 0..100u64 {
                        let marker = Message::text(TextKind::Marker, "m");
                        track.merge_single_event(TrackEvent::new(marker).at_tick(i * 97));
                    }
                    black_box(track.events().len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

/// Benchmark merging two tracks
fn bench_merge_track(c: &mut Criterion) {
    c.bench_function("merge_track_1000", |b| {
        b.iter_batched(
            || (relative_track(1000), relative_track(1000)),
            |(mut a, mut other)| {
                a.merge_track(&mut other).expect("merge");
                black_box(a.data().len())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_vlq_encoding,
    bench_quantization,
    bench_build,
    bench_splice,
    bench_merge_track,
);

criterion_main!(benches);
