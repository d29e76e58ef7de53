//! Benchmark for segment generation.
//!
//! A segment must be generated well inside one frame budget.
//!
//! Run with: cargo bench --package avalanche_procedural --bench segment_benchmark

#![allow(missing_docs)]

use avalanche_procedural::{
    DifficultySet, SegmentRequest, Sequencer, SlopeGeometry, TrackConfig, TrackRng, TrackStream,
    WorldSeed,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn benchmark_single_segment(c: &mut Criterion) {
    let sequencer = Sequencer::builtin(SlopeGeometry::default(), 0.2, WorldSeed::new(42)).unwrap();
    let mut rng = TrackRng::new(WorldSeed::new(42));
    let request = SegmentRequest::first(DifficultySet::ALL);

    c.bench_function("single_segment_generation", |b| {
        b.iter(|| black_box(sequencer.generate_segment(black_box(&request), &mut rng)));
    });
}

fn benchmark_long_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("long_run");
    group.sample_size(10);

    // 10km of slope
    let segments = (10_000.0 / SlopeGeometry::default().segment_length) as u64;
    group.throughput(Throughput::Elements(segments));
    group.bench_function("stream_10km", |b| {
        b.iter(|| {
            let mut stream = TrackStream::new(TrackConfig::default()).ok()?;
            stream.ensure_segment(segments).ok()?;
            black_box(stream.drain_events().len());
            Some(())
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_single_segment, benchmark_long_run);
criterion_main!(benches);
