//! Benchmarks for building, querying and rendering error chains

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use errwrap::{ChainFormat, ChainLevel, Verbosity, is, new, new_error, wrap, wrapper};

fn chain_of(depth: usize) -> (ChainLevel, Vec<errwrap::Cause>) {
    let causes: Vec<_> = (0..=depth).map(|i| new(format!("level {i}"))).collect();
    let mut level = new_error([causes[0].clone()]).expect("root has a cause");
    for cause in &causes[1..] {
        level = wrap(level, [cause.clone()]).expect("wrap has a cause");
    }
    (level, causes)
}

/// Benchmark wrapping with stack capture at each level
fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for depth in [1usize, 8, 32] {
        group.bench_with_input(BenchmarkId::new("wrap", depth), &depth, |b, &depth| {
            b.iter(|| std::hint::black_box(chain_of(depth)));
        });
    }
    group.finish();
}

/// Benchmark root-most lookups, the worst case for traversal
fn benchmark_traverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("traverse");
    for depth in [1usize, 8, 32] {
        let (top, causes) = chain_of(depth);
        let root_cause = causes[0].clone();
        group.bench_with_input(BenchmarkId::new("is", depth), &depth, |b, _| {
            b.iter(|| std::hint::black_box(is(&top, &root_cause)));
        });
        group.bench_with_input(BenchmarkId::new("wrapper", depth), &depth, |b, _| {
            b.iter(|| std::hint::black_box(wrapper(&top, &root_cause)));
        });
    }
    group.finish();
}

/// Benchmark rendering, including lazy symbol resolution on first use
fn benchmark_render(c: &mut Criterion) {
    let (top, _) = chain_of(8);
    let format = ChainFormat::STANDARD;
    c.bench_function("render_full", |b| {
        b.iter(|| std::hint::black_box(top.render(Verbosity::Full, &format)));
    });
    c.bench_function("render_full_with_stack", |b| {
        b.iter(|| std::hint::black_box(top.render(Verbosity::FullWithStack, &format)));
    });
}

criterion_group!(benches, benchmark_build, benchmark_traverse, benchmark_render);
criterion_main!(benches);
