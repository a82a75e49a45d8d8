//! Criterion benchmarks for the heightmap pipeline.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use heightgen::config::{Params, ShapeMode};
use heightgen::{erosion, generate, render};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(10);
    let params = Params {
        seed: 42,
        ..Params::default()
    };
    for size in [64usize, 128, 256] {
        group.bench_with_input(BenchmarkId::new("organic", size), &size, |b, &size| {
            b.iter(|| generate(black_box(&params), size))
        });
    }
    let filled = Params {
        shape_mode: ShapeMode::Filled,
        ..params.clone()
    };
    group.bench_function("filled_128", |b| b.iter(|| generate(black_box(&filled), 128)));
    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let params = Params {
        seed: 42,
        erosion_iterations: 0,
        ..Params::default()
    };
    let grid = generate(&params, 256);

    c.bench_function("erosion_10_passes_256", |b| {
        b.iter(|| {
            let mut g = grid.clone();
            erosion::erode(&mut g, 10);
            g
        })
    });
    c.bench_function("render_512", |b| b.iter(|| render::render_map(black_box(&grid), 512, 512)));
}

criterion_group!(benches, bench_generate, bench_stages);
criterion_main!(benches);
