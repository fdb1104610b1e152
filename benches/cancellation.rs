//! Benchmarks for the simplification pipeline on seeded random grids.
//!
//! 1. **Persistence**: filtration, boundary matrix and twist vs standard reduction
//! 2. **Full pipeline**: `simplify` at a small and a large threshold
//!
//! Set `MORSE_BENCH_SEED` (decimal or 0x-hex) to change the grid values.

#![allow(missing_docs)] // Criterion macros generate undocumented functions

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use discrete_morse::prelude::*;
use std::hint::black_box;
use std::sync::OnceLock;

const GRID_SIDES: [usize; 4] = [16, 32, 64, 128];

fn get_benchmark_seed() -> u64 {
    static SEED: OnceLock<u64> = OnceLock::new();
    *SEED.get_or_init(|| {
        std::env::var("MORSE_BENCH_SEED")
            .ok()
            .and_then(|s| {
                let s = s.trim();
                s.strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .map_or_else(|| s.parse().ok(), |hex| u64::from_str_radix(hex, 16).ok())
            })
            .unwrap_or(0xD1EA)
    })
}

fn grid(side: usize) -> SimplicialComplex {
    generate_random_grid_complex(side, side, get_benchmark_seed()).unwrap()
}

fn bench_persistence(c: &mut Criterion) {
    let mut group = c.benchmark_group("persistence_pairing");
    for side in GRID_SIDES {
        let mut complex = grid(side);
        let filtration = Filtration::build(&mut complex);
        let matrix = filtration.boundary_matrix(&complex).unwrap();
        group.throughput(Throughput::Elements(filtration.len() as u64));

        group.bench_with_input(BenchmarkId::new("filtration", side), &side, |b, &side| {
            b.iter_batched(
                || grid(side),
                |mut complex| black_box(Filtration::build(&mut complex)),
                BatchSize::SmallInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("twist", side), &matrix, |b, matrix| {
            b.iter(|| black_box(TwistReduction.compute_pairing(matrix).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("standard", side), &matrix, |b, matrix| {
            b.iter(|| black_box(StandardReduction.compute_pairing(matrix).unwrap()));
        });
    }
    group.finish();
}

fn bench_simplify(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify");
    group.sample_size(20);
    for side in GRID_SIDES {
        group.throughput(Throughput::Elements((side * side) as u64));
        for threshold in [0.05, 0.5] {
            let config = SimplificationConfig::new(threshold);
            group.bench_with_input(
                BenchmarkId::new(format!("delta_{threshold}"), side),
                &side,
                |b, &side| {
                    b.iter_batched(
                        || grid(side),
                        |mut complex| black_box(simplify(&mut complex, &config).unwrap()),
                        BatchSize::LargeInput,
                    );
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_persistence, bench_simplify);
criterion_main!(benches);
