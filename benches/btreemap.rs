//! Benchmarks for the Standard Library's [`BTreeMap`], as a baseline.

use std::collections::BTreeMap;

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Benchmarking sizes
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

fn random_map(rng: &mut StdRng, size: usize) -> BTreeMap<u64, u64> {
    std::iter::repeat_with(|| (rng.random(), rng.random()))
        .take(size)
        .collect()
}

/// Benchmarking insertion
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("BTreeMap Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let mut map = random_map(&mut rng, size);

            b.iter(|| {
                map.insert(rng.random(), rng.random());
            });
        });
    }
}

/// Benchmarking lookups of present keys
pub fn get(c: &mut Criterion) {
    let mut group = c.benchmark_group("BTreeMap Get");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let map = random_map(&mut rng, size);
            let keys: Vec<u64> = map.keys().step_by((size / 10).max(1)).copied().collect();

            b.iter(|| {
                for key in &keys {
                    black_box(map.get(key));
                }
            });
        });
    }
}

/// Benchmarking short range scans
pub fn range(c: &mut Criterion) {
    let mut group = c.benchmark_group("BTreeMap Range");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let map = random_map(&mut rng, size);
            let start: u64 = rng.random();
            let end = start.saturating_add(u64::MAX / 1000);

            b.iter(|| {
                for el in map.range(start..=end) {
                    black_box(el);
                }
            });
        });
    }
}

/// Benchmarking iteration
pub fn iter(c: &mut Criterion) {
    c.bench_function("BTreeMap Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let map = random_map(&mut rng, 100_000);

        b.iter(|| {
            for el in &map {
                black_box(el);
            }
        });
    });
}
