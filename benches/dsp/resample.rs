//! Benchmarks for nearest-index read positions.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use trackmix::dsp::resample;

use crate::BLOCK_SIZES;

pub fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/resample");
    let len = 44_100;

    for &size in BLOCK_SIZES {
        for (name, rate) in [("unity", 1.0), ("fast", 1.5), ("reverse", -0.75)] {
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    let mut acc = 0usize;
                    for i in 0..size {
                        let index = resample::read_index(black_box(43_000), i, rate);
                        acc ^= resample::wrap(index, len);
                    }
                    black_box(acc)
                })
            });
        }
    }

    group.finish();
}
