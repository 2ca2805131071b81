//! Benchmarks for the volume ramp.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use trackmix::dsp::envelope::VolumeEnvelope;

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        // Settled at full level (the common case)
        let mut env = VolumeEnvelope::ramping_to(255);
        for _ in 0..255 {
            env.next_gains();
        }
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(env.next_gains());
                }
            })
        });

        // Bouncing between targets, so every frame steps
        let mut env = VolumeEnvelope::new();
        let mut up = true;
        group.bench_with_input(BenchmarkId::new("ramping", size), &size, |b, &size| {
            b.iter(|| {
                let target = if up { 255 } else { 0 };
                env.set_target(0, target);
                env.set_target(1, target);
                up = !up;
                for _ in 0..size {
                    black_box(env.next_gains());
                }
            })
        });
    }

    group.finish();
}
