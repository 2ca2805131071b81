//! Benchmarks for the mixer primitives and full callback scenarios.
//!
//! Run with: cargo bench
//!
//! Reference deadlines at 44.1kHz:
//!   - 256 frames  = 5.8ms
//!   - 512 frames  = 11.6ms
//!   - 1024 frames = 23.2ms (the default buffer)
//!
//! Benchmark groups:
//!   - dsp/*        Per-frame primitives (volume ramp, read positions)
//!   - scenarios/*  Whole callbacks with growing voice counts

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Buffer sizes in frames.
pub const BLOCK_SIZES: &[usize] = &[256, 512, 1024];

criterion_group!(
    benches,
    dsp::bench_envelope,
    dsp::bench_resample,
    scenarios::bench_voices,
);
criterion_main!(benches);
