//! Benchmarks for per-frame primitives.

mod envelope;
mod resample;

pub use envelope::bench_envelope;
pub use resample::bench_resample;
