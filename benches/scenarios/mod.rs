//! Whole-callback benchmarks.
//!
//! These run `Mixer::process` exactly as an audio backend would, lock
//! included.

mod voices;

pub use voices::bench_voices;
