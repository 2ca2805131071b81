//! Track - an immutable mono sample buffer
//!
//! Tracks are reference counted: cloning is cheap and every voice playing
//! a track holds its own handle, so the samples outlive the caller's copy.

use std::{f64::consts::PI, fmt, ops::Deref, sync::Arc};

use crate::error::{EngineError, EngineResult};

/// Shared, never-empty sample buffer
#[derive(Clone)]
pub struct Track {
    samples: Arc<[f32]>,
}

impl Track {
    /// Create a track from raw samples.
    ///
    /// Fails on an empty sequence; the mixer indexes modulo the length.
    pub fn new(samples: impl Into<Vec<f32>>) -> EngineResult<Self> {
        let samples: Vec<f32> = samples.into();
        if samples.is_empty() {
            return Err(EngineError::EmptyTrack);
        }
        Ok(Self {
            samples: samples.into(),
        })
    }

    /// Build a track by evaluating `f` at every sample index.
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> f32) -> EngineResult<Self> {
        Self::new((0..len).map(f).collect::<Vec<_>>())
    }

    /// Sine tone spanning `len` samples.
    ///
    /// The phase runs over `len - 1` steps so the last sample lands on a
    /// whole number of cycles when `freq` divides the sample rate.
    pub fn sine(freq: f64, amplitude: f64, sample_rate: u32, len: usize) -> EngineResult<Self> {
        let span = len.saturating_sub(1).max(1) as f64;
        let cycles = freq * len as f64 / sample_rate.max(1) as f64;
        Self::from_fn(len, |i| {
            (amplitude * (cycles * 2.0 * PI * i as f64 / span).sin()) as f32
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Number of live handles to the underlying buffer
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.samples)
    }
}

impl Deref for Track {
    type Target = [f32];

    fn deref(&self) -> &[f32] {
        &self.samples
    }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Track").field("len", &self.len()).finish()
    }
}
