//! Engine configuration
//!
//! Stream parameters requested from the backend plus control-plane
//! defaults. Backends may reject a configuration the device cannot honor,
//! they never silently substitute other values.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_FRAMES_PER_BUFFER, DEFAULT_SAMPLE_RATE};

/// How long engine start-up waits for the first rendered buffer by default.
pub const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Frames per callback invocation
    pub frames_per_buffer: u32,
    /// Target volume for both ears when the engine starts (0.0 - 1.0)
    pub initial_volume: f64,
    /// Upper bound on waiting for the first buffer; `None` waits forever
    pub startup_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frames_per_buffer: DEFAULT_FRAMES_PER_BUFFER,
            initial_volume: 0.0,
            startup_timeout: Some(DEFAULT_STARTUP_TIMEOUT),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn frames_per_buffer(mut self, frames: u32) -> Self {
        self.frames_per_buffer = frames.max(1);
        self
    }

    pub fn initial_volume(mut self, volume: f64) -> Self {
        self.initial_volume = volume;
        self
    }

    pub fn startup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.startup_timeout = timeout;
        self
    }

    /// Duration of one callback buffer in milliseconds
    pub fn latency_ms(&self) -> f32 {
        (self.frames_per_buffer as f32 / self.sample_rate.max(1) as f32) * 1000.0
    }
}
