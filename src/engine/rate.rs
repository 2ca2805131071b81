use crate::dsp::envelope::EARS;

use super::Ear;

/// Per-ear playback speed, shared by every voice.
///
/// Unlike volume there is no ramp: a new scale applies from the next
/// buffer on. 1.0 is unity, 2.0 doubles speed and raises pitch an octave.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateControl {
    scales: [f64; EARS],
}

impl RateControl {
    pub fn new() -> Self {
        Self { scales: [1.0; EARS] }
    }

    pub fn set(&mut self, ear: Ear, scale: f64) {
        for channel in ear.channels() {
            self.scales[channel] = scale;
        }
    }

    pub fn scales(&self) -> [f64; EARS] {
        self.scales
    }
}

impl Default for RateControl {
    fn default() -> Self {
        Self::new()
    }
}
