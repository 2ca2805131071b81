#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    dsp::{envelope::EARS, resample},
    track::Track,
};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Loop, // Wraps to the start forever
    Once, // Removed after the last sample
}

/// One playing instance of a track.
///
/// Each ear keeps its own read position because the rate can differ per
/// ear. Positions always lie in `[0, len)`.
#[derive(Debug, Clone)]
pub struct Voice {
    track: Track,
    positions: [usize; EARS],
    finished: [bool; EARS],
    mode: PlayMode,
}

impl Voice {
    pub fn new(track: Track, mode: PlayMode) -> Self {
        Self {
            track,
            positions: [0; EARS],
            finished: [false; EARS],
            mode,
        }
    }

    /// Sample heard on `ear` at frame `offset` of the current buffer.
    ///
    /// One-shot voices are silent outside their track and on a finished ear.
    #[inline]
    pub fn sample(&self, ear: usize, offset: usize, rate: f64) -> f32 {
        if self.finished[ear] {
            return 0.0;
        }
        let index = resample::read_index(self.positions[ear], offset, rate);
        let len = self.track.len();
        match self.mode {
            PlayMode::Loop => self.track[resample::wrap(index, len)],
            PlayMode::Once => resample::within(index, len).map_or(0.0, |i| self.track[i]),
        }
    }

    /// Commit a rendered buffer of `frames` frames.
    pub fn advance(&mut self, frames: usize, rates: &[f64; EARS]) {
        let len = self.track.len();
        for ear in 0..EARS {
            if self.finished[ear] {
                continue;
            }
            let index = resample::read_index(self.positions[ear], frames, rates[ear]);
            match self.mode {
                PlayMode::Loop => self.positions[ear] = resample::wrap(index, len),
                PlayMode::Once => match resample::within(index, len) {
                    Some(position) => self.positions[ear] = position,
                    None => self.finished[ear] = true,
                },
            }
        }
    }

    /// True once every ear of a one-shot voice ran past its track.
    pub fn is_finished(&self) -> bool {
        self.finished.iter().all(|&f| f)
    }

    pub fn positions(&self) -> [usize; EARS] {
        self.positions
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn track(&self) -> &Track {
        &self.track
    }
}
