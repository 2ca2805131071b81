// Purpose: voice bookkeeping, the realtime mixer and its control plane
// This layer sits above the dsp primitives and below the audio backends

pub mod controller;
pub mod mixer;
pub mod rate;
pub mod registry;
#[cfg(feature = "rtrb")]
pub mod tap;
pub mod voice;

use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output channel selector for volume and rate changes
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ear {
    Left,
    Right,
    #[default]
    Both,
}

impl Ear {
    /// Integer selector: negative = both, 0 = left, 1 = right.
    ///
    /// Anything else selects nothing.
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            i if i < 0 => Some(Ear::Both),
            0 => Some(Ear::Left),
            1 => Some(Ear::Right),
            _ => None,
        }
    }

    /// Channel indices covered by this selector
    pub fn channels(self) -> Range<usize> {
        match self {
            Ear::Left => 0..1,
            Ear::Right => 1..2,
            Ear::Both => 0..2,
        }
    }
}
