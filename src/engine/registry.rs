use crate::dsp::envelope::EARS;

use super::voice::Voice;

/// Initial capacity, so typical polyphony never reallocates under the lock.
const INITIAL_CAPACITY: usize = 64;

/// The set of voices currently mixed into the output.
///
/// Order carries no meaning for the output (it is a plain sum), it only has
/// to stay put while a buffer is rendered.
#[derive(Debug, Clone)]
pub struct VoiceRegistry {
    voices: Vec<Voice>,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self {
            voices: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn push(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// Advance every voice past a rendered buffer and drop the ones that
    /// completed. Returns how many were dropped.
    pub fn advance(&mut self, frames: usize, rates: &[f64; EARS]) -> usize {
        let before = self.voices.len();
        self.voices.retain_mut(|voice| {
            voice.advance(frames, rates);
            !voice.is_finished()
        });
        before - self.voices.len()
    }

    pub fn clear(&mut self) {
        self.voices.clear();
    }
}

impl Default for VoiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
