/*
Volume Envelope
===============

The master volume is never applied as a step. Every control change only
moves a *target*; the realized level walks toward it one quantum per output
frame. A jump from silence to full scale therefore takes 255 frames (~5.8 ms
at 44.1 kHz), which is short enough to feel immediate and long enough that
the waveform never shows a discontinuity.

Vocabulary
----------

  quantum     One step of the 8-bit level scale: 1/255 of full gain.

  current     The level applied to the frame being rendered right now.

  target      The level most recently requested by the control plane.

  gain        current / 255, a linear factor in [0.0, 1.0].


The Curve: Squared Gain
-----------------------

The sample is multiplied by gain², not gain. Loudness perception is closer
to logarithmic than linear, so a linear fader spends most of its travel
sounding "almost full". Squaring bends the curve toward an equal-power-ish
response:

    level   gain    gain²
      0     0.00    0.000
     64     0.25    0.063
    128     0.50    0.252
    192     0.75    0.567
    255     1.00    1.000

Both ears carry independent current/target pairs so stereo balance can be
ramped exactly like volume.
*/

/// Number of independently ramped channels
pub const EARS: usize = 2;

/// Highest quantized level (unity gain)
pub const MAX_LEVEL: u8 = u8::MAX;

/// Quantize a linear volume to the 8-bit level scale.
///
/// Values outside [0, 1] are clamped first; NaN maps to silence.
#[inline]
pub fn quantize(volume: f64) -> u8 {
    if volume.is_nan() {
        return 0;
    }
    (volume.clamp(0.0, 1.0) * MAX_LEVEL as f64).round() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeEnvelope {
    current: [u8; EARS],
    target: [u8; EARS],
}

impl VolumeEnvelope {
    /// Silent envelope: both levels at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Envelope that ramps up from silence toward `target` on both ears.
    pub fn ramping_to(target: u8) -> Self {
        Self {
            current: [0; EARS],
            target: [target; EARS],
        }
    }

    /// Set the target level of one ear. Out-of-range ears are ignored.
    pub fn set_target(&mut self, ear: usize, level: u8) {
        if let Some(t) = self.target.get_mut(ear) {
            *t = level;
        }
    }

    /// Force the realized level of one ear, bypassing the ramp.
    #[cfg(test)]
    pub fn set_current(&mut self, ear: usize, level: u8) {
        if let Some(c) = self.current.get_mut(ear) {
            *c = level;
        }
    }

    /// Advance every ear by at most one quantum and return gain² per ear.
    #[inline]
    pub fn next_gains(&mut self) -> [f32; EARS] {
        let mut gains = [0.0; EARS];
        for (ear, gain) in gains.iter_mut().enumerate() {
            let current = &mut self.current[ear];
            let target = self.target[ear];
            if *current < target {
                *current += 1;
            } else if *current > target {
                *current -= 1;
            }
            let g = *current as f32 / MAX_LEVEL as f32;
            *gain = g * g;
        }
        gains
    }

    pub fn current(&self) -> [u8; EARS] {
        self.current
    }

    pub fn target(&self) -> [u8; EARS] {
        self.target
    }

    /// True once every ear has reached its target.
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}
