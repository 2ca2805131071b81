//! Output gain stage.

/*
Gain and Clipping
=================

Summing voices is unbounded: two full-scale tracks playing in phase add up
to 2.0. The device expects [-1.0, +1.0], and anything outside that range is
either wrapped or hard-clipped by the driver, neither of which we control.
The last stage of every frame therefore applies the master gain and then
clamps.

    summed:   [ 1.6,  0.4, -2.1, -0.3]
    × gain²:  [ 0.8,  0.2, -1.05,-0.15]   (gain² = 0.5)
    clamped:  [ 0.8,  0.2, -1.0, -0.15]

Clamping is a hard clip. It is audible on sustained overs, but it keeps the
stream inside the legal range unconditionally, which matters more in a
realtime path than the transparency of a limiter.

A NaN in a track would survive both multiplication and clamping, so it is
replaced by silence here.
*/

/// Apply a gain factor to one sample and clamp the result to [-1, 1].
#[inline]
pub fn shape(sample: f32, gain: f32) -> f32 {
    let out = sample * gain;
    if out.is_nan() {
        0.0
    } else {
        out.clamp(-1.0, 1.0)
    }
}

/// Peak absolute amplitude of a buffer.
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()))
}

/// Root mean square of a buffer; zero for an empty buffer.
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt()
}
