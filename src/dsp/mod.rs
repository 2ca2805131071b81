//! Low-level DSP primitives used by the mixer.
//!
//! These components are allocation-free and realtime-safe: they run inside
//! the audio callback for every frame. They stay focused on the math so the
//! engine layer can deal with voices, locking and lifecycle.

/// Output gain and hard clipping.
pub mod amplify;
/// Click-free per-ear volume ramp.
pub mod envelope;
/// Nearest-sample read positions for rate scaling.
pub mod resample;

pub use envelope::VolumeEnvelope;
