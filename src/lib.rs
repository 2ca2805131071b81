pub mod config;
pub mod dsp; // Gain ramping and resampling primitives
pub mod engine; // Voices, mixer callback and control plane
pub mod error;
pub mod io; // Audio backends
pub mod track;

pub use config::EngineConfig;
pub use engine::{
    controller::PlaybackController,
    mixer::{Mixer, MixerSnapshot},
    voice::PlayMode,
    Ear,
};
pub use error::{EngineError, EngineResult};
pub use track::Track;

/// Output is always interleaved stereo.
pub const CHANNELS: usize = 2;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_FRAMES_PER_BUFFER: u32 = 1024;
