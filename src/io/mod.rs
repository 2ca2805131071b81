//! Audio backends
//!
//! A backend owns the platform stream and calls [`Mixer::process`] from its
//! audio thread with an interleaved stereo `f32` buffer. The engine only
//! needs to open a stream, start it and stop it; dropping the stream tears
//! it down.
//!
//! - [`CpalBackend`]: default (or named) output device through CPAL
//! - [`OfflineBackend`]: device-less worker thread, for tests and bounces

pub mod cpal_backend;
pub mod offline;

pub use cpal_backend::CpalBackend;
pub use offline::{OfflineBackend, Pacing};

use crate::{config::EngineConfig, engine::mixer::Mixer, error::EngineResult};

pub trait AudioBackend {
    type Stream: BackendStream;

    /// Open a stream whose callback renders through `mixer`.
    ///
    /// Buffers are expected only after [`BackendStream::start`], although
    /// hosts that start streams implicitly are tolerated.
    fn open(&mut self, config: &EngineConfig, mixer: Mixer) -> EngineResult<Self::Stream>;
}

pub trait BackendStream {
    fn start(&self) -> EngineResult<()>;

    fn stop(&self) -> EngineResult<()>;
}
