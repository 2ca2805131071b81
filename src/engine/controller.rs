//! PlaybackController - the control-plane API
//!
//! Any thread may call into the controller. Volume and rate changes take
//! the mixer lock for a single field update. The first `play` (or an
//! explicit `start`) opens the backend stream and blocks until the audio
//! thread has produced its first buffer, so a voice can never be registered
//! against a stream that is not running yet.
//!
//! # Example
//!
//! ```ignore
//! use trackmix::{Ear, PlayMode, PlaybackController, Track};
//!
//! let engine = PlaybackController::with_default_device();
//! let tone = Track::sine(440.0, 0.5, 44_100, 44_100)?;
//! engine.set_volume(0.8, Ear::Both);
//! engine.play(&tone, PlayMode::Loop)?;
//! engine.set_freq_scale(1.5, Ear::Right);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use super::{
    mixer::{Mixer, MixerSnapshot},
    voice::{PlayMode, Voice},
    Ear,
};
use crate::{
    config::EngineConfig,
    dsp::envelope,
    error::{EngineError, EngineResult},
    io::{AudioBackend, BackendStream, CpalBackend},
    track::Track,
};

/// Backend plus the stream it opened, if any
struct Lifecycle<B: AudioBackend> {
    backend: B,
    stream: Option<B::Stream>,
    paused: bool,
}

pub struct PlaybackController<B: AudioBackend = CpalBackend> {
    lifecycle: Mutex<Lifecycle<B>>,
    mixer: Mixer,
    config: EngineConfig,
}

impl PlaybackController<CpalBackend> {
    /// Default output device with the default configuration.
    pub fn with_default_device() -> Self {
        Self::new(CpalBackend::new(), EngineConfig::default())
    }
}

impl<B: AudioBackend> PlaybackController<B> {
    /// Create a controller. Nothing is opened until the first `play` or
    /// `start`.
    pub fn new(backend: B, config: EngineConfig) -> Self {
        Self {
            lifecycle: Mutex::new(Lifecycle {
                backend,
                stream: None,
                paused: false,
            }),
            mixer: Mixer::new(&config),
            config,
        }
    }

    /// Open and start the stream unless it is already running, then wait
    /// for the first buffer.
    pub fn start(&self) -> EngineResult<()> {
        let mut lifecycle = self.lock_lifecycle();
        self.start_locked(&mut lifecycle)
    }

    /// Register a new voice playing `track` from its first sample.
    ///
    /// Starts the engine if needed; start-up errors are returned here.
    pub fn play(&self, track: &Track, mode: PlayMode) -> EngineResult<()> {
        // Held until the voice is in, so a concurrent shutdown cannot reset
        // the mixer in between
        let mut lifecycle = self.lock_lifecycle();
        self.start_locked(&mut lifecycle)?;
        self.mixer.add_voice(Voice::new(track.clone(), mode));
        log::debug!("Playing {} samples ({:?})", track.len(), mode);
        Ok(())
    }

    fn start_locked(&self, lifecycle: &mut Lifecycle<B>) -> EngineResult<()> {
        if lifecycle.stream.is_some() {
            return Ok(());
        }

        let stream = lifecycle.backend.open(&self.config, self.mixer.clone())?;
        stream.start()?;

        if !self.mixer.wait_until_live(self.config.startup_timeout) {
            if let Err(e) = stream.stop() {
                log::warn!("Failed to stop unresponsive stream: {}", e);
            }
            let timeout = self.config.startup_timeout.unwrap_or_default();
            log::error!("Audio stream produced no buffer within {:?}", timeout);
            return Err(EngineError::StartupTimeout(timeout));
        }

        lifecycle.stream = Some(stream);
        lifecycle.paused = false;
        log::info!("Audio engine live");
        Ok(())
    }

    /// Set the volume target (clamped to [0, 1]); the output glides there
    /// one step per frame.
    pub fn set_volume(&self, level: f64, ear: Ear) {
        self.mixer.set_volume(envelope::quantize(level), ear);
    }

    /// Integer-selector form of [`set_volume`](Self::set_volume):
    /// negative = both, 0 = left, 1 = right, anything else is ignored.
    pub fn set_volume_index(&self, level: f64, ear: i32) {
        if let Some(ear) = Ear::from_index(ear) {
            self.set_volume(level, ear);
        }
    }

    /// Set the playback rate of every voice, effective from the next buffer.
    pub fn set_freq_scale(&self, scale: f64, ear: Ear) {
        self.mixer.set_freq_scale(scale, ear);
    }

    /// Integer-selector form of [`set_freq_scale`](Self::set_freq_scale).
    pub fn set_freq_scale_index(&self, scale: f64, ear: i32) {
        if let Some(ear) = Ear::from_index(ear) {
            self.set_freq_scale(scale, ear);
        }
    }

    /// Stop the stream without losing playback state. No-op if not running.
    pub fn pause(&self) -> EngineResult<()> {
        let mut guard = self.lock_lifecycle();
        let lifecycle = &mut *guard;
        if let Some(stream) = &lifecycle.stream {
            if !lifecycle.paused {
                stream.stop()?;
                lifecycle.paused = true;
                log::info!("Audio engine paused");
            }
        }
        Ok(())
    }

    /// Restart a paused stream. No-op if not paused.
    pub fn resume(&self) -> EngineResult<()> {
        let mut guard = self.lock_lifecycle();
        let lifecycle = &mut *guard;
        if let Some(stream) = &lifecycle.stream {
            if lifecycle.paused {
                stream.start()?;
                lifecycle.paused = false;
                log::info!("Audio engine resumed");
            }
        }
        Ok(())
    }

    /// Tear the stream down and reset all playback state. A later `play`
    /// starts from scratch.
    pub fn shutdown(&self) {
        let mut lifecycle = self.lock_lifecycle();
        if let Some(stream) = lifecycle.stream.take() {
            if let Err(e) = stream.stop() {
                log::warn!("Failed to stop audio stream: {}", e);
            }
            drop(stream);
            self.mixer.reset();
            log::info!("Audio engine shut down");
        }
        lifecycle.paused = false;
    }

    pub fn is_running(&self) -> bool {
        let lifecycle = self.lock_lifecycle();
        lifecycle.stream.is_some() && !lifecycle.paused
    }

    pub fn snapshot(&self) -> MixerSnapshot {
        self.mixer.snapshot()
    }

    /// Copy the mixed output into a lock-free ring of `capacity` samples.
    #[cfg(feature = "rtrb")]
    pub fn attach_tap(&self, capacity: usize) -> Consumer<f32> {
        self.mixer.attach_tap(capacity)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle<B>> {
        self.lifecycle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B: AudioBackend> Drop for PlaybackController<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
