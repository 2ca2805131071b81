//! TrackMix - application builder and runner

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use trackmix::{io::CpalBackend, Ear, EngineConfig, PlayMode, PlaybackController, Track};

use super::ui::UiApp;

/// Interleaved samples buffered between the audio thread and the UI
const TAP_CAPACITY: usize = 16 * 1024;

/// Main application builder
pub struct TrackMix {
    config: EngineConfig,
    device: Option<String>,
    volume: f64,
    loops: Vec<Track>,
    blip: Option<Track>,
}

impl TrackMix {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            device: None,
            volume: 1.0,
            loops: Vec::new(),
            blip: None,
        }
    }

    /// Play through the named output device instead of the default
    pub fn device(mut self, name: impl Into<String>) -> Self {
        self.device = Some(name.into());
        self
    }

    /// Starting volume for both ears
    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Add a track that loops from start-up until quit
    pub fn loop_track(mut self, track: Track) -> Self {
        self.loops.push(track);
        self
    }

    /// Track fired once per press of the space bar
    pub fn blip(mut self, track: Track) -> Self {
        self.blip = Some(track);
        self
    }

    /// Open the device, start the loops and hand over to the UI
    pub fn run(self) -> EyreResult<()> {
        let backend = match self.device {
            Some(name) => CpalBackend::with_device(name),
            None => CpalBackend::new(),
        };
        let engine = PlaybackController::new(backend, self.config);
        let sample_rate = engine.config().sample_rate;

        let audio_rx = engine.attach_tap(TAP_CAPACITY);
        engine.set_volume(self.volume, Ear::Both);
        for track in &self.loops {
            engine
                .play(track, PlayMode::Loop)
                .wrap_err("failed to start playback")?;
        }
        log::info!("{} loops playing", self.loops.len());

        let mut terminal = ratatui::init();
        let res = UiApp::new(&engine, audio_rx, self.blip, self.volume, sample_rate)
            .run(&mut terminal);
        ratatui::restore();

        engine.shutdown();
        res
    }
}
