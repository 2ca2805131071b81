//! trackmix - loop a few tones on the default output device
//!
//! Run with: cargo run [-- <output device name>]
//!
//! Keys: [↑/↓] volume  [←/→] rate  [L/R/B] ear  [Space] blip  [0] unity rate  [Q] quit

mod app;
mod ui;

use app::TrackMix;
use trackmix::{EngineConfig, Track};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let config = EngineConfig::default();
    let rate = config.sample_rate;
    let len = rate as usize;

    // Two loops of different lengths, so their phases drift against each other
    let low = Track::sine(440.0, 0.25, rate, len)?;
    let high = Track::sine(660.0, 0.15, rate, len * 3 / 4)?;
    let blip = Track::sine(1_320.0, 0.3, rate, len / 8)?;

    let mut app = TrackMix::new(config);
    if let Some(device) = std::env::args().nth(1) {
        app = app.device(device);
    }

    app.volume(0.8)
        .loop_track(low)
        .loop_track(high)
        .blip(blip)
        .run()
}
