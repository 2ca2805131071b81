//! Mixer - the realtime callback and the state it shares with the control plane
//!
//! All mutable playback state lives in one [`MixerState`] behind one mutex.
//! The audio thread holds the lock for exactly one buffer; control threads
//! hold it for one field update. [`Mixer`] is the cheap, cloneable handle
//! both sides share.

use std::{
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

#[cfg(feature = "rtrb")]
use rtrb::Consumer;

#[cfg(feature = "rtrb")]
use super::tap::OutputTap;
use super::{
    rate::RateControl,
    registry::VoiceRegistry,
    voice::{PlayMode, Voice},
    Ear,
};
use crate::{
    config::EngineConfig,
    dsp::{
        amplify,
        envelope::{self, VolumeEnvelope, EARS},
    },
    CHANNELS,
};

/// Everything the callback reads and advances
pub struct MixerState {
    voices: VoiceRegistry,
    volume: VolumeEnvelope,
    rate: RateControl,
    initial_volume: u8,
    frames_rendered: u64,
    voices_completed: u64,
    live: bool,
    #[cfg(feature = "rtrb")]
    tap: Option<OutputTap>,
}

impl MixerState {
    pub fn new(config: &EngineConfig) -> Self {
        let initial_volume = envelope::quantize(config.initial_volume);
        Self {
            voices: VoiceRegistry::new(),
            volume: VolumeEnvelope::ramping_to(initial_volume),
            rate: RateControl::new(),
            initial_volume,
            frames_rendered: 0,
            voices_completed: 0,
            live: false,
            #[cfg(feature = "rtrb")]
            tap: None,
        }
    }

    /// Render one interleaved stereo buffer and advance all state past it.
    ///
    /// Returns true if this was the first buffer since start-up.
    pub fn render(&mut self, out: &mut [f32]) -> bool {
        let frames = out.len() / CHANNELS;
        let rates = self.rate.scales();

        for (i, frame) in out.chunks_exact_mut(CHANNELS).enumerate() {
            frame.fill(0.0);

            // Sum every voice at its rate-scaled read position
            for voice in self.voices.iter() {
                for (ear, sample) in frame.iter_mut().enumerate() {
                    *sample += voice.sample(ear, i, rates[ear]);
                }
            }

            // Ramp, shape and clamp
            let gains = self.volume.next_gains();
            for (sample, gain) in frame.iter_mut().zip(gains) {
                *sample = amplify::shape(*sample, gain);
            }
        }

        // A trailing half frame never carries audio
        out[frames * CHANNELS..].fill(0.0);

        self.voices_completed += self.voices.advance(frames, &rates) as u64;
        self.frames_rendered += frames as u64;

        #[cfg(feature = "rtrb")]
        if let Some(tap) = self.tap.as_mut() {
            if !tap.is_abandoned() {
                tap.push_block(&out[..frames * CHANNELS]);
            }
        }

        let first = !self.live;
        self.live = true;
        first
    }

    pub fn add_voice(&mut self, voice: Voice) {
        self.voices.push(voice);
    }

    pub fn set_volume(&mut self, level: u8, ear: Ear) {
        for channel in ear.channels() {
            self.volume.set_target(channel, level);
        }
    }

    pub fn set_freq_scale(&mut self, scale: f64, ear: Ear) {
        self.rate.set(ear, scale);
    }

    /// Back to the freshly started state: no voices, unity rate, silent
    /// ramp toward the initial volume. Any tap is detached.
    pub fn reset(&mut self) {
        self.voices.clear();
        self.volume = VolumeEnvelope::ramping_to(self.initial_volume);
        self.rate = RateControl::new();
        self.frames_rendered = 0;
        self.voices_completed = 0;
        self.live = false;
        #[cfg(feature = "rtrb")]
        {
            self.tap = None;
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn snapshot(&self) -> MixerSnapshot {
        MixerSnapshot {
            voices: self
                .voices
                .iter()
                .map(|v| VoiceSnapshot {
                    track_len: v.track().len(),
                    positions: v.positions(),
                    mode: v.mode(),
                })
                .collect(),
            volume_current: self.volume.current(),
            volume_target: self.volume.target(),
            freq_scale: self.rate.scales(),
            frames_rendered: self.frames_rendered,
            voices_completed: self.voices_completed,
            live: self.live,
        }
    }
}

/// Point-in-time copy of the mixer state for display and tests
#[derive(Debug, Clone, PartialEq)]
pub struct MixerSnapshot {
    pub voices: Vec<VoiceSnapshot>,
    pub volume_current: [u8; EARS],
    pub volume_target: [u8; EARS],
    pub freq_scale: [f64; EARS],
    /// Sample clock: frames produced since start-up
    pub frames_rendered: u64,
    pub voices_completed: u64,
    pub live: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceSnapshot {
    pub track_len: usize,
    pub positions: [usize; EARS],
    pub mode: PlayMode,
}

struct Shared {
    state: Mutex<MixerState>,
    first_buffer: Condvar,
}

/// Shared handle to the mixer, passed to the backend and the controller.
#[derive(Clone)]
pub struct Mixer {
    shared: Arc<Shared>,
}

impl Mixer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(MixerState::new(config)),
                first_buffer: Condvar::new(),
            }),
        }
    }

    /// The realtime entry point: fill `out` (interleaved stereo) and
    /// advance playback. Never fails.
    pub fn process(&self, out: &mut [f32]) {
        let first = self.lock().render(out);
        if first {
            self.shared.first_buffer.notify_all();
        }
    }

    /// Block until the first buffer has been rendered.
    ///
    /// Returns false if `timeout` elapsed first; `None` waits forever.
    pub fn wait_until_live(&self, timeout: Option<Duration>) -> bool {
        let guard = self.lock();
        let cv = &self.shared.first_buffer;
        match timeout {
            Some(timeout) => {
                let (guard, _) = cv
                    .wait_timeout_while(guard, timeout, |state| !state.live)
                    .unwrap_or_else(PoisonError::into_inner);
                guard.live
            }
            None => {
                cv.wait_while(guard, |state| !state.live)
                    .unwrap_or_else(PoisonError::into_inner)
                    .live
            }
        }
    }

    pub fn add_voice(&self, voice: Voice) {
        self.lock().add_voice(voice);
    }

    pub fn set_volume(&self, level: u8, ear: Ear) {
        self.lock().set_volume(level, ear);
    }

    pub fn set_freq_scale(&self, scale: f64, ear: Ear) {
        self.lock().set_freq_scale(scale, ear);
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn snapshot(&self) -> MixerSnapshot {
        self.lock().snapshot()
    }

    /// Start copying every rendered buffer into a ring of `capacity`
    /// samples. Replaces any previous tap.
    #[cfg(feature = "rtrb")]
    pub fn attach_tap(&self, capacity: usize) -> Consumer<f32> {
        let (tap, consumer) = OutputTap::new(capacity);
        self.lock().tap = Some(tap);
        consumer
    }

    /// A panic on another thread must not silence the stream.
    fn lock(&self) -> MutexGuard<'_, MixerState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;
    use std::f32::consts::PI;

    const FRAMES: usize = 64;

    fn state_at_full_volume() -> MixerState {
        let mut state = MixerState::new(&EngineConfig::default());
        state.volume = VolumeEnvelope::ramping_to(255);
        state.volume.set_current(0, 255);
        state.volume.set_current(1, 255);
        state
    }

    fn render(state: &mut MixerState, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames * CHANNELS];
        state.render(&mut out);
        out
    }

    fn sine(len: usize) -> Track {
        Track::from_fn(len, |i| 0.5 * (2.0 * PI * i as f32 / len as f32).sin()).unwrap()
    }

    #[test]
    fn silent_without_voices() {
        let mut state = state_at_full_volume();
        assert!(render(&mut state, FRAMES).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn mix_is_sum_of_voices() {
        let a = Track::from_fn(7, |i| 0.01 * i as f32).unwrap();
        let b = Track::from_fn(11, |i| -0.02 * i as f32).unwrap();

        let mut only_a = state_at_full_volume();
        only_a.add_voice(Voice::new(a.clone(), PlayMode::Loop));
        let mut only_b = state_at_full_volume();
        only_b.add_voice(Voice::new(b.clone(), PlayMode::Loop));
        let mut both = state_at_full_volume();
        both.add_voice(Voice::new(a, PlayMode::Loop));
        both.add_voice(Voice::new(b, PlayMode::Loop));

        for _ in 0..3 {
            let out_a = render(&mut only_a, FRAMES);
            let out_b = render(&mut only_b, FRAMES);
            let out_both = render(&mut both, FRAMES);
            for ((x, y), z) in out_a.iter().zip(&out_b).zip(&out_both) {
                assert!((x + y - z).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn output_stays_in_range() {
        let loud = Track::new(vec![0.9, -0.9, 0.8]).unwrap();
        let mut state = state_at_full_volume();
        for _ in 0..5 {
            state.add_voice(Voice::new(loud.clone(), PlayMode::Loop));
        }
        let out = render(&mut state, FRAMES);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
        assert_eq!(out[0], 1.0);
        assert_eq!(out[2], -1.0);
    }

    #[test]
    fn volume_ramps_one_step_per_frame() {
        let mut state = MixerState::new(&EngineConfig::default());
        let dc = Track::new(vec![1.0]).unwrap();
        state.add_voice(Voice::new(dc, PlayMode::Loop));
        state.set_volume(255, Ear::Both);

        let out = render(&mut state, 300);
        for i in 0..300 {
            let level = (i + 1).min(255) as f32 / 255.0;
            assert!((out[2 * i] - level * level).abs() < 1e-6, "frame {i}");
        }
        assert_eq!(out[2 * 254], 1.0);
        assert!(out[2 * 253] < 1.0);
    }

    #[test]
    fn sine_fades_in_from_silence() {
        let mut state = MixerState::new(&EngineConfig::default());
        state.add_voice(Voice::new(sine(100), PlayMode::Loop));
        state.set_volume(255, Ear::Both);

        let out = render(&mut state, 512);
        assert_eq!(out[0], 0.0);
        let early_peak = amplify::peak(&out[..100 * CHANNELS]);
        let late_peak = amplify::peak(&out[300 * CHANNELS..400 * CHANNELS]);
        assert!(early_peak < 0.1);
        assert!((late_peak - 0.5).abs() < 0.01);
        assert_eq!(state.volume.current(), [255, 255]);
    }

    #[test]
    fn loop_position_follows_buffers_times_rate() {
        let mut state = state_at_full_volume();
        state.add_voice(Voice::new(sine(100), PlayMode::Loop));
        state.set_freq_scale(0.75, Ear::Right);

        for n in 1..=10u64 {
            render(&mut state, FRAMES);
            let positions = state.snapshot().voices[0].positions;
            assert_eq!(positions[0] as u64, (n * FRAMES as u64) % 100);
            assert_eq!(positions[1] as u64, (n * 48) % 100);
        }
    }

    #[test]
    fn freq_scale_applies_from_next_buffer_without_ramp() {
        let ramp = Track::from_fn(1000, |i| i as f32 / 1000.0).unwrap();
        let mut state = state_at_full_volume();
        state.add_voice(Voice::new(ramp, PlayMode::Loop));

        render(&mut state, 10);
        state.set_freq_scale(2.0, Ear::Both);
        let out = render(&mut state, 10);

        assert_eq!(state.snapshot().voices[0].positions, [30, 30]);
        assert!((out[0] - 0.010).abs() < 1e-6);
        assert!((out[2] - 0.012).abs() < 1e-6);
        assert!((out[18] - 0.028).abs() < 1e-6);
    }

    #[test]
    fn one_shot_plays_once_then_leaves() {
        let blip = Track::new(vec![0.25; 100]).unwrap();
        let mut state = state_at_full_volume();
        state.add_voice(Voice::new(blip, PlayMode::Once));

        let first = render(&mut state, FRAMES);
        assert!(first.iter().all(|&s| s == 0.25));
        let second = render(&mut state, FRAMES);
        assert!(second[..36 * CHANNELS].iter().all(|&s| s == 0.25));
        assert!(second[36 * CHANNELS..].iter().all(|&s| s == 0.0));

        let snapshot = state.snapshot();
        assert!(snapshot.voices.is_empty());
        assert_eq!(snapshot.voices_completed, 1);
        assert!(render(&mut state, FRAMES).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn odd_tail_is_zeroed() {
        let mut state = state_at_full_volume();
        state.add_voice(Voice::new(Track::new(vec![0.5]).unwrap(), PlayMode::Loop));
        let mut out = vec![9.0; 5];
        state.render(&mut out);
        assert_eq!(out, vec![0.5, 0.5, 0.5, 0.5, 0.0]);
        assert_eq!(state.snapshot().frames_rendered, 2);
    }

    #[test]
    fn first_render_is_reported_once() {
        let mut state = MixerState::new(&EngineConfig::default());
        assert!(state.render(&mut [0.0; 8]));
        assert!(!state.render(&mut [0.0; 8]));
        state.reset();
        assert!(!state.is_live());
        assert!(state.render(&mut [0.0; 8]));
    }

    #[test]
    fn process_wakes_waiters() {
        let mixer = Mixer::new(&EngineConfig::default());
        assert!(!mixer.wait_until_live(Some(Duration::from_millis(5))));

        let audio = mixer.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            audio.process(&mut [0.0; 64]);
        });
        assert!(mixer.wait_until_live(None));
        handle.join().unwrap();
        assert_eq!(mixer.snapshot().frames_rendered, 32);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn tap_receives_rendered_samples() {
        let mixer = Mixer::new(&EngineConfig::default().initial_volume(1.0));
        let mut rx = mixer.attach_tap(1024);
        mixer.add_voice(Voice::new(Track::new(vec![1.0]).unwrap(), PlayMode::Loop));

        let mut out = [0.0; 16];
        mixer.process(&mut out);
        let tapped: Vec<f32> = std::iter::from_fn(|| rx.pop().ok()).collect();
        assert_eq!(tapped, out.to_vec());
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn tap_skips_the_odd_tail() {
        let mixer = Mixer::new(&EngineConfig::default().initial_volume(1.0));
        let mut rx = mixer.attach_tap(1024);
        mixer.process(&mut [0.0; 5]);
        mixer.process(&mut [0.0; 3]);
        let tapped: Vec<f32> = std::iter::from_fn(|| rx.pop().ok()).collect();
        assert_eq!(tapped.len(), 6);
    }
}
