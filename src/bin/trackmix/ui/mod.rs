//! TUI module for trackmix
//!
//! Shows the mixed output (scope and spectrum) and drives the control plane
//! from the keyboard.

mod spectrum;
mod transport;
mod waveform;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;
use trackmix::{Ear, PlayMode, PlaybackController, Track};

use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, ControlState};
use waveform::render_waveform;

/// Mono frames kept for the scope and the FFT
const VIS_BUFFER_SIZE: usize = 1024;

const VOLUME_STEP: f64 = 0.05;
const RATE_STEP: f64 = 0.05;
const MIN_RATE: f64 = 0.1;
const MAX_RATE: f64 = 4.0;

/// UI application state
pub struct UiApp<'a> {
    engine: &'a PlaybackController,
    /// Interleaved stereo samples copied out of the audio callback
    audio_rx: Consumer<f32>,
    /// Left half of a frame whose right half has not arrived yet
    pending_left: Option<f32>,
    blip: Option<Track>,
    /// Mono downmix of the most recent output
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    controls: ControlState,
    sample_rate: u32,
    should_quit: bool,
}

impl<'a> UiApp<'a> {
    pub fn new(
        engine: &'a PlaybackController,
        audio_rx: Consumer<f32>,
        blip: Option<Track>,
        volume: f64,
        sample_rate: u32,
    ) -> Self {
        Self {
            engine,
            audio_rx,
            pending_left: None,
            blip,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate as f32),
            controls: ControlState::new(volume),
            sample_rate,
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code)?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Drain the tap, keeping the last VIS_BUFFER_SIZE mono frames
    fn poll_audio(&mut self) {
        while let Ok(sample) = self.audio_rx.pop() {
            match self.pending_left.take() {
                None => self.pending_left = Some(sample),
                Some(l) => self.audio_buffer.push(0.5 * (l + sample)),
            }
        }

        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
            self.spectrum.update(&self.audio_buffer);
        }
    }

    fn handle_key(&mut self, key: KeyCode) -> EyreResult<()> {
        let controls = &mut self.controls;
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up => {
                controls.volume = (controls.volume + VOLUME_STEP).min(1.0);
                self.engine.set_volume(controls.volume, controls.ear);
            }
            KeyCode::Down => {
                controls.volume = (controls.volume - VOLUME_STEP).max(0.0);
                self.engine.set_volume(controls.volume, controls.ear);
            }
            KeyCode::Right => {
                controls.rate = (controls.rate + RATE_STEP).min(MAX_RATE);
                self.engine.set_freq_scale(controls.rate, controls.ear);
            }
            KeyCode::Left => {
                controls.rate = (controls.rate - RATE_STEP).max(MIN_RATE);
                self.engine.set_freq_scale(controls.rate, controls.ear);
            }
            KeyCode::Char('0') => {
                controls.rate = 1.0;
                self.engine.set_freq_scale(1.0, controls.ear);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => controls.ear = Ear::Left,
            KeyCode::Char('r') | KeyCode::Char('R') => controls.ear = Ear::Right,
            KeyCode::Char('b') | KeyCode::Char('B') => controls.ear = Ear::Both,
            KeyCode::Char(' ') => {
                if let Some(blip) = &self.blip {
                    self.engine
                        .play(blip, PlayMode::Once)
                        .wrap_err("failed to play blip")?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(8),    // Waveform
                Constraint::Length(10), // Spectrum
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let snapshot = self.engine.snapshot();
        render_transport(
            frame,
            chunks[0],
            &self.controls,
            &snapshot,
            &self.audio_buffer,
            self.sample_rate,
        );
        render_waveform(frame, chunks[1], &self.audio_buffer);
        render_spectrum(frame, chunks[2], self.spectrum.data());

        let help = Paragraph::new(
            " [Q] Quit  [↑/↓] Volume  [←/→] Rate  [0] Unity  [L/R/B] Ear  [Space] Blip",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
