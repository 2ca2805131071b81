//! Spectrum analyzer widget
//!
//! Hann-windowed FFT of the mono downmix, reduced to log-spaced bands.
//! Each band reports the strongest FFT bin it covers, in dB relative to a
//! full-scale sine, so a 0.5 amplitude tone reads about -6 dB.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

const BANDS: usize = 48;
const MIN_FREQ: f32 = 20.0;
const FLOOR_DB: f64 = -100.0;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// Amplitude a full-scale sine produces in its FFT bin
    full_scale: f32,
    /// FFT bin range [start, end) per band
    bands: Vec<(usize, usize)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 of centre frequency, magnitude dB) per band
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        let denom = (buffer_len - 1) as f32;
        let window: Vec<f32> = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
            .collect();
        let full_scale = window.iter().sum::<f32>() / 2.0;

        let half = buffer_len / 2;
        let bin_hz = sample_rate / buffer_len as f32;
        let max_freq = (sample_rate / 2.0).min(20_000.0).max(MIN_FREQ * 2.0);
        let ratio = max_freq / MIN_FREQ;

        let mut bands = Vec::with_capacity(BANDS);
        let mut spectrum = Vec::with_capacity(BANDS);
        for band in 0..BANDS {
            let lo = MIN_FREQ * ratio.powf(band as f32 / BANDS as f32);
            let hi = MIN_FREQ * ratio.powf((band + 1) as f32 / BANDS as f32);
            let start = ((lo / bin_hz).floor() as usize).min(half - 1);
            let end = ((hi / bin_hz).ceil() as usize).clamp(start + 1, half);
            bands.push((start, end));
            spectrum.push((((lo * hi).sqrt() as f64).log10(), FLOOR_DB));
        }

        Self {
            window,
            full_scale,
            bands,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    /// Analyze one buffer; ignored unless it matches the FFT size.
    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((bin, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *bin = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (&(start, end), (_, db)) in self.bands.iter().zip(self.spectrum.iter_mut()) {
            let peak = self.scratch[start..end]
                .iter()
                .map(|c| c.norm())
                .fold(0.0f32, f32::max);
            let relative = (peak / self.full_scale).max(1e-6) as f64;
            *db = (20.0 * relative.log10()).max(FLOOR_DB);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (min_x, max_x) = spectrum
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Spectrum ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([min_x.min(max_x), max_x])
                .labels(vec!["20Hz", "200Hz", "2kHz", "20kHz"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, 0.0])
                .labels(vec!["-100", "-50", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
