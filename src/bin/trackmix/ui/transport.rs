//! Transport bar - control settings, engine state and output levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use trackmix::{dsp::amplify, Ear, MixerSnapshot};

/// What the keyboard last asked for
pub struct ControlState {
    pub volume: f64,
    pub rate: f64,
    /// Ear the next volume/rate change applies to
    pub ear: Ear,
}

impl ControlState {
    pub fn new(volume: f64) -> Self {
        Self {
            volume,
            rate: 1.0,
            ear: Ear::Both,
        }
    }
}

fn ear_label(ear: Ear) -> &'static str {
    match ear {
        Ear::Left => "L",
        Ear::Right => "R",
        Ear::Both => "L+R",
    }
}

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    controls: &ControlState,
    snapshot: &MixerSnapshot,
    audio_buffer: &[f32],
    sample_rate: u32,
) {
    let block = Block::default().title(" trackmix ").borders(Borders::ALL);

    let (state_symbol, state_color) = if snapshot.live {
        ("▶ Live", Color::Green)
    } else {
        ("⏸ Idle", Color::Yellow)
    };
    let seconds = snapshot.frames_rendered as f64 / sample_rate.max(1) as f64;

    let line = Line::from(vec![
        Span::styled(format!(" {}  ", state_symbol), Style::default().fg(state_color)),
        Span::styled(
            format!("Ear: {:<3}  ", ear_label(controls.ear)),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "Vol: {:>3}/{:>3}  ",
                snapshot.volume_current[0], snapshot.volume_current[1]
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!(
                "Rate: {:.2}/{:.2}  ",
                snapshot.freq_scale[0], snapshot.freq_scale[1]
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Voices: {}  ", snapshot.voices.len()),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{:.1}s  ", seconds), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!(
                "Peak: {:.2}  RMS: {:.2}",
                amplify::peak(audio_buffer),
                amplify::rms(audio_buffer)
            ),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
