//! Oscilloscope of the mono downmix

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render the most recent output as a line scope.
///
/// Samples past full scale cannot occur (the mixer clamps), so the y axis
/// is fixed at [-1, 1] and clipping shows up as flat tops.
pub fn render_waveform(frame: &mut Frame, area: Rect, audio_buffer: &[f32]) {
    let width = area.width.max(1) as usize;
    let step = audio_buffer.len().div_ceil(width).max(1);

    // One point per column is plenty for a terminal
    let data: Vec<(f64, f64)> = audio_buffer
        .iter()
        .enumerate()
        .step_by(step)
        .map(|(i, &sample)| (i as f64 / audio_buffer.len().max(1) as f64, sample as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(" Output ").borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(vec!["-1", "0", "1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
