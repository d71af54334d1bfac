//! Transfer-curve chart widget

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use shaper_dsp::curve::Curve;

/// Chart resolution across the [-1, 1] input range.
const CURVE_SAMPLES: usize = 256;

/// Render the transfer function with its control points overlaid.
pub fn render_curve(frame: &mut Frame, area: Rect, curve: &Curve, selected: usize) {
    let block = Block::default()
        .title(" Transfer curve ")
        .borders(Borders::ALL);

    // The continuous curve, sampled over the full bipolar input range.
    let line: Vec<(f64, f64)> = (0..=CURVE_SAMPLES)
        .map(|i| {
            let x = i as f32 * 2.0 / CURVE_SAMPLES as f32 - 1.0;
            (x as f64, curve.evaluate(x) as f64)
        })
        .collect();

    // Control points at their reported positions.
    let warp = curve.warp();
    let markers: Vec<(f64, f64)> = curve
        .vertices()
        .iter()
        .map(|v| (v.reported_x(warp) as f64, v.reported_y(warp) as f64))
        .collect();

    let selected_marker: Vec<(f64, f64)> = markers
        .get(selected)
        .map(|&point| vec![point])
        .unwrap_or_default();

    let datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&line),
        Dataset::default()
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Yellow))
            .data(&markers),
        Dataset::default()
            .marker(symbols::Marker::Block)
            .graph_type(GraphType::Scatter)
            .style(Style::default().fg(Color::Red))
            .data(&selected_marker),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(["-1", "0", "+1"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([-1.0, 1.0])
                .labels(["-1", "0", "+1"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
