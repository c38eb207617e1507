use ratatui::{
    prelude::*,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Gauge, Paragraph,
    },
};

use crate::core::telemetry::{GaugeGeometry, GaugeLayout, Point};

/// Secondary (sub-component) arc colour.
const SECONDARY_COLOR: Color = Color::Magenta;

/// Color for a percentage: calm up to 40, warning up to 75, then danger
pub fn level_color(value: f64) -> Color {
    match value {
        v if v <= 40.0 => Color::Green,
        v if v <= 75.0 => Color::Yellow,
        _ => Color::Red,
    }
}

/// Horizontal bar for a gauge, filled to the geometry's share of the dial.
pub fn bar_gauge<'a>(
    layout: &GaugeLayout,
    geometry: Option<GaugeGeometry>,
    label: &'a str,
) -> Gauge<'a> {
    let ratio = geometry.map_or(0.0, |g| layout.fill_ratio(&g));

    Gauge::default()
        .gauge_style(
            Style::default()
                .fg(level_color(ratio * 100.0))
                .bg(Color::Black),
        )
        .ratio(ratio)
        .label(label)
}

/// Draw a dial: arcs from `geometry` with the value label underneath.
///
/// Without geometry (value unavailable) only the label is drawn.
pub fn render_dial(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    label: &str,
    geometry: Option<GaugeGeometry>,
    layout: &GaugeLayout,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL);

    let Some(geometry) = geometry else {
        let paragraph = Paragraph::new(label.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let fill = layout.fill_ratio(&geometry) * 100.0;
    let primary_color = level_color(fill);
    let label = label.to_string();
    let center = Point { x: 0.0, y: 0.0 };

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([-1.2, 1.2])
        .y_bounds([-1.2, 1.2])
        .paint(move |ctx| {
            if let Some(arc) = geometry.secondary {
                let coords = to_coords(&arc.points(center, 1.0, 3.0));
                ctx.draw(&Points {
                    coords: &coords,
                    color: SECONDARY_COLOR,
                });
            }
            if let Some(arc) = geometry.primary {
                let coords = to_coords(&arc.points(center, 1.0, 3.0));
                ctx.draw(&Points {
                    coords: &coords,
                    color: primary_color,
                });
            }
            ctx.print(
                -0.25,
                -0.1,
                Span::styled(
                    label.clone(),
                    Style::default()
                        .fg(primary_color)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        });

    frame.render_widget(canvas, area);
}

/// Draw a sparkline polyline computed for a `width` × `height` surface.
pub fn render_sparkline(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    points: Option<&[Point]>,
    (width, height): (f64, f64),
    color: Color,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL);
    let Some(points) = points else {
        frame.render_widget(block, area);
        return;
    };

    // geometry is y-down, the canvas is y-up
    let flipped: Vec<(f64, f64)> = points.iter().map(|p| (p.x, height - p.y)).collect();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(move |ctx| {
            for pair in flipped.windows(2) {
                let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
                ctx.draw(&CanvasLine::new(x1, y1, x2, y2, color));
            }
        });

    frame.render_widget(canvas, area);
}

fn to_coords(points: &[Point]) -> Vec<(f64, f64)> {
    points.iter().map(|p| (p.x, p.y)).collect()
}
