//! World bubble map drawn on a Ratatui canvas.
//!
//! Country outlines come from Ratatui's built-in world map; bubbles are
//! circles whose area follows the chart's marker size.

use ratatui::{
    layout::Rect,
    style::Color,
    symbols,
    widgets::{
        Block, Borders,
        canvas::{Canvas, Circle, Map, MapResolution},
    },
    Frame,
};

use crate::chart::GeoTrace;

/// Degrees of radius per unit of `sqrt(marker size)`.
const RADIUS_SCALE: f64 = 0.5;
const MIN_RADIUS: f64 = 0.6;

/// A bubble ready to draw: position, radius in degrees, and whether it is the
/// currently selected country.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub lon: f64,
    pub lat: f64,
    pub radius: f64,
    pub highlight: bool,
}

/// Convert a geo trace into bubbles. Larger bubbles come first so small ones
/// stay visible on top.
pub fn bubbles(geo: &GeoTrace, selected: &str) -> Vec<Bubble> {
    let mut out: Vec<Bubble> = geo
        .lon
        .iter()
        .zip(&geo.lat)
        .zip(&geo.marker.size)
        .zip(&geo.text)
        .map(|(((lon, lat), size), text)| Bubble {
            lon: *lon,
            lat: *lat,
            radius: (size.max(0.0).sqrt() * RADIUS_SCALE).max(MIN_RADIUS),
            highlight: text.split("<br>").next() == Some(selected),
        })
        .collect();
    out.sort_by(|a, b| b.radius.partial_cmp(&a.radius).unwrap_or(std::cmp::Ordering::Equal));
    out
}

pub fn render_map(frame: &mut Frame<'_>, area: Rect, title: &str, bubbles: &[Bubble]) {
    let canvas = Canvas::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .marker(symbols::Marker::Braille)
        .x_bounds([-180.0, 180.0])
        .y_bounds([-90.0, 90.0])
        .paint(|ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::High,
                color: Color::DarkGray,
            });
            ctx.layer();
            for b in bubbles {
                ctx.draw(&Circle {
                    x: b.lon,
                    y: b.lat,
                    radius: b.radius,
                    color: if b.highlight { Color::Red } else { Color::Cyan },
                });
            }
        });
    frame.render_widget(canvas, area);
}
