//! Plotters-powered stacked bar chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `BarChart` widget?
//! - a real numeric x axis (years) with ticks and labels
//! - stacking is just rectangles drawn on top of each other
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One stacked layer: a series name, its color and `(x, height)` bars.
pub struct StackLayer<'a> {
    pub name: &'a str,
    pub color: RGBColor,
    pub bars: Vec<(f64, f64)>,
}

/// A render-only stacked bar chart description.
///
/// The widget is data-driven: stacking, bounds and bar width are computed
/// outside the render call.
pub struct StackedBarChart<'a> {
    /// Layers in stacking order (first is at the bottom).
    pub layers: &'a [StackLayer<'a>],
    /// Width of each bar in x units.
    pub bar_width: f64,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
}

impl<'a> Widget for StackedBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let half = self.bar_width / 2.0;
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .y_desc(self.y_label)
                .x_labels(6)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            // Running top of each stack, keyed by bar position.
            let mut tops: Vec<(f64, f64)> = Vec::new();
            for layer in self.layers {
                let style = layer.color.filled();
                let mut rects = Vec::with_capacity(layer.bars.len());
                for &(x, h) in &layer.bars {
                    let base = match tops.iter_mut().find(|(tx, _)| (*tx - x).abs() < 1e-9) {
                        Some((_, top)) => {
                            let b = *top;
                            *top += h;
                            b
                        }
                        None => {
                            tops.push((x, h));
                            0.0
                        }
                    };
                    rects.push(Rectangle::new([(x - half, base), (x + half, base + h)], style));
                }
                chart.draw_series(rects)?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
