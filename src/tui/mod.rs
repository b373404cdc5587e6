//! Ratatui-based terminal dashboard.
//!
//! The settings panel lists the five selectors; changing one recomputes only the
//! panels bound to it. Panels: the world bubble map, the stacked country trend,
//! the fast facts, and three top-10 bar charts.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use plotters::style::RGBColor;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::app::bindings::{Dashboard, Output, OutputSlot, SelectorId};
use crate::chart::{aligned_dates, ChartSpec, Datum, Trace};
use crate::cli::picker::resolve_country;
use crate::domain::WORLD;
use crate::error::{AppError, EXIT_UI};

mod map;
mod plotters_chart;

use plotters_chart::{StackLayer, StackedBarChart};

/// Stack colors, in `Category::SOURCES` order.
const LAYER_COLORS: [(u8, u8, u8); 4] = [(31, 119, 180), (127, 127, 127), (255, 127, 14), (44, 160, 44)];

/// Directory written by the export key.
const EXPORT_DIR: &str = "exports";

/// Start the TUI.
pub fn run(dashboard: Dashboard) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_UI, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(dashboard);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_UI, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_UI, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    dashboard: Dashboard,
    selected_field: usize,
    searching: bool,
    search_input: String,
    status: String,
}

impl App {
    fn new(dashboard: Dashboard) -> Self {
        let status = format!("{} countries loaded", dashboard.snapshot().countries().len());
        Self {
            dashboard,
            selected_field: 0,
            searching: false,
            search_input: String::new(),
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_UI, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_UI, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_UI, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.searching {
            self.handle_search(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < SelectorId::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::PageUp => self.adjust_field(-10),
            KeyCode::PageDown => self.adjust_field(10),
            KeyCode::Char('/') => {
                self.searching = true;
                self.search_input.clear();
                self.status = "Country search: type a name, Enter to apply, Esc to cancel.".to_string();
            }
            KeyCode::Char('w') => self.apply(SelectorId::Country, WORLD),
            KeyCode::Char('x') => self.export(),
            _ => {}
        }
        false
    }

    fn handle_search(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.searching = false;
                self.status = "Search canceled.".to_string();
            }
            KeyCode::Enter => {
                self.searching = false;
                match resolve_country(&self.search_input, self.dashboard.snapshot().countries()) {
                    Ok(country) => self.apply(SelectorId::Country, &country),
                    Err(err) => self.status = err.to_string(),
                }
            }
            KeyCode::Backspace => {
                self.search_input.pop();
            }
            KeyCode::Char(c) => self.search_input.push(c),
            _ => {}
        }
    }

    fn current_selector(&self) -> SelectorId {
        SelectorId::ALL[self.selected_field.min(SelectorId::ALL.len() - 1)]
    }

    fn adjust_field(&mut self, delta: isize) {
        let id = self.current_selector();
        match self.dashboard.cycle(id, delta) {
            Ok(updated) => self.report_update(id, updated.len()),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn apply(&mut self, id: SelectorId, value: &str) {
        match self.dashboard.select(id, value) {
            Ok(updated) => self.report_update(id, updated.len()),
            Err(err) => self.status = err.to_string(),
        }
    }

    fn report_update(&mut self, id: SelectorId, panels: usize) {
        self.status = format!("{}: {} ({panels} panel(s) updated)", id.title(), self.dashboard.value(id));
    }

    fn export(&mut self) {
        let dir = PathBuf::from(EXPORT_DIR);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            self.status = format!("Export failed: {e}");
            return;
        }
        let mut written = 0usize;
        for slot in OutputSlot::ALL {
            let Some(output) = self.dashboard.output(slot) else {
                continue;
            };
            let path = dir.join(format!("{}.json", slot.key()));
            if let Err(err) = crate::io::write_json(output, Some(path.as_path())) {
                self.status = format!("Export failed: {err}");
                return;
            }
            written += 1;
        }
        tracing::info!(dir = EXPORT_DIR, written, "exported dashboard outputs");
        self.status = format!("Wrote {written} outputs to {EXPORT_DIR}/");
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled("Global energy consumption", Style::default().fg(Color::Cyan)),
            Span::styled(
                format!(
                    "  | country: {} | {} series",
                    self.dashboard.value(SelectorId::Country),
                    self.dashboard.snapshot().series().len()
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(SelectorId::ALL.len() as u16 + 2)])
            .split(columns[0]);
        self.draw_world(frame, left[0]);
        self.draw_settings(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);
        let upper = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(right[0]);
        self.draw_trend(frame, upper[0]);
        self.draw_facts(frame, upper[1]);

        let lower = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
            .split(right[1]);
        self.draw_top(frame, lower[0], OutputSlot::TopAbsolute, SelectorId::AbsoluteCategory);
        self.draw_top(frame, lower[1], OutputSlot::TopDependence, SelectorId::DependenceCategory);
        self.draw_top(frame, lower[2], OutputSlot::TopIntensity, SelectorId::IntensityMetric);
    }

    fn draw_world(&self, frame: &mut Frame<'_>, area: Rect) {
        let title = format!("Worldwide: {}", self.dashboard.value(SelectorId::WorldMetric));
        match self.dashboard.output(OutputSlot::WorldMap) {
            Some(Output::Chart(chart)) => {
                let bubbles = chart
                    .traces
                    .iter()
                    .find_map(|t| match t {
                        Trace::ScatterGeo(geo) => Some(map::bubbles(geo, self.dashboard.value(SelectorId::Country))),
                        Trace::Bar(_) => None,
                    })
                    .unwrap_or_default();
                map::render_map(frame, area, &title, &bubbles);
            }
            other => draw_placeholder(frame, area, &title, other),
        }
    }

    fn draw_trend(&self, frame: &mut Frame<'_>, area: Rect) {
        let Some(Output::Chart(chart)) = self.dashboard.output(OutputSlot::CountryTrend) else {
            draw_placeholder(frame, area, "Country trend", self.dashboard.output(OutputSlot::CountryTrend));
            return;
        };

        let title = chart.layout.title.clone().unwrap_or_else(|| "Country trend".to_string());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let trend = trend_layers(chart);
        let layers: Vec<StackLayer<'_>> = trend
            .layers
            .iter()
            .map(|(name, color, bars)| StackLayer {
                name: name.as_str(),
                color: *color,
                bars: bars.clone(),
            })
            .collect();
        let y_label = chart.layout.yaxis_title.as_deref().unwrap_or("");
        let widget = StackedBarChart {
            layers: &layers,
            bar_width: 0.8,
            x_bounds: trend.x_bounds,
            y_bounds: trend.y_bounds,
            y_label,
        };
        frame.render_widget(widget, rows[0]);

        let legend: Vec<Span<'_>> = layers
            .iter()
            .flat_map(|l| {
                let RGBColor(r, g, b) = l.color;
                [
                    Span::styled("■ ", Style::default().fg(Color::Rgb(r, g, b))),
                    Span::raw(format!("{}  ", l.name)),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(legend)), rows[1]);
    }

    fn draw_facts(&self, frame: &mut Frame<'_>, area: Rect) {
        let title = match self.dashboard.output(OutputSlot::FactsTitle) {
            Some(Output::Text(t)) if !t.is_empty() => t.clone(),
            _ => "Fast facts".to_string(),
        };

        let mut lines = Vec::new();
        for slot in [OutputSlot::FactTotal, OutputSlot::FactPerCapita, OutputSlot::FactFossil] {
            let line = match self.dashboard.output(slot) {
                Some(Output::Text(text)) => Line::from(format!("• {text}")),
                Some(Output::Error(err)) => Line::styled(format!("• {err}"), Style::default().fg(Color::Red)),
                _ => Line::from("• -"),
            };
            lines.push(line);
            lines.push(Line::from(""));
        }

        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_top(&self, frame: &mut Frame<'_>, area: Rect, slot: OutputSlot, selector: SelectorId) {
        let title = format!("Top 10: {}", self.dashboard.value(selector));
        let Some(Output::Chart(chart)) = self.dashboard.output(slot) else {
            draw_placeholder(frame, area, &title, self.dashboard.output(slot));
            return;
        };

        let ranked = ranked_bars(chart);
        let unit = chart.layout.xaxis_title.as_deref().unwrap_or("");
        let max = ranked.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        let bars: Vec<Bar<'_>> = ranked
            .iter()
            .map(|(country, value)| {
                Bar::default()
                    .value(bar_units(*value, max))
                    .label(Line::from(country.as_str()))
                    .text_value(fmt_bar_value(*value))
            })
            .collect();

        let chart_widget = BarChart::default()
            .block(Block::default().title(format!("{title} [{unit}]")).borders(Borders::ALL))
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .max(BAR_RESOLUTION)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart_widget, area);
    }

    fn draw_settings(&self, frame: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem<'_>> = SelectorId::ALL
            .iter()
            .map(|id| {
                let value = if *id == SelectorId::Country && self.searching {
                    format!("/{}_", self.search_input)
                } else {
                    self.dashboard.value(*id).to_string()
                };
                ListItem::new(format!("{}: {value}", id.title()))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.searching {
            let hint = Paragraph::new("Searching…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + area.width.saturating_sub(14),
                y: area.y,
                width: 12.min(area.width),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ change  PgUp/PgDn jump  / search  w world  x export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Render a bordered panel for a slot that has no chart to show.
fn draw_placeholder(frame: &mut Frame<'_>, area: Rect, title: &str, output: Option<&Output>) {
    let (msg, color) = match output {
        Some(Output::Error(err)) => (err.clone(), Color::Red),
        _ => ("No data.".to_string(), Color::Yellow),
    };
    let p = Paragraph::new(msg)
        .style(Style::default().fg(color))
        .wrap(Wrap { trim: true })
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(p, area);
}

/// Integer scale for terminal bar lengths.
const BAR_RESOLUTION: u64 = 1000;

fn bar_units(value: f64, max: f64) -> u64 {
    if max <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value.max(0.0) / max) * BAR_RESOLUTION as f64).round() as u64
}

fn fmt_bar_value(v: f64) -> String {
    if v.abs() >= 100.0 {
        format!("{v:.0}")
    } else if v.abs() >= 1.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.3}")
    }
}

/// `(country, value)` pairs of a horizontal bar chart, largest first.
fn ranked_bars(chart: &ChartSpec) -> Vec<(String, f64)> {
    let mut out = Vec::new();
    for trace in &chart.traces {
        let Trace::Bar(bar) = trace else {
            continue;
        };
        for (x, y) in bar.x.iter().zip(&bar.y) {
            if let (Some(v), Datum::Text(country)) = (x.as_number(), y) {
                out.push((country.clone(), v));
            }
        }
    }
    out.reverse();
    out
}

/// Plot-ready stacked layers: `(name, color, (year, height) bars)`.
struct TrendLayers {
    layers: Vec<(String, RGBColor, Vec<(f64, f64)>)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Convert a stacked bar chart into layers on a fractional-year axis.
///
/// Missing values contribute nothing to their stack.
fn trend_layers(chart: &ChartSpec) -> TrendLayers {
    let mut layers = Vec::new();
    let mut stack_heights: Vec<(f64, f64)> = Vec::new();

    for (i, trace) in chart.traces.iter().enumerate() {
        let Trace::Bar(bar) = trace else {
            continue;
        };
        let (r, g, b) = LAYER_COLORS[i % LAYER_COLORS.len()];
        let mut bars = Vec::with_capacity(bar.x.len());
        for (x, y) in bar.x.iter().zip(&bar.y) {
            let (Datum::Date(date), Some(h)) = (x, y.as_number()) else {
                continue;
            };
            let year = fractional_year(*date);
            bars.push((year, h));
            match stack_heights.iter_mut().find(|(sx, _)| (*sx - year).abs() < 1e-9) {
                Some((_, total)) => *total += h,
                None => stack_heights.push((year, h)),
            }
        }
        layers.push((bar.name.clone().unwrap_or_default(), RGBColor(r, g, b), bars));
    }

    let dates = aligned_dates(chart);
    let x_bounds = match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => [fractional_year(*first) - 0.6, fractional_year(*last) + 0.6],
        _ => [0.0, 1.0],
    };
    let y_max = stack_heights.iter().map(|(_, h)| *h).fold(0.0_f64, f64::max);
    let y_bounds = if y_max > 0.0 { [0.0, y_max * 1.05] } else { [0.0, 1.0] };

    TrendLayers {
        layers,
        x_bounds,
        y_bounds,
    }
}

fn fractional_year(date: chrono::NaiveDate) -> f64 {
    use chrono::Datelike;
    date.year() as f64 + f64::from(date.ordinal0()) / 365.25
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{BarTrace, LayoutSpec, Orientation};
    use chrono::NaiveDate;

    fn jan1(year: i32) -> Datum {
        Datum::Date(NaiveDate::from_ymd_opt(year, 1, 1).unwrap())
    }

    fn bar(name: &str, x: Vec<Datum>, y: Vec<Datum>, orientation: Orientation) -> Trace {
        Trace::Bar(BarTrace {
            name: Some(name.to_string()),
            orientation,
            x,
            y,
            hoverinfo: None,
        })
    }

    #[test]
    fn ranked_bars_put_the_largest_first() {
        let chart = ChartSpec {
            traces: vec![bar(
                "",
                vec![Datum::Number(1.0), Datum::Number(5.0), Datum::Number(9.0)],
                vec![
                    Datum::Text("Peru".to_string()),
                    Datum::Text("Chile".to_string()),
                    Datum::Text("World".to_string()),
                ],
                Orientation::Horizontal,
            )],
            layout: LayoutSpec::simple_bars(),
        };
        let ranked = ranked_bars(&chart);
        assert_eq!(ranked[0], ("World".to_string(), 9.0));
        assert_eq!(ranked[2], ("Peru".to_string(), 1.0));
    }

    #[test]
    fn trend_layers_stack_heights_into_the_y_bounds() {
        let chart = ChartSpec {
            traces: vec![
                bar(
                    "Coal",
                    vec![jan1(2000), jan1(2001)],
                    vec![Datum::Number(2.0), Datum::Missing],
                    Orientation::Vertical,
                ),
                bar(
                    "Natural gas",
                    vec![jan1(2000), jan1(2001)],
                    vec![Datum::Number(3.0), Datum::Number(1.0)],
                    Orientation::Vertical,
                ),
            ],
            layout: LayoutSpec::world_bars(),
        };
        let trend = trend_layers(&chart);
        assert_eq!(trend.layers.len(), 2);
        assert_eq!(trend.layers[0].2, vec![(2000.0, 2.0)]);
        assert!((trend.y_bounds[1] - 5.25).abs() < 1e-9);
        assert!((trend.x_bounds[0] - 1999.4).abs() < 1e-9);
        assert!((trend.x_bounds[1] - 2001.6).abs() < 1e-9);
    }

    #[test]
    fn bar_units_scale_against_the_max() {
        assert_eq!(bar_units(5.0, 10.0), 500);
        assert_eq!(bar_units(-1.0, 10.0), 0);
        assert_eq!(bar_units(1.0, 0.0), 0);
    }
}
