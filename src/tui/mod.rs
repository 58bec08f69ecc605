//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the date range and the set
//! of metrics to plot, then renders one line series per selected metric.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate};
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
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, DashboardView, ViewConfig};
use crate::cli::ViewArgs;
use crate::data::{SeriesCache, TrackingClient};
use crate::domain::{catalog, DailySeries, DateRange, Metric};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::{ChartSeries, DashboardChart};

/// Line colors, assigned to selected metrics in selection order.
/// The Ratatui color is used for the matching legend/settings text.
const PALETTE: [(Color, RGBColor); 7] = [
    (Color::Cyan, RGBColor(0, 255, 255)),
    (Color::Green, RGBColor(0, 255, 0)),
    (Color::Yellow, RGBColor(255, 255, 0)),
    (Color::Magenta, RGBColor(255, 0, 255)),
    (Color::Red, RGBColor(255, 0, 0)),
    (Color::Blue, RGBColor(120, 120, 255)),
    (Color::White, RGBColor(255, 255, 255)),
];

/// Settings rows 0 and 1 are the date inputs; metric rows follow.
const DATE_FIELDS: usize = 2;

/// Start the TUI.
pub fn run(args: ViewArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::Io(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::Io(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::Io(format!("Failed to enter alternate screen: {e}")));
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateField {
    Start,
    End,
}

struct App {
    cache: SeriesCache<TrackingClient>,
    series: Option<Arc<DailySeries>>,
    view: Option<DashboardView>,
    range: DateRange,
    selected: [bool; Metric::ALL.len()],
    selected_field: usize,
    editing: Option<DateField>,
    date_input: String,
    status: String,
    // CLI-supplied dates, applied once when the first fetch succeeds.
    start_override: Option<NaiveDate>,
    end_override: Option<NaiveDate>,
}

impl App {
    fn new(args: ViewArgs) -> Result<Self, AppError> {
        // Bad metric flags are a usage error; fail before the fetch.
        let mut selected = [false; Metric::ALL.len()];
        if args.metrics.is_empty() {
            selected[0] = true;
        } else {
            for raw in &args.metrics {
                let metric = catalog::resolve(raw)?;
                let idx = Metric::ALL.iter().position(|&m| m == metric).unwrap_or(0);
                selected[idx] = true;
            }
        }

        let mut app = Self {
            cache: SeriesCache::new(TrackingClient::from_env()?),
            series: None,
            view: None,
            range: DateRange::new(pipeline::DEFAULT_START, pipeline::DEFAULT_START),
            selected,
            selected_field: 0,
            editing: None,
            date_input: String::new(),
            status: "Fetching data...".to_string(),
            start_override: args.start,
            end_override: args.end,
        };
        app.load();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::Io(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::Io(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::Io(format!("Event read error: {e}")))? {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_date_edit(code);
            return false;
        }

        let last_field = DATE_FIELDS + Metric::ALL.len() - 1;
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < last_field {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => match self.selected_field {
                0 => self.begin_date_edit(DateField::Start),
                1 => self.begin_date_edit(DateField::End),
                i => self.toggle_metric(i - DATE_FIELDS),
            },
            KeyCode::Char(' ') => {
                if self.selected_field >= DATE_FIELDS {
                    self.toggle_metric(self.selected_field - DATE_FIELDS);
                }
            }
            KeyCode::Char('a') => {
                self.selected = [true; Metric::ALL.len()];
                self.rebuild_view();
                self.status = "Selected all metrics.".to_string();
            }
            KeyCode::Char('c') => {
                self.selected = [false; Metric::ALL.len()];
                self.rebuild_view();
                self.status = "Cleared metric selection.".to_string();
            }
            KeyCode::Char('r') => self.load(),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => self.apply_date_input(),
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn begin_date_edit(&mut self, field: DateField) {
        self.date_input = match field {
            DateField::Start => self.range.start.to_string(),
            DateField::End => self.range.end.to_string(),
        };
        self.editing = Some(field);
        self.status = "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
    }

    fn apply_date_input(&mut self) {
        let Some(field) = self.editing.take() else {
            return;
        };
        let trimmed = self.date_input.trim();
        let date = match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => date,
            Err(e) => {
                self.status = format!("Invalid date '{trimmed}': {e}");
                return;
            }
        };
        match field {
            DateField::Start => self.range.start = date,
            DateField::End => self.range.end = date,
        }
        self.rebuild_view();
        self.status = format!("range: {} to {}", self.range.start, self.range.end);
    }

    fn adjust_field(&mut self, delta: i64) {
        match self.selected_field {
            0 => {
                if let Some(date) = self.range.start.checked_add_signed(ChronoDuration::days(delta)) {
                    self.range.start = date;
                    self.rebuild_view();
                    self.status = format!("start: {}", self.range.start);
                }
            }
            1 => {
                if let Some(date) = self.range.end.checked_add_signed(ChronoDuration::days(delta)) {
                    self.range.end = date;
                    self.rebuild_view();
                    self.status = format!("end: {}", self.range.end);
                }
            }
            i => self.toggle_metric(i - DATE_FIELDS),
        }
    }

    fn toggle_metric(&mut self, idx: usize) {
        if idx >= Metric::ALL.len() {
            return;
        }
        self.selected[idx] = !self.selected[idx];
        self.rebuild_view();
        let metric = Metric::ALL[idx];
        self.status = if self.selected[idx] {
            format!("+ {}", metric.display_name())
        } else {
            format!("- {}", metric.display_name())
        };
    }

    fn selected_metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .enumerate()
            .filter(|&(i, _)| self.selected[i])
            .map(|(_, m)| m)
            .collect()
    }

    /// Fetch through the cache. After the first success this is a cheap
    /// cache hit; after a failure it retries the upstream.
    fn load(&mut self) {
        self.status = "Fetching data...".to_string();
        match self.cache.get() {
            Ok(series) => {
                let defaults = pipeline::default_range(&series);
                self.range = DateRange::new(
                    self.start_override.take().unwrap_or(defaults.start),
                    self.end_override.take().unwrap_or(defaults.end),
                );
                self.status = format!(
                    "Loaded {} days ({} to {}).",
                    series.len(),
                    series.first_date().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                    series.last_date().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                );
                self.series = Some(series);
                self.rebuild_view();
            }
            Err(err) => {
                self.series = None;
                self.view = None;
                self.status = format!("{err} (press 'r' to retry)");
            }
        }
    }

    fn rebuild_view(&mut self) {
        let Some(series) = &self.series else {
            self.view = None;
            return;
        };
        let config = ViewConfig {
            metrics: self.selected_metrics(),
            range: self.range,
        };
        self.view = Some(pipeline::build_view(series, &config));
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("cvd", Style::default().fg(Color::Cyan)),
            Span::raw(" — US COVID-19 dashboard (source: covidtracking.com)"),
        ]));

        let span = match &self.series {
            Some(series) => format!(
                "data: {} to {} ({} days)",
                series.first_date().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                series.last_date().map(|d| d.to_string()).unwrap_or_else(|| "-".to_string()),
                series.len(),
            ),
            None => "data: unavailable".to_string(),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "{span} | range: {} to {} | selected: {}",
                self.range.start,
                self.range.end,
                self.selected_metrics().len(),
            ),
            Style::default().fg(Color::Gray),
        )));

        let mut legend: Vec<Span> = Vec::new();
        for (i, metric) in self.selected_metrics().into_iter().enumerate() {
            if !legend.is_empty() {
                legend.push(Span::raw("  "));
            }
            let (color, _) = PALETTE[i % PALETTE.len()];
            legend.push(Span::styled(metric.display_name(), Style::default().fg(color)));
        }
        if legend.is_empty() {
            legend.push(Span::styled("no metrics selected", Style::default().fg(Color::Gray)));
        }
        lines.push(Line::from(legend));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("US Daily Statistics").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let hint = |msg: &str| {
            Paragraph::new(msg.to_string())
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default())
        };

        let Some(view) = &self.view else {
            frame.render_widget(hint("No data. Press 'r' to retry the fetch."), inner);
            return;
        };
        if view.slices.is_empty() {
            frame.render_widget(hint("No metrics selected. Space toggles a metric."), inner);
            return;
        }

        let Some((series, x_bounds, y_bounds, x_base)) = chart_series(view) else {
            frame.render_widget(hint("No data in selected range."), inner);
            return;
        };

        let widget = DashboardChart {
            series: &series,
            x_bounds,
            y_bounds,
            x_base,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let start_label = if self.editing == Some(DateField::Start) {
            format!("Start date: {}_", self.date_input)
        } else {
            format!("Start date: {}", self.range.start)
        };
        let end_label = if self.editing == Some(DateField::End) {
            format!("End date:   {}_", self.date_input)
        } else {
            format!("End date:   {}", self.range.end)
        };

        let mut items = Vec::with_capacity(DATE_FIELDS + Metric::ALL.len());
        items.push(ListItem::new(start_label));
        items.push(ListItem::new(end_label));

        // Color selected metrics to match their chart line.
        let mut palette_idx = 0;
        for (i, metric) in Metric::ALL.iter().enumerate() {
            let item = if self.selected[i] {
                let (color, _) = PALETTE[palette_idx % PALETTE.len()];
                palette_idx += 1;
                ListItem::new(format!("[x] {}", metric.display_name()))
                    .style(Style::default().fg(color))
            } else {
                ListItem::new(format!("[ ] {}", metric.display_name()))
            };
            items.push(item);
        }

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing.is_some() {
            let hint = Paragraph::new("Editing date…")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ step date  Enter edit/toggle  Space toggle  a all  c none  r retry  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Project the view's slices onto chart coordinates (days since the earliest
/// plotted date) and compute padded bounds.
///
/// Returns `None` when no slice has any point in range.
fn chart_series(view: &DashboardView) -> Option<(Vec<ChartSeries>, [f64; 2], [f64; 2], NaiveDate)> {
    let base = view
        .slices
        .iter()
        .filter_map(|s| s.points.first().map(|&(d, _)| d))
        .min()?;

    let mut series = Vec::with_capacity(view.slices.len());
    let mut x_max = 0.0_f64;
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);

    for (i, slice) in view.slices.iter().enumerate() {
        let (_, color) = PALETTE[i % PALETTE.len()];
        let mut points = Vec::with_capacity(slice.points.len());
        for &(date, value) in &slice.points {
            let x = (date - base).num_days() as f64;
            x_max = x_max.max(x);
            y_min = y_min.min(value);
            y_max = y_max.max(value);
            points.push((x, value));
        }
        series.push(ChartSeries { color, points });
    }

    if !(y_min.is_finite() && y_max.is_finite()) {
        return None;
    }

    // Widen degenerate bounds so a single day or a flat line still renders.
    let x_bounds = if x_max > 0.0 { [0.0, x_max] } else { [-0.5, 0.5] };
    let pad = ((y_max - y_min).abs() * 0.05).max(1.0);
    let y_bounds = [y_min - pad, y_max + pad];

    Some((series, x_bounds, y_bounds, base))
}
