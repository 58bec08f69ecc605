//! Plotters-powered time-series chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - easy to extend later (legend, annotations, exportable PNG/SVG backends, etc.)
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use chrono::NaiveDate;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::report::format_count_compact;

/// One metric's line, already projected onto chart coordinates.
///
/// X values are day offsets from `DashboardChart::x_base`; keeping the
/// projection outside the widget keeps `render()` focused on drawing. The
/// legend lives in the header, so a slice here is just a color and points.
pub struct ChartSeries {
    pub color: RGBColor,
    pub points: Vec<(f64, f64)>,
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, which makes
/// the data prep easy to test separately.
pub struct DashboardChart<'a> {
    pub series: &'a [ChartSeries],
    /// X bounds in days since `x_base`.
    pub x_bounds: [f64; 2],
    /// Y bounds in metric counts.
    pub y_bounds: [f64; 2],
    /// Date corresponding to x = 0; used to label the x axis.
    pub x_base: NaiveDate,
}

impl<'a> Widget for DashboardChart<'a> {
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

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let x_base = self.x_base;

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        //
        // We delegate rendering to the crate-provided widget helper to avoid
        // coupling our code to its internal backend types.
        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                // Small margins keep the chart readable without wasting space.
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Axes + tick labels.
            //
            // We disable the mesh lines to reduce visual clutter in low-resolution
            // terminal rendering; the axes + labels are usually enough.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("date")
                .y_desc("count")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| fmt_axis_date(x_base, *v))
                .y_label_formatter(&|v| format_count_compact(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for series in self.series {
                chart.draw_series(LineSeries::new(
                    series.points.iter().copied(),
                    &series.color,
                ))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Map a day offset back to a compact date label (`yy-mm-dd`).
fn fmt_axis_date(base: NaiveDate, offset: f64) -> String {
    let days = offset.round() as i64;
    match base.checked_add_signed(chrono::Duration::days(days)) {
        Some(date) => date.format("%y-%m-%d").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_dates_are_offsets_from_base() {
        let base = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        assert_eq!(fmt_axis_date(base, 0.0), "20-03-01");
        assert_eq!(fmt_axis_date(base, 4.0), "20-03-05");
        assert_eq!(fmt_axis_date(base, 0.4), "20-03-01");
    }
}
