//! Export a filtered view to CSV.
//!
//! Long format (one row per metric per day) so slices with different gaps
//! stay easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::DashboardView;
use crate::error::AppError;

/// Write the view's slices to a CSV file. Returns the number of data rows.
pub fn write_view_csv(path: &Path, view: &DashboardView) -> Result<usize, AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::Io(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "date,metric,field,value")
        .map_err(|e| AppError::Io(format!("Failed to write export CSV header: {e}")))?;

    let mut rows = 0;
    for slice in &view.slices {
        for &(date, value) in &slice.points {
            writeln!(
                file,
                "{},{:?},{},{}",
                date,
                slice.metric.display_name(),
                slice.metric.field_name(),
                crate::report::format_count(value),
            )
            .map_err(|e| AppError::Io(format!("Failed to write export CSV row: {e}")))?;
            rows += 1;
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{DateRange, Metric, MetricSlice};

    #[test]
    fn writes_header_and_quoted_rows() {
        let d1 = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
        let view = DashboardView {
            range: DateRange::new(d1, d2),
            slices: vec![MetricSlice {
                metric: Metric::DeathIncrease,
                points: vec![(d1, 3.0), (d2, 5.0)],
            }],
        };

        let dir = std::env::temp_dir().join("covid-dash-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("view.csv");

        let rows = write_view_csv(&path, &view).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("date,metric,field,value"));
        assert_eq!(lines.next(), Some("2020-03-01,\"Daily Deaths\",deathIncrease,3"));
        assert_eq!(lines.next(), Some("2020-03-02,\"Daily Deaths\",deathIncrease,5"));

        std::fs::remove_file(&path).ok();
    }
}
