//! Shared domain types.
//!
//! These types are intentionally lightweight and serializable so they can be:
//!
//! - held in memory for the lifetime of a session (the cached series)
//! - sliced per interaction without copying the underlying records
//! - exported to CSV for downstream use

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::Metric;

/// One day of national statistics.
///
/// Fields mirror the upstream JSON schema. Every metric is optional: older
/// dates predate some reporting streams (e.g. ICU counts), and the upstream
/// encodes those as `null` or omits the key entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub positive: Option<f64>,
    pub positive_increase: Option<f64>,
    pub death: Option<f64>,
    pub death_increase: Option<f64>,
    pub hospitalized_currently: Option<f64>,
    pub hospitalized_increase: Option<f64>,
    pub hospitalized_cumulative: Option<f64>,
    pub in_icu_currently: Option<f64>,
    pub in_icu_cumulative: Option<f64>,
    pub on_ventilator_currently: Option<f64>,
    pub on_ventilator_cumulative: Option<f64>,
    pub recovered: Option<f64>,
    pub total_test_results_increase: Option<f64>,
    pub total_test_results: Option<f64>,
}

impl DailyRecord {
    /// A record for `date` with every metric unreported.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            positive: None,
            positive_increase: None,
            death: None,
            death_increase: None,
            hospitalized_currently: None,
            hospitalized_increase: None,
            hospitalized_cumulative: None,
            in_icu_currently: None,
            in_icu_cumulative: None,
            on_ventilator_currently: None,
            on_ventilator_cumulative: None,
            recovered: None,
            total_test_results_increase: None,
            total_test_results: None,
        }
    }

    /// The value reported for `metric` on this day, if any.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Positive => self.positive,
            Metric::PositiveIncrease => self.positive_increase,
            Metric::Death => self.death,
            Metric::DeathIncrease => self.death_increase,
            Metric::HospitalizedCurrently => self.hospitalized_currently,
            Metric::HospitalizedIncrease => self.hospitalized_increase,
            Metric::HospitalizedCumulative => self.hospitalized_cumulative,
            Metric::InIcuCurrently => self.in_icu_currently,
            Metric::InIcuCumulative => self.in_icu_cumulative,
            Metric::OnVentilatorCurrently => self.on_ventilator_currently,
            Metric::OnVentilatorCumulative => self.on_ventilator_cumulative,
            Metric::Recovered => self.recovered,
            Metric::TotalTestResultsIncrease => self.total_test_results_increase,
            Metric::TotalTestResults => self.total_test_results,
        }
    }
}

/// A user-chosen date window. Both ends are inclusive.
///
/// There is no `start <= end` invariant; slicing with an inverted range
/// yields an empty result rather than an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// The date-filtered values of one metric, ready for rendering.
///
/// Days on which the metric was unreported are omitted, so consumers see
/// them as gaps rather than zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSlice {
    pub metric: Metric,
    pub points: Vec<(NaiveDate, f64)>,
}

impl MetricSlice {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The full daily series fetched from the upstream endpoint.
///
/// Invariants (established by `from_records`, relied on by slicing):
/// - records are sorted ascending by date
/// - dates are unique
///
/// The series is immutable once built; the cache hands out shared references
/// for the rest of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySeries {
    records: Vec<DailyRecord>,
}

impl DailySeries {
    /// Build a series from records in any order. Sorts ascending by date and
    /// drops duplicate dates (first occurrence per date wins after the sort).
    pub fn from_records(mut records: Vec<DailyRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        records.dedup_by_key(|r| r.date);
        Self { records }
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.date)
    }

    /// Return the (date, value) pairs for `metric` whose date falls inside
    /// `range`, in ascending date order.
    ///
    /// The end date is inclusive: the slice bound is `end + 1 day`, exclusive.
    /// An inverted range (`start > end`) yields an empty slice. Unreported
    /// values inside the range are omitted.
    pub fn slice(&self, metric: Metric, range: DateRange) -> MetricSlice {
        // `succ_opt` is `None` only at `NaiveDate::MAX`; then everything from
        // `start` onward is in range.
        let upper = range.end.succ_opt();

        let mut points = Vec::new();
        for record in &self.records {
            if record.date < range.start {
                continue;
            }
            if let Some(upper) = upper {
                if record.date >= upper {
                    break;
                }
            }
            if let Some(value) = record.value(metric) {
                points.push((record.date, value));
            }
        }

        MetricSlice { metric, points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate, positive: f64) -> DailyRecord {
        DailyRecord {
            positive: Some(positive),
            ..DailyRecord::new(d)
        }
    }

    fn march_series() -> DailySeries {
        DailySeries::from_records(vec![
            record(date(2020, 3, 1), 10.0),
            record(date(2020, 3, 2), 15.0),
            record(date(2020, 3, 3), 20.0),
        ])
    }

    #[test]
    fn from_records_sorts_and_dedups() {
        // Upstream delivers newest-first; the constructor must not care.
        let series = DailySeries::from_records(vec![
            record(date(2020, 3, 3), 20.0),
            record(date(2020, 3, 1), 10.0),
            record(date(2020, 3, 2), 15.0),
            record(date(2020, 3, 2), 999.0),
        ]);

        let dates: Vec<NaiveDate> = series.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date(2020, 3, 1), date(2020, 3, 2), date(2020, 3, 3)]);
        for pair in dates.windows(2) {
            assert!(pair[0] < pair[1], "dates must be strictly ascending");
        }
    }

    #[test]
    fn slice_end_date_is_inclusive() {
        let series = DailySeries::from_records(vec![
            record(date(2020, 3, 1), 10.0),
            record(date(2020, 3, 5), 50.0),
        ]);
        let slice = series.slice(
            Metric::Positive,
            DateRange::new(date(2020, 3, 1), date(2020, 3, 5)),
        );
        assert_eq!(slice.points, vec![(date(2020, 3, 1), 10.0), (date(2020, 3, 5), 50.0)]);
    }

    #[test]
    fn slice_excludes_days_past_the_end() {
        let series = march_series();
        let slice = series.slice(
            Metric::Positive,
            DateRange::new(date(2020, 3, 1), date(2020, 3, 2)),
        );
        assert_eq!(slice.points, vec![(date(2020, 3, 1), 10.0), (date(2020, 3, 2), 15.0)]);
    }

    #[test]
    fn inverted_range_is_empty_not_an_error() {
        let series = march_series();
        let slice = series.slice(
            Metric::Positive,
            DateRange::new(date(2020, 3, 3), date(2020, 3, 1)),
        );
        assert!(slice.is_empty());
    }

    #[test]
    fn range_outside_series_span_is_empty() {
        let series = march_series();

        let before = series.slice(
            Metric::Positive,
            DateRange::new(date(2019, 1, 1), date(2019, 12, 31)),
        );
        assert!(before.is_empty());

        let after = series.slice(
            Metric::Positive,
            DateRange::new(date(2021, 1, 1), date(2021, 12, 31)),
        );
        assert!(after.is_empty());
    }

    #[test]
    fn unreported_values_are_gaps() {
        let mut middle = DailyRecord::new(date(2020, 3, 2));
        middle.death = Some(1.0); // some other metric reported, positives missing
        let series = DailySeries::from_records(vec![
            record(date(2020, 3, 1), 10.0),
            middle,
            record(date(2020, 3, 3), 20.0),
        ]);

        let slice = series.slice(
            Metric::Positive,
            DateRange::new(date(2020, 3, 1), date(2020, 3, 3)),
        );
        assert_eq!(slice.points, vec![(date(2020, 3, 1), 10.0), (date(2020, 3, 3), 20.0)]);
    }

    #[test]
    fn slice_at_date_max_does_not_overflow() {
        let series = march_series();
        let slice = series.slice(
            Metric::Positive,
            DateRange::new(date(2020, 3, 2), NaiveDate::MAX),
        );
        assert_eq!(slice.points.len(), 2);
    }
}
