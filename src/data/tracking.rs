//! COVID Tracking Project API integration.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{DailyRecord, DailySeries};
use crate::error::AppError;

const DEFAULT_ENDPOINT: &str = "https://api.covidtracking.com/v1/us/daily.json";

/// Fail fast rather than hang on a dead upstream.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can produce the full daily series.
///
/// `TrackingClient` is the production implementation; the cache is generic
/// over this trait so tests can substitute an in-memory source.
pub trait SeriesSource {
    fn fetch(&self) -> Result<DailySeries, AppError>;
}

pub struct TrackingClient {
    client: Client,
    endpoint: String,
}

impl TrackingClient {
    /// Build a client against the default endpoint, honoring a
    /// `COVID_API_URL` override from the environment (or a `.env` file).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let endpoint =
            std::env::var("COVID_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AppError::DataUnavailable(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SeriesSource for TrackingClient {
    fn fetch(&self) -> Result<DailySeries, AppError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .map_err(|e| AppError::DataUnavailable(format!("Request to {} failed: {e}", self.endpoint)))?;

        if !resp.status().is_success() {
            return Err(AppError::DataUnavailable(format!(
                "Upstream returned status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::DataUnavailable(format!("Failed to read upstream body: {e}")))?;

        parse_daily(&body)
    }
}

/// Parse the upstream payload (a JSON array of per-day objects) into a
/// sorted, duplicate-free series.
///
/// Kept separate from the HTTP call so it can be tested without a network.
pub fn parse_daily(body: &str) -> Result<DailySeries, AppError> {
    let days: Vec<RawDay> = serde_json::from_str(body)
        .map_err(|e| AppError::DataUnavailable(format!("Failed to parse upstream JSON: {e}")))?;

    let mut records = Vec::with_capacity(days.len());
    for day in days {
        records.push(day.into_record()?);
    }

    Ok(DailySeries::from_records(records))
}

/// One element of the upstream array, as delivered.
///
/// The upstream serves `date` as a bare `YYYYMMDD` integer, but older
/// mirrors quote it as a string; both are accepted. Metric fields are
/// numbers or `null`, and keys may be missing entirely on early dates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    date: RawDate,
    positive: Option<f64>,
    positive_increase: Option<f64>,
    death: Option<f64>,
    death_increase: Option<f64>,
    hospitalized_currently: Option<f64>,
    hospitalized_increase: Option<f64>,
    hospitalized_cumulative: Option<f64>,
    in_icu_currently: Option<f64>,
    in_icu_cumulative: Option<f64>,
    on_ventilator_currently: Option<f64>,
    on_ventilator_cumulative: Option<f64>,
    recovered: Option<f64>,
    total_test_results_increase: Option<f64>,
    total_test_results: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDate {
    Number(u32),
    Text(String),
}

impl RawDay {
    fn into_record(self) -> Result<DailyRecord, AppError> {
        let date = parse_date(&self.date)?;
        Ok(DailyRecord {
            date,
            positive: self.positive,
            positive_increase: self.positive_increase,
            death: self.death,
            death_increase: self.death_increase,
            hospitalized_currently: self.hospitalized_currently,
            hospitalized_increase: self.hospitalized_increase,
            hospitalized_cumulative: self.hospitalized_cumulative,
            in_icu_currently: self.in_icu_currently,
            in_icu_cumulative: self.in_icu_cumulative,
            on_ventilator_currently: self.on_ventilator_currently,
            on_ventilator_cumulative: self.on_ventilator_cumulative,
            recovered: self.recovered,
            total_test_results_increase: self.total_test_results_increase,
            total_test_results: self.total_test_results,
        })
    }
}

fn parse_date(raw: &RawDate) -> Result<NaiveDate, AppError> {
    let text = match raw {
        RawDate::Number(n) => format!("{n:08}"),
        RawDate::Text(s) => s.trim().to_string(),
    };
    NaiveDate::parse_from_str(&text, "%Y%m%d")
        .map_err(|e| AppError::DataUnavailable(format!("Invalid upstream date '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metric;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_descending_payload_into_ascending_series() {
        // Upstream serves newest-first with nulls and missing keys.
        let body = r#"[
            {"date": 20200303, "positive": 20, "death": 2, "inIcuCurrently": null},
            {"date": 20200302, "positive": 15, "death": 1},
            {"date": 20200301, "positive": 10}
        ]"#;

        let series = parse_daily(body).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(date(2020, 3, 1)));
        assert_eq!(series.last_date(), Some(date(2020, 3, 3)));

        let records = series.records();
        assert_eq!(records[0].value(Metric::Positive), Some(10.0));
        assert_eq!(records[0].value(Metric::Death), None);
        assert_eq!(records[2].value(Metric::Death), Some(2.0));
        assert_eq!(records[2].value(Metric::InIcuCurrently), None);
    }

    #[test]
    fn accepts_string_dates() {
        let body = r#"[{"date": "20200301", "positive": 10}]"#;
        let series = parse_daily(body).unwrap();
        assert_eq!(series.first_date(), Some(date(2020, 3, 1)));
    }

    #[test]
    fn duplicate_dates_are_collapsed() {
        let body = r#"[
            {"date": 20200301, "positive": 10},
            {"date": 20200301, "positive": 11}
        ]"#;
        let series = parse_daily(body).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn malformed_json_is_data_unavailable() {
        let err = parse_daily("{not json").unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[test]
    fn bad_date_is_data_unavailable() {
        let err = parse_daily(r#"[{"date": 20201332, "positive": 1}]"#).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));

        let err = parse_daily(r#"[{"date": "03/01/2020", "positive": 1}]"#).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[test]
    fn missing_date_is_data_unavailable() {
        let err = parse_daily(r#"[{"positive": 1}]"#).unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }

    #[test]
    fn empty_array_is_an_empty_series() {
        let series = parse_daily("[]").unwrap();
        assert!(series.is_empty());
    }
}
