//! The metric catalog: every daily statistic the dashboard can display.
//!
//! The upstream schema is an open-ended JSON object, but the set of
//! fields this tool plots is fixed. Enumerating them here (rather than keeping
//! a loose label→string map) means a renamed or removed field is a compile
//! error in `DailyRecord::value`, not a silent gap at render time.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A single tracked statistic.
///
/// Variants are declared in the order they appear in the selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Positive,
    PositiveIncrease,
    Death,
    DeathIncrease,
    HospitalizedCurrently,
    HospitalizedIncrease,
    HospitalizedCumulative,
    InIcuCurrently,
    InIcuCumulative,
    OnVentilatorCurrently,
    OnVentilatorCumulative,
    Recovered,
    TotalTestResultsIncrease,
    TotalTestResults,
}

impl Metric {
    pub const ALL: [Metric; 14] = [
        Metric::Positive,
        Metric::PositiveIncrease,
        Metric::Death,
        Metric::DeathIncrease,
        Metric::HospitalizedCurrently,
        Metric::HospitalizedIncrease,
        Metric::HospitalizedCumulative,
        Metric::InIcuCurrently,
        Metric::InIcuCumulative,
        Metric::OnVentilatorCurrently,
        Metric::OnVentilatorCumulative,
        Metric::Recovered,
        Metric::TotalTestResultsIncrease,
        Metric::TotalTestResults,
    ];

    /// Human-readable label shown in the selection UI and chart legend.
    pub fn display_name(self) -> &'static str {
        match self {
            Metric::Positive => "Cumulative Positive Results",
            Metric::PositiveIncrease => "Daily Positive Tests",
            Metric::Death => "Cumulative Deaths",
            Metric::DeathIncrease => "Daily Deaths",
            Metric::HospitalizedCurrently => "Current Hospitalizations",
            Metric::HospitalizedIncrease => "Daily Hospitalizations",
            Metric::HospitalizedCumulative => "Cumulative Hospitalizations",
            Metric::InIcuCurrently => "Current ICU Patients",
            Metric::InIcuCumulative => "Cumulative ICU Patients",
            Metric::OnVentilatorCurrently => "Current Ventilator Patients",
            Metric::OnVentilatorCumulative => "Cumulative Ventilator Patients",
            Metric::Recovered => "Recovered Patients",
            Metric::TotalTestResultsIncrease => "Daily Tests Performed",
            Metric::TotalTestResults => "Cumulative Tests Performed",
        }
    }

    /// Field name in the upstream JSON schema.
    pub fn field_name(self) -> &'static str {
        match self {
            Metric::Positive => "positive",
            Metric::PositiveIncrease => "positiveIncrease",
            Metric::Death => "death",
            Metric::DeathIncrease => "deathIncrease",
            Metric::HospitalizedCurrently => "hospitalizedCurrently",
            Metric::HospitalizedIncrease => "hospitalizedIncrease",
            Metric::HospitalizedCumulative => "hospitalizedCumulative",
            Metric::InIcuCurrently => "inIcuCurrently",
            Metric::InIcuCumulative => "inIcuCumulative",
            Metric::OnVentilatorCurrently => "onVentilatorCurrently",
            Metric::OnVentilatorCumulative => "onVentilatorCumulative",
            Metric::Recovered => "recovered",
            Metric::TotalTestResultsIncrease => "totalTestResultsIncrease",
            Metric::TotalTestResults => "totalTestResults",
        }
    }
}

/// Catalog labels in selection-UI order.
pub fn labels() -> Vec<&'static str> {
    Metric::ALL.iter().map(|m| m.display_name()).collect()
}

/// Look up a metric by its display label.
pub fn lookup(label: &str) -> Result<Metric, AppError> {
    Metric::ALL
        .iter()
        .copied()
        .find(|m| m.display_name() == label)
        .ok_or_else(|| AppError::UnknownMetric(label.to_string()))
}

/// Look up a metric by its upstream field name.
pub fn lookup_field(field: &str) -> Result<Metric, AppError> {
    Metric::ALL
        .iter()
        .copied()
        .find(|m| m.field_name() == field)
        .ok_or_else(|| AppError::UnknownMetric(field.to_string()))
}

/// Resolve a CLI argument that may be either a label or a field name.
pub fn resolve(arg: &str) -> Result<Metric, AppError> {
    lookup(arg).or_else(|_| lookup_field(arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_deterministic() {
        assert_eq!(labels(), labels());
        assert_eq!(labels().len(), Metric::ALL.len());
    }

    #[test]
    fn labels_and_fields_are_unique() {
        let mut seen_labels = std::collections::HashSet::new();
        let mut seen_fields = std::collections::HashSet::new();
        for m in Metric::ALL {
            assert!(seen_labels.insert(m.display_name()), "duplicate label: {}", m.display_name());
            assert!(seen_fields.insert(m.field_name()), "duplicate field: {}", m.field_name());
        }
    }

    #[test]
    fn lookup_round_trips_every_label() {
        for m in Metric::ALL {
            assert_eq!(lookup(m.display_name()).unwrap(), m);
            assert_eq!(lookup_field(m.field_name()).unwrap(), m);
        }
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = lookup("Cumulative Meteor Strikes").unwrap_err();
        assert!(matches!(err, AppError::UnknownMetric(_)));

        let err = lookup_field("meteorStrikes").unwrap_err();
        assert!(matches!(err, AppError::UnknownMetric(_)));
    }

    #[test]
    fn resolve_accepts_label_or_field() {
        assert_eq!(resolve("Daily Deaths").unwrap(), Metric::DeathIncrease);
        assert_eq!(resolve("deathIncrease").unwrap(), Metric::DeathIncrease);
        assert!(resolve("deaths").is_err());
    }
}
