//! Per-year summary statistics for annotated datasets.
//!
//! Every figure is a [`Statistic`]: either a value or an explicit
//! undefined marker when there was nothing to aggregate. Undefined figures
//! serialize as the string `"no data"` so they never reach the renderer as
//! NaN.

use nwq_core::{ParameterLimits, Result, WaterQualityError, YearDataset};
use nwq_utils::numbers::{mean, median, percentage, round_to};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// Key used for the WQI column in mean/median tables.
pub const WQI_KEY: &str = "WQI";

/// Key used for the any-parameter exceedance percentage.
pub const OVERALL_KEY: &str = "overall";

/// Rendering of [`Statistic::Undefined`].
pub const NO_DATA: &str = "no data";

/// A summary figure that may be undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Value(f64),
    Undefined,
}

impl Statistic {
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Statistic::Value(v),
            _ => Statistic::Undefined,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Statistic::Value(v) => Some(*v),
            Statistic::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Statistic::Value(_))
    }

    /// The value, or `UndefinedStatistic` naming what was asked for.
    pub fn require(&self, what: &str) -> Result<f64> {
        self.value()
            .ok_or_else(|| WaterQualityError::UndefinedStatistic(what.to_string()))
    }

    pub fn rounded(&self, places: u32) -> Statistic {
        match self {
            Statistic::Value(v) => Statistic::Value(round_to(*v, places)),
            Statistic::Undefined => Statistic::Undefined,
        }
    }
}

impl Serialize for Statistic {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Statistic::Value(v) => serializer.serialize_f64(*v),
            Statistic::Undefined => serializer.serialize_str(NO_DATA),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, f.precision()) {
            (Statistic::Value(v), Some(places)) => write!(f, "{:.*}", places, v),
            (Statistic::Value(v), None) => write!(f, "{}", v),
            (Statistic::Undefined, _) => f.write_str(NO_DATA),
        }
    }
}

/// Ordered name to statistic table, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticTable(Vec<(String, Statistic)>);

impl StatisticTable {
    pub fn insert(&mut self, name: &str, statistic: Statistic) {
        match self.0.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = statistic,
            None => self.0.push((name.to_string(), statistic)),
        }
    }

    pub fn get(&self, name: &str) -> Statistic {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map_or(Statistic::Undefined, |(_, s)| *s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Statistic)> {
        self.0.iter().map(|(n, s)| (n.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy of the table with every value rounded.
    pub fn rounded(&self, places: u32) -> StatisticTable {
        StatisticTable(
            self.0
                .iter()
                .map(|(n, s)| (n.clone(), s.rounded(places)))
                .collect(),
        )
    }
}

impl Serialize for StatisticTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, statistic) in &self.0 {
            map.serialize_entry(name, statistic)?;
        }
        map.end()
    }
}

/// Full-precision statistics for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearStatistics {
    pub year: String,
    pub sample_count: usize,
    /// Samples with a defined WQI
    pub scored_count: usize,
    /// WQI followed by each limited parameter
    pub mean: StatisticTable,
    pub median: StatisticTable,
    /// `overall` followed by each limited parameter, as percentages
    pub exceeding: StatisticTable,
}

impl YearStatistics {
    /// Display copy: percentages rounded to one decimal place.
    pub fn for_display(&self) -> YearStatistics {
        YearStatistics {
            exceeding: self.exceeding.rounded(1),
            ..self.clone()
        }
    }
}

/// Compute statistics for a dataset annotated by
/// [`crate::wqi::annotate_dataset`].
///
/// WQI aggregates use only samples with a defined score. Parameter
/// aggregates use only samples that carry that reading. The overall
/// exceedance is the share of all samples with at least one parameter out
/// of range; per-parameter exceedance is relative to the samples that
/// measured the parameter.
pub fn summarize(dataset: &YearDataset, limits: &ParameterLimits) -> YearStatistics {
    let mut mean_table = StatisticTable::default();
    let mut median_table = StatisticTable::default();
    let mut exceeding = StatisticTable::default();

    let wqi_values: Vec<f64> = dataset.iter().filter_map(|s| s.wqi()).collect();
    mean_table.insert(WQI_KEY, Statistic::from_option(mean(&wqi_values)));
    median_table.insert(WQI_KEY, Statistic::from_option(median(&wqi_values)));

    let exceeding_samples = dataset.iter().filter(|s| s.exceeding_count() > 0).count();
    exceeding.insert(
        OVERALL_KEY,
        Statistic::from_option(percentage(exceeding_samples, dataset.len())),
    );

    for name in limits.names() {
        let values: Vec<f64> = dataset.iter().filter_map(|s| s.reading(name)).collect();
        mean_table.insert(name, Statistic::from_option(mean(&values)));
        median_table.insert(name, Statistic::from_option(median(&values)));
        let out_of_range = dataset
            .iter()
            .filter(|s| s.reading(name).is_some() && s.exceeds(name))
            .count();
        exceeding.insert(name, Statistic::from_option(percentage(out_of_range, values.len())));
    }

    YearStatistics {
        year: dataset.year.clone(),
        sample_count: dataset.len(),
        scored_count: wqi_values.len(),
        mean: mean_table,
        median: median_table,
        exceeding,
    }
}
