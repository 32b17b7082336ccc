//! Seasonal summary of the IoT sensor series.

use crate::statistics::Statistic;
use nwq_core::SensorReading;
use nwq_utils::dates::{format_datetime, Season};
use nwq_utils::numbers::mean;
use serde::Serialize;
use std::fmt::Write;

/// Parameters charted when none are requested.
pub const DEFAULT_SENSOR_PARAMETERS: [&str; 2] = ["TDS", "pH"];

/// Line colour for a charted parameter.
pub fn parameter_color(parameter: &str) -> &'static str {
    match parameter {
        "TDS" => "#1f77b4",
        "pH" => "#ff7f0e",
        _ => "#000000",
    }
}

/// Mean/min/max of one parameter within one season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSummary {
    pub parameter: String,
    pub count: usize,
    pub mean: Statistic,
    pub min: Statistic,
    pub max: Statistic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonSummary {
    pub season: Season,
    pub reading_count: usize,
    pub parameters: Vec<ParameterSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub datetime: String,
    pub value: f64,
    pub season: Season,
}

/// One chartable line: every present reading of a parameter, in time order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSeries {
    pub parameter: String,
    pub color: String,
    pub points: Vec<SeriesPoint>,
}

fn summarize_parameter(readings: &[&SensorReading], parameter: &str) -> ParameterSummary {
    let values: Vec<f64> = readings.iter().filter_map(|r| r.value(parameter)).collect();
    let min = values.iter().copied().reduce(f64::min);
    let max = values.iter().copied().reduce(f64::max);
    ParameterSummary {
        parameter: parameter.to_string(),
        count: values.len(),
        mean: Statistic::from_option(mean(&values)),
        min: Statistic::from_option(min),
        max: Statistic::from_option(max),
    }
}

/// Summaries for all four seasons, Winter first. Seasons without
/// readings are still reported, with undefined figures.
pub fn summarize_seasons(readings: &[SensorReading], parameters: &[&str]) -> Vec<SeasonSummary> {
    Season::ALL
        .iter()
        .map(|season| {
            let in_season: Vec<&SensorReading> =
                readings.iter().filter(|r| r.season() == *season).collect();
            SeasonSummary {
                season: *season,
                reading_count: in_season.len(),
                parameters: parameters
                    .iter()
                    .map(|p| summarize_parameter(&in_season, p))
                    .collect(),
            }
        })
        .collect()
}

/// Chart series for each requested parameter. `readings` are expected in
/// time order, as returned by [`SensorReading::parse_sensor_csv`].
pub fn build_series(readings: &[SensorReading], parameters: &[&str]) -> Vec<SensorSeries> {
    parameters
        .iter()
        .map(|parameter| SensorSeries {
            parameter: parameter.to_string(),
            color: parameter_color(parameter).to_string(),
            points: readings
                .iter()
                .filter_map(|r| {
                    r.value(parameter).map(|value| SeriesPoint {
                        datetime: format_datetime(&r.datetime),
                        value,
                        season: r.season(),
                    })
                })
                .collect(),
        })
        .collect()
}

/// Plain-text seasonal report.
pub fn render_summary(summaries: &[SeasonSummary]) -> String {
    let mut out = String::from("Seasonal Water Quality Summary:\n");
    for summary in summaries {
        let _ = writeln!(out, "\n{} Insights:", summary.season);
        for p in &summary.parameters {
            let _ = writeln!(
                out,
                "  {}: Mean {:.2} (Range: {:.2} - {:.2})",
                p.parameter, p.mean, p.min, p.max
            );
        }
    }
    out
}
