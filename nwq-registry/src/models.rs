//! Payload structs handed to the external renderer.
//!
//! All structs derive `Serialize`; the CLI writes them as JSON.

use nwq_core::{BoundaryRegion, WaterQualityError};
use nwq_data::seasonal::{SeasonSummary, SensorSeries};
use nwq_data::statistics::{Statistic, YearStatistics};
use serde::Serialize;
use std::collections::BTreeMap;

/// The comparison-year sample matched to a plotted point.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonPoint {
    pub year: String,
    pub sample_id: String,
    pub wqi: Statistic,
    /// Coordinate distance to the plotted point, in degrees
    pub distance: f64,
    /// Plotted WQI minus comparison WQI; undefined if either is.
    pub wqi_change: Statistic,
}

/// One map marker.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SamplePoint {
    pub sample_id: String,
    pub lon: f64,
    pub lat: f64,
    pub wqi: Statistic,
    pub exceeding_count: usize,
    /// Names of the out-of-range parameters
    pub exceeding: Vec<String>,
    /// Every reading the sample carries, scored or not.
    pub parameters: BTreeMap<String, f64>,
    pub comparison: Option<ComparisonPoint>,
}

/// How many plotted points found a partner in the comparison year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchReport {
    pub comparison_year: String,
    pub tolerance: f64,
    pub matched: usize,
    pub unmatched: usize,
}

/// Everything needed to draw the map for one year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapPayload {
    pub year: String,
    pub comparison_year: Option<String>,
    pub points: Vec<SamplePoint>,
    /// Selected year first, then the comparison year when present
    pub statistics: Vec<YearStatistics>,
    pub match_summary: Option<MatchReport>,
    /// Rows of the selected year dropped for missing coordinates
    pub excluded_samples: usize,
    pub boundaries: Vec<BoundaryRegion>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatisticsPayload {
    pub statistics: Vec<YearStatistics>,
}

/// Chart series and seasonal summary for the sensor page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SensorPayload {
    pub parameters: Vec<String>,
    pub series: Vec<SensorSeries>,
    pub seasons: Vec<SeasonSummary>,
}

/// Rejected request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorPayload {
    pub error: String,
    pub message: String,
    pub available_years: Vec<String>,
}

impl ErrorPayload {
    pub fn from_error(err: &WaterQualityError, available_years: &[&str]) -> Self {
        let kind = match err {
            WaterQualityError::DatasetNotFound(_) => "dataset_not_found",
            WaterQualityError::MissingCoordinate { .. } => "missing_coordinate",
            WaterQualityError::UndefinedStatistic(_) => "undefined_statistic",
            WaterQualityError::Config(_) => "invalid_config",
            _ => "load_failed",
        };
        ErrorPayload {
            error: kind.to_string(),
            message: err.to_string(),
            available_years: available_years.iter().map(|y| y.to_string()).collect(),
        }
    }
}
