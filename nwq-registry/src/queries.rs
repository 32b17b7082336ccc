//! Per-request payload queries.
//!
//! These run against the already-loaded registry and never touch the
//! file system.

use crate::models::{
    ComparisonPoint, ErrorPayload, MapPayload, MatchReport, SamplePoint, SensorPayload,
    StatisticsPayload,
};
use crate::DatasetRegistry;
use nwq_core::{Result, WaterQualityError, WaterSample};
use nwq_data::matcher::{match_datasets, MatchSet};
use nwq_data::seasonal::{build_series, summarize_seasons};
use nwq_data::statistics::{summarize, Statistic, YearStatistics};

fn sample_point(sample: &WaterSample) -> SamplePoint {
    SamplePoint {
        sample_id: sample.sample_id.clone(),
        lon: sample.longitude,
        lat: sample.latitude,
        wqi: Statistic::from_option(sample.wqi()),
        exceeding_count: sample.exceeding_count(),
        exceeding: sample
            .score
            .as_ref()
            .map(|s| s.exceeding.clone())
            .unwrap_or_default(),
        parameters: sample.readings.clone(),
        comparison: None,
    }
}

impl DatasetRegistry {
    /// Link every sample of `base_year` to its location partner in
    /// `target_year`, using the registry's tolerance.
    pub fn match_years(&self, base_year: &str, target_year: &str) -> Result<MatchSet> {
        let base = self.get(base_year)?;
        let target = self.get(target_year)?;
        Ok(match_datasets(base, target, self.tolerance))
    }

    /// Display statistics (percentages at one decimal place) for a year.
    pub fn year_statistics(&self, year: &str) -> Result<YearStatistics> {
        let dataset = self.get(year)?;
        Ok(summarize(dataset, &self.limits).for_display())
    }

    /// Display statistics for every year in configured order.
    pub fn statistics_payload(&self) -> StatisticsPayload {
        StatisticsPayload {
            statistics: self
                .datasets
                .iter()
                .map(|d| summarize(d, &self.limits).for_display())
                .collect(),
        }
    }

    /// Markers and statistics for `year`, optionally compared against
    /// `comparison_year`. Both years must be loaded.
    pub fn map_payload(
        &self,
        year: &str,
        comparison_year: Option<&str>,
        include_boundaries: bool,
    ) -> Result<MapPayload> {
        let dataset = self.get(year)?;
        let mut points: Vec<SamplePoint> = dataset.iter().map(sample_point).collect();
        let mut statistics = vec![self.year_statistics(year)?];
        let mut match_summary = None;

        if let Some(comparison_year) = comparison_year {
            let comparison = self.get(comparison_year)?;
            let matches = self.match_years(year, comparison_year)?;
            for (point, found) in points.iter_mut().zip(&matches.matches) {
                let Some(found) = found else { continue };
                let partner = &comparison.samples[found.target_index];
                let wqi = Statistic::from_option(partner.wqi());
                let wqi_change = match (point.wqi, wqi) {
                    (Statistic::Value(now), Statistic::Value(then)) => Statistic::Value(now - then),
                    _ => Statistic::Undefined,
                };
                point.comparison = Some(ComparisonPoint {
                    year: comparison_year.to_string(),
                    sample_id: partner.sample_id.clone(),
                    wqi,
                    distance: found.distance,
                    wqi_change,
                });
            }
            let summary = matches.summary();
            match_summary = Some(MatchReport {
                comparison_year: comparison_year.to_string(),
                tolerance: matches.tolerance,
                matched: summary.matched,
                unmatched: summary.unmatched,
            });
            statistics.push(self.year_statistics(comparison_year)?);
        }

        log::debug!(
            "query: map_payload {} (comparison {:?}) returned {} points",
            year,
            comparison_year,
            points.len()
        );
        Ok(MapPayload {
            year: year.to_string(),
            comparison_year: comparison_year.map(str::to_string),
            points,
            statistics,
            match_summary,
            excluded_samples: dataset.excluded_missing_coordinates,
            boundaries: if include_boundaries {
                self.boundaries.clone()
            } else {
                Vec::new()
            },
        })
    }

    /// Sensor chart series and seasonal summary for `parameters`.
    pub fn sensor_payload(&self, parameters: &[&str]) -> SensorPayload {
        SensorPayload {
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            series: build_series(&self.sensor_readings, parameters),
            seasons: summarize_seasons(&self.sensor_readings, parameters),
        }
    }

    /// Error payload listing the years that can be requested.
    pub fn error_payload(&self, err: &WaterQualityError) -> ErrorPayload {
        ErrorPayload::from_error(err, &self.years())
    }
}
