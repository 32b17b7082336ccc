//! `map` and `stats` commands.

use crate::emit;
use nwq_registry::DatasetRegistry;
use std::io::Write;

/// Write the map payload for `year`, or the error payload when either
/// year is unknown. An unknown year is still reported as a failure.
pub fn run_map<W: Write>(
    registry: &DatasetRegistry,
    year: &str,
    compare: Option<&str>,
    include_boundaries: bool,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    match registry.map_payload(year, compare, include_boundaries) {
        Ok(payload) => {
            if let Some(summary) = &payload.match_summary {
                log::info!(
                    "map: {} vs {}: {} matched, {} unmatched",
                    year,
                    summary.comparison_year,
                    summary.matched,
                    summary.unmatched
                );
            }
            if payload.excluded_samples > 0 {
                log::warn!(
                    "map: {} samples in {} had no coordinates and are not plotted",
                    payload.excluded_samples,
                    year
                );
            }
            emit(&payload, pretty, out)
        }
        Err(err) => {
            emit(&registry.error_payload(&err), pretty, out)?;
            Err(err.into())
        }
    }
}

/// Write display statistics for one year, or for all years.
pub fn run_stats<W: Write>(
    registry: &DatasetRegistry,
    year: Option<&str>,
    pretty: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let Some(year) = year else {
        return emit(&registry.statistics_payload(), pretty, out);
    };
    match registry.year_statistics(year) {
        Ok(statistics) => emit(&statistics, pretty, out),
        Err(err) => {
            emit(&registry.error_payload(&err), pretty, out)?;
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nwq_core::{ParameterLimits, WaterSample, YearDataset};
    use serde_json::Value;

    fn registry() -> DatasetRegistry {
        DatasetRegistry::from_datasets(
            vec![
                YearDataset::new(
                    "2021",
                    vec![WaterSample::new("A", 11.0, 77.0).with_reading("pH", 7.0)],
                ),
                YearDataset::new(
                    "2022",
                    vec![WaterSample::new("A", 11.00001, 77.0).with_reading("pH", 10.5)],
                ),
            ],
            ParameterLimits::default(),
        )
    }

    fn json(out: Vec<u8>) -> Value {
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn map_writes_payload() {
        let mut out = Vec::new();
        run_map(&registry(), "2022", Some("2021"), true, false, &mut out).unwrap();
        let value = json(out);
        assert_eq!(value["year"], "2022");
        assert_eq!(value["points"][0]["comparison"]["sample_id"], "A");
        assert_eq!(value["points"][0]["comparison"]["wqi_change"], -100.0);
    }

    #[test]
    fn map_unknown_year_writes_error_and_fails() {
        let mut out = Vec::new();
        let result = run_map(&registry(), "2030", None, true, false, &mut out);
        assert!(result.is_err());
        let value = json(out);
        assert_eq!(value["error"], "dataset_not_found");
        assert_eq!(value["available_years"][1], "2022");
    }

    #[test]
    fn stats_for_all_years() {
        let mut out = Vec::new();
        run_stats(&registry(), None, true, &mut out).unwrap();
        let value = json(out);
        assert_eq!(value["statistics"].as_array().unwrap().len(), 2);
        assert_eq!(value["statistics"][1]["exceeding"]["overall"], 100.0);
    }

    #[test]
    fn stats_unknown_year_fails() {
        let mut out = Vec::new();
        assert!(run_stats(&registry(), Some("1990"), false, &mut out).is_err());
        assert_eq!(json(out)["error"], "dataset_not_found");
    }
}
