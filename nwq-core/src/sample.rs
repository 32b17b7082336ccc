use crate::columns::{parse_reading, ColumnMap};
use crate::error::{Result, WaterQualityError};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// One sampled water point for a reporting year.
///
/// Coordinates are always present; readings that were blank or
/// non-numeric in the source file are simply absent from `readings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterSample {
    pub sample_id: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Canonical parameter name to reading
    pub readings: BTreeMap<String, f64>,
    /// Filled in by the WQI calculation after load
    pub score: Option<WqiScore>,
}

/// WQI annotation attached to a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WqiScore {
    /// Score in [0, 100]; `None` when no limited parameter had a reading.
    pub wqi: Option<f64>,
    /// Number of evaluated parameters strictly outside their range
    pub exceeding_count: usize,
    /// Number of parameters that contributed to `wqi`
    pub evaluated: usize,
    /// Names of the parameters counted in `exceeding_count`
    pub exceeding: Vec<String>,
}

impl WaterSample {
    pub fn new(sample_id: &str, latitude: f64, longitude: f64) -> Self {
        WaterSample {
            sample_id: sample_id.to_string(),
            latitude,
            longitude,
            readings: BTreeMap::new(),
            score: None,
        }
    }

    /// Builder-style helper for adding a reading.
    pub fn with_reading(mut self, name: &str, value: f64) -> Self {
        self.readings.insert(name.to_string(), value);
        self
    }

    pub fn reading(&self, name: &str) -> Option<f64> {
        self.readings.get(name).copied()
    }

    /// WQI of an annotated sample, `None` if unscored or undefined.
    pub fn wqi(&self) -> Option<f64> {
        self.score.as_ref().and_then(|s| s.wqi)
    }

    pub fn exceeding_count(&self) -> usize {
        self.score.as_ref().map_or(0, |s| s.exceeding_count)
    }

    /// True when `name` was counted as out of range.
    pub fn exceeds(&self, name: &str) -> bool {
        self.score
            .as_ref()
            .is_some_and(|s| s.exceeding.iter().any(|n| n == name))
    }

    /// Build a sample from one CSV row. `row` is the 1-based data row
    /// number, used as the id when the file has no id column.
    fn from_record(columns: &ColumnMap, record: &StringRecord, row: usize) -> Result<WaterSample> {
        let sample_id = columns
            .sample_id
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| row.to_string(), String::from);
        let coordinate = |index: Option<usize>| index.and_then(|i| record.get(i)).and_then(parse_reading);
        let (Some(latitude), Some(longitude)) =
            (coordinate(columns.latitude), coordinate(columns.longitude))
        else {
            return Err(WaterQualityError::MissingCoordinate { sample_id, row });
        };
        let readings = columns
            .parameters
            .iter()
            .filter_map(|(i, name)| {
                record
                    .get(*i)
                    .and_then(parse_reading)
                    .map(|v| (name.clone(), v))
            })
            .collect();
        Ok(WaterSample {
            sample_id,
            latitude,
            longitude,
            readings,
            score: None,
        })
    }
}

/// All samples for one reporting year, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearDataset {
    pub year: String,
    pub samples: Vec<WaterSample>,
    /// Rows dropped at load because latitude/longitude were missing
    pub excluded_missing_coordinates: usize,
}

impl YearDataset {
    pub fn new(year: &str, samples: Vec<WaterSample>) -> Self {
        YearDataset {
            year: year.to_string(),
            samples,
            excluded_missing_coordinates: 0,
        }
    }

    /// Parse a survey CSV string into a dataset.
    ///
    /// Headers are normalized first (see [`crate::columns`]). Rows without
    /// coordinates are excluded and counted; malformed CSV is an error.
    ///
    /// # Example CSV
    /// ```text
    /// Sample ID,Latitude,Longitude,pH,Hardness,Alkalinity
    /// W01,11.4201,77.5521,7.2,180,150
    /// ```
    pub fn parse_csv(year: &str, csv_object: &str) -> Result<YearDataset> {
        YearDataset::from_reader(year, csv_object.as_bytes())
    }

    pub fn from_reader<R: Read>(year: &str, reader: R) -> Result<YearDataset> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        let columns = ColumnMap::from_headers(rdr.headers()?);
        if columns.latitude.is_none() || columns.longitude.is_none() {
            warn!("loader: {year} has no latitude/longitude column; every row will be excluded");
        }
        if columns.sample_id.is_none() {
            warn!("loader: {year} has no sample id column; using row numbers");
        }

        let mut dataset = YearDataset::new(year, Vec::new());
        for (index, result) in rdr.records().enumerate() {
            let record = result?;
            match WaterSample::from_record(&columns, &record, index + 1) {
                Ok(sample) => dataset.samples.push(sample),
                Err(e @ WaterQualityError::MissingCoordinate { .. }) => {
                    warn!("loader: {year}: {e}; excluded");
                    dataset.excluded_missing_coordinates += 1;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            "loader: Loaded {} samples for {}, excluded {} without coordinates",
            dataset.samples.len(),
            year,
            dataset.excluded_missing_coordinates
        );
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WaterSample> {
        self.samples.iter()
    }

    pub fn get(&self, index: usize) -> Option<&WaterSample> {
        self.samples.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV_2021: &str = include_str!("../../fixtures/2021.csv");
    const CSV_2022: &str = include_str!("../../fixtures/2022.csv");
    const CSV_2023: &str = include_str!("../../fixtures/2023.csv");

    #[test]
    fn test_parse_year_with_titlecase_headers() {
        let dataset = YearDataset::parse_csv("2021", CSV_2021).unwrap();
        assert_eq!(dataset.year, "2021");
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.excluded_missing_coordinates, 0);
        let first = &dataset.samples[0];
        assert_eq!(first.sample_id, "W01");
        assert!((first.latitude - 11.4201).abs() < 1e-12);
        assert!((first.longitude - 77.5521).abs() < 1e-12);
        assert_eq!(first.reading("pH"), Some(7.2));
        assert_eq!(first.reading("TDS"), Some(420.0));
        assert!(first.score.is_none());
    }

    #[test]
    fn test_blank_reading_is_missing() {
        let dataset = YearDataset::parse_csv("2021", CSV_2021).unwrap();
        let w03 = &dataset.samples[2];
        assert_eq!(w03.sample_id, "W03");
        assert_eq!(w03.reading("Hardness"), None);
        assert_eq!(w03.reading("pH"), Some(6.8));
    }

    #[test]
    fn test_missing_coordinate_rows_are_counted() {
        let dataset = YearDataset::parse_csv("2022", CSV_2022).unwrap();
        assert_eq!(dataset.len(), 5);
        assert_eq!(dataset.excluded_missing_coordinates, 1);
        assert!(dataset.iter().all(|s| s.sample_id != "W07"));
        // "PH" and "Total Hardness" land on canonical keys
        assert_eq!(dataset.samples[0].reading("pH"), Some(7.4));
        assert_eq!(dataset.samples[0].reading("Hardness"), Some(200.0));
    }

    #[test]
    fn test_short_headers_normalize() {
        let dataset = YearDataset::parse_csv("2023", CSV_2023).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.samples[0].sample_id, "1");
        assert_eq!(dataset.samples[3].reading("Alkalinity"), Some(240.0));
        assert!(dataset.samples[2].readings.is_empty());
    }

    #[test]
    fn test_row_numbers_used_without_id_column() {
        let csv = "lat,lon,pH\n11.0,77.0,7.0\n11.1,77.1,7.1\n";
        let dataset = YearDataset::parse_csv("2020", csv).unwrap();
        let ids: Vec<_> = dataset.iter().map(|s| s.sample_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_no_coordinate_columns_excludes_everything() {
        let csv = "id,pH\nA,7.0\nB,7.2\n";
        let dataset = YearDataset::parse_csv("2020", csv).unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.excluded_missing_coordinates, 2);
    }

    #[test]
    fn test_empty_csv() {
        let dataset = YearDataset::parse_csv("2020", "id,lat,lon,pH\n").unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.excluded_missing_coordinates, 0);
    }

    #[test]
    fn test_unannotated_sample_helpers() {
        let sample = WaterSample::new("X", 11.0, 77.0).with_reading("pH", 7.0);
        assert_eq!(sample.wqi(), None);
        assert_eq!(sample.exceeding_count(), 0);
        assert!(!sample.exceeds("pH"));
    }
}
