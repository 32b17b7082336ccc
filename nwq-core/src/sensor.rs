use crate::columns::{parse_reading, normalize_header, Column};
use crate::error::{Result, WaterQualityError};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use log::info;
use nwq_utils::dates::{parse_datetime, Season};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row from the IoT logger export (`Datetime,TDS,pH,...`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub datetime: NaiveDateTime,
    /// Canonical parameter name to value; blank cells are absent
    pub values: BTreeMap<String, f64>,
}

impl SensorReading {
    pub fn value(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn season(&self) -> Season {
        Season::for_datetime(&self.datetime)
    }

    /// Parse the logger CSV, returning readings sorted by datetime.
    ///
    /// The `Datetime` column is required and every row must carry a
    /// timestamp in one of the layouts accepted by
    /// [`nwq_utils::dates::parse_datetime`].
    pub fn parse_sensor_csv(csv_object: &str) -> Result<Vec<SensorReading>> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(csv_object.as_bytes());

        let mut datetime_index = None;
        let mut parameters: Vec<(usize, String)> = Vec::new();
        for (index, header) in rdr.headers()?.iter().enumerate() {
            match normalize_header(header) {
                Column::Datetime => {
                    datetime_index.get_or_insert(index);
                }
                Column::Parameter(name) if !name.is_empty() => parameters.push((index, name)),
                _ => {}
            }
        }
        let datetime_index =
            datetime_index.ok_or_else(|| WaterQualityError::MissingColumn("Datetime".to_string()))?;

        let mut readings = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let datetime = parse_datetime(record.get(datetime_index).unwrap_or(""))?;
            let values = parameters
                .iter()
                .filter_map(|(i, name)| {
                    record
                        .get(*i)
                        .and_then(parse_reading)
                        .map(|v| (name.clone(), v))
                })
                .collect();
            readings.push(SensorReading { datetime, values });
        }
        readings.sort_by_key(|r| r.datetime);
        info!("sensor: Loaded {} readings", readings.len());
        Ok(readings)
    }
}
