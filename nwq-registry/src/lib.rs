//! Dataset registry and payload assembly for the water quality map.
//!
//! The registry is built once at process start with an explicit load step
//! ([`DatasetRegistry::load`]), which reads every configured survey year,
//! the ward boundaries and the sensor export, and scores every sample.
//! After that it is read-only: query methods take `&self`, do no I/O, and
//! the registry can be shared across threads behind an `Arc`.
//!
//! # Usage
//!
//! ```rust
//! use nwq_core::{ParameterLimits, YearDataset};
//! use nwq_registry::DatasetRegistry;
//!
//! let y2021 = YearDataset::parse_csv("2021", "id,lat,lon,pH\nW01,11.42,77.55,7.2\n").unwrap();
//! let y2022 = YearDataset::parse_csv("2022", "id,lat,lon,pH\nW01,11.42,77.55,9.1\n").unwrap();
//! let registry = DatasetRegistry::from_datasets(vec![y2021, y2022], ParameterLimits::default());
//!
//! let payload = registry.map_payload("2022", Some("2021"), false).unwrap();
//! assert_eq!(payload.points.len(), 1);
//! assert!(payload.points[0].comparison.is_some());
//! assert!(registry.get("1999").is_err());
//! ```

pub mod config;
mod loader;
pub mod models;
mod queries;

pub use config::{DatasetSource, RegistryConfig};

use nwq_core::{
    BoundaryRegion, ParameterLimits, Result, SensorReading, WaterQualityError, YearDataset,
};
use nwq_data::matcher::DEFAULT_TOLERANCE;
use nwq_data::wqi::annotate_dataset;

/// Scored datasets for every configured year, plus overlay and sensor data.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    /// In configured (year) order
    datasets: Vec<YearDataset>,
    limits: ParameterLimits,
    boundaries: Vec<BoundaryRegion>,
    sensor_readings: Vec<SensorReading>,
    tolerance: f64,
}

impl DatasetRegistry {
    /// Build a registry from already-parsed datasets, scoring each one
    /// against `limits`.
    pub fn from_datasets(mut datasets: Vec<YearDataset>, limits: ParameterLimits) -> Self {
        for dataset in &mut datasets {
            annotate_dataset(dataset, &limits);
        }
        DatasetRegistry {
            datasets,
            limits,
            boundaries: Vec::new(),
            sensor_readings: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_boundaries(mut self, boundaries: Vec<BoundaryRegion>) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_sensor_readings(mut self, readings: Vec<SensorReading>) -> Self {
        self.sensor_readings = readings;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Dataset for `year`, or `DatasetNotFound`.
    pub fn get(&self, year: &str) -> Result<&YearDataset> {
        self.datasets
            .iter()
            .find(|d| d.year == year)
            .ok_or_else(|| WaterQualityError::DatasetNotFound(year.to_string()))
    }

    /// Configured years, in order.
    pub fn years(&self) -> Vec<&str> {
        self.datasets.iter().map(|d| d.year.as_str()).collect()
    }

    pub fn datasets(&self) -> &[YearDataset] {
        &self.datasets
    }

    pub fn limits(&self) -> &ParameterLimits {
        &self.limits
    }

    pub fn boundaries(&self) -> &[BoundaryRegion] {
        &self.boundaries
    }

    pub fn sensor_readings(&self) -> &[SensorReading] {
        &self.sensor_readings
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
