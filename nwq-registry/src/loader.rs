//! File loading for [`DatasetRegistry::load`].
//!
//! Every file named by the configuration is read exactly once, here.
//! Survey CSVs are parsed with column normalization, then scored.

use crate::config::RegistryConfig;
use crate::DatasetRegistry;
use nwq_core::{
    BoundaryRegion, ParameterLimits, Result, SensorReading, WaterQualityError, YearDataset,
};
use std::fs::File;
use std::path::Path;

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| WaterQualityError::io(path, e))
}

impl DatasetRegistry {
    /// Load every configured year plus the optional boundary and sensor
    /// files, scoring samples with the default parameter limits.
    pub fn load(config: &RegistryConfig) -> Result<Self> {
        DatasetRegistry::load_with_limits(config, ParameterLimits::default())
    }

    pub fn load_with_limits(config: &RegistryConfig, limits: ParameterLimits) -> Result<Self> {
        config.validate()?;

        let mut datasets = Vec::with_capacity(config.datasets.len());
        for source in &config.datasets {
            let path = config.resolve(&source.path);
            let file = File::open(&path).map_err(|e| WaterQualityError::io(&path, e))?;
            datasets.push(YearDataset::from_reader(&source.year, file)?);
        }

        let boundaries = match &config.boundaries {
            Some(path) => BoundaryRegion::parse_geojson(&read_input(&config.resolve(path))?)?,
            None => Vec::new(),
        };
        let sensor_readings = match &config.sensor {
            Some(path) => SensorReading::parse_sensor_csv(&read_input(&config.resolve(path))?)?,
            None => Vec::new(),
        };

        let registry = DatasetRegistry::from_datasets(datasets, limits)
            .with_boundaries(boundaries)
            .with_sensor_readings(sensor_readings)
            .with_tolerance(config.tolerance);
        log::info!(
            "loader: Registry ready with years {:?}, {} boundary regions, {} sensor readings",
            registry.years(),
            registry.boundaries().len(),
            registry.sensor_readings().len()
        );
        Ok(registry)
    }
}
