//! Registry configuration.
//!
//! A registry is described by a JSON manifest naming one CSV per survey
//! year plus the optional ward boundary and sensor files:
//!
//! ```text
//! {
//!   "data_dir": "fixtures",
//!   "datasets": [{ "year": "2021", "path": "2021.csv" }],
//!   "boundaries": "wards.geojson",
//!   "sensor": "sensor.csv",
//!   "tolerance": 0.0001
//! }
//! ```
//!
//! Relative paths resolve against `data_dir`; a relative `data_dir` in a
//! manifest file resolves against the manifest's own directory.

use nwq_core::{Result, WaterQualityError};
use nwq_data::matcher::DEFAULT_TOLERANCE;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Survey years loaded when none are given.
pub const DEFAULT_YEARS: [&str; 3] = ["2021", "2022", "2023"];

/// Boundary file picked up by [`RegistryConfig::from_data_dir`].
pub const DEFAULT_BOUNDARY_FILE: &str = "wards.geojson";

/// Sensor export picked up by [`RegistryConfig::from_data_dir`].
pub const DEFAULT_SENSOR_FILE: &str = "sensor.csv";

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// One survey year and the CSV holding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSource {
    pub year: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    pub datasets: Vec<DatasetSource>,
    #[serde(default)]
    pub boundaries: Option<PathBuf>,
    #[serde(default)]
    pub sensor: Option<PathBuf>,
    /// Spatial match tolerance in degrees
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl RegistryConfig {
    /// Conventional layout: `{dir}/{year}.csv` for each year, plus
    /// `wards.geojson` and `sensor.csv` when they exist.
    pub fn from_data_dir<I, S>(data_dir: impl Into<PathBuf>, years: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let data_dir = data_dir.into();
        let datasets = years
            .into_iter()
            .map(|year| {
                let year = year.into();
                DatasetSource {
                    path: PathBuf::from(format!("{year}.csv")),
                    year,
                }
            })
            .collect();
        let optional = |name: &str| {
            data_dir
                .join(name)
                .exists()
                .then(|| PathBuf::from(name))
        };
        RegistryConfig {
            boundaries: optional(DEFAULT_BOUNDARY_FILE),
            sensor: optional(DEFAULT_SENSOR_FILE),
            data_dir,
            datasets,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Parse a manifest document. Paths are left as written.
    pub fn parse_manifest(manifest: &str) -> Result<Self> {
        serde_json::from_str(manifest)
            .map_err(|e| WaterQualityError::Config(format!("bad manifest: {e}")))
    }

    /// Read a manifest file, resolving a relative `data_dir` against the
    /// manifest's directory.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WaterQualityError::io(path, e))?;
        let mut config = RegistryConfig::parse_manifest(&text)?;
        if config.data_dir.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.data_dir = base.join(&config.data_dir);
        }
        Ok(config)
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Restrict the configured datasets to `years`, in the given order.
    pub fn select_years(mut self, years: &[String]) -> Result<Self> {
        let mut selected = Vec::with_capacity(years.len());
        for year in years {
            let source = self
                .datasets
                .iter()
                .find(|d| &d.year == year)
                .cloned()
                .ok_or_else(|| WaterQualityError::DatasetNotFound(year.clone()))?;
            selected.push(source);
        }
        self.datasets = selected;
        Ok(self)
    }

    /// Absolute paths pass through; relative ones join `data_dir`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// At least one dataset, unique years, finite non-negative tolerance.
    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(WaterQualityError::Config("no datasets configured".to_string()));
        }
        let mut seen = HashSet::new();
        for source in &self.datasets {
            if source.year.trim().is_empty() {
                return Err(WaterQualityError::Config("dataset with empty year".to_string()));
            }
            if !seen.insert(source.year.as_str()) {
                return Err(WaterQualityError::Config(format!(
                    "year {} configured twice",
                    source.year
                )));
            }
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(WaterQualityError::Config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures")
    }

    #[test]
    fn test_parse_manifest_defaults() {
        let config = RegistryConfig::parse_manifest(
            r#"{"datasets": [{"year": "2021", "path": "a.csv"}]}"#,
        )
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert!(config.boundaries.is_none());
        assert!(config.sensor.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_bad_manifest_is_config_error() {
        let err = RegistryConfig::parse_manifest("{\"datasets\": 3}").unwrap_err();
        assert!(matches!(err, WaterQualityError::Config(_)));
    }

    #[test]
    fn test_manifest_file_resolves_against_its_directory() {
        let config = RegistryConfig::from_manifest(&fixtures_dir().join("manifest.json")).unwrap();
        assert_eq!(config.datasets.len(), 3);
        let resolved = config.resolve(&config.datasets[0].path);
        assert!(resolved.exists(), "{} should exist", resolved.display());
    }

    #[test]
    fn test_from_data_dir_conventions() {
        let config = RegistryConfig::from_data_dir(fixtures_dir(), DEFAULT_YEARS);
        let years: Vec<_> = config.datasets.iter().map(|d| d.year.as_str()).collect();
        assert_eq!(years, DEFAULT_YEARS.to_vec());
        assert_eq!(config.datasets[1].path, PathBuf::from("2022.csv"));
        assert_eq!(config.boundaries, Some(PathBuf::from(DEFAULT_BOUNDARY_FILE)));
        assert_eq!(config.sensor, Some(PathBuf::from(DEFAULT_SENSOR_FILE)));

        let empty = RegistryConfig::from_data_dir("/nonexistent", ["2021"]);
        assert!(empty.boundaries.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let none = RegistryConfig::from_data_dir(".", Vec::<String>::new());
        assert!(none.validate().is_err());

        let twice = RegistryConfig::from_data_dir(".", ["2021", "2021"]);
        assert!(twice.validate().is_err());

        let negative = RegistryConfig::from_data_dir(".", ["2021"]).with_tolerance(-1.0);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_select_years() {
        let config = RegistryConfig::from_data_dir(".", DEFAULT_YEARS);
        let selected = config
            .clone()
            .select_years(&["2023".to_string(), "2021".to_string()])
            .unwrap();
        let years: Vec<_> = selected.datasets.iter().map(|d| d.year.as_str()).collect();
        assert_eq!(years, vec!["2023", "2021"]);

        let err = config.select_years(&["1999".to_string()]).unwrap_err();
        assert!(matches!(err, WaterQualityError::DatasetNotFound(_)));
    }

    #[test]
    fn test_resolve_absolute_paths_untouched() {
        let config = RegistryConfig::from_data_dir("data", ["2021"]);
        assert_eq!(config.resolve(Path::new("/tmp/x.csv")), PathBuf::from("/tmp/x.csv"));
        assert_eq!(config.resolve(Path::new("x.csv")), PathBuf::from("data/x.csv"));
    }
}
