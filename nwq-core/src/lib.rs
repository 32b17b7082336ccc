//! Core types for the Nallampatti water quality toolkit.
//!
//! Holds the sample/dataset model, the acceptable-range table used by the
//! WQI calculation, the ward boundary overlay and the IoT sensor readings,
//! along with the CSV and GeoJSON parsing that produces them.

pub mod boundary;
pub mod columns;
pub mod error;
pub mod limits;
pub mod sample;
pub mod sensor;

pub use boundary::BoundaryRegion;
pub use error::{Result, WaterQualityError};
pub use limits::{ParameterLimit, ParameterLimits};
pub use sample::{WaterSample, WqiScore, YearDataset};
pub use sensor::SensorReading;
