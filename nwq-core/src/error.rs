/// Error types for the water quality core
use nwq_utils::error::DateError;
use thiserror::Error;

/// Main error type for loading and querying water quality data
#[derive(Error, Debug)]
pub enum WaterQualityError {
    /// Requested year is not in the registry
    #[error("No dataset loaded for year {0}")]
    DatasetNotFound(String),

    /// A sample row without usable latitude/longitude
    #[error("Sample {sample_id} (row {row}) is missing latitude/longitude")]
    MissingCoordinate { sample_id: String, row: usize },

    /// Mean/median/WQI requested over zero eligible values
    #[error("Statistic is undefined: {0}")]
    UndefinedStatistic(String),

    /// A required column is absent from the input header
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to read an input file
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the boundary file
    #[error("Failed to parse GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Sensor timestamp in an unknown layout
    #[error("Failed to parse date: {0}")]
    DateParse(#[from] DateError),

    /// Invalid registry configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Type alias for Results using WaterQualityError
pub type Result<T> = std::result::Result<T, WaterQualityError>;

impl WaterQualityError {
    /// Wrap an I/O failure with the path that caused it.
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        WaterQualityError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
