//! Header normalization for the survey CSVs.
//!
//! The yearly survey files were produced by different people and disagree
//! on column names ("Latitude" vs "lat", "PH" vs "pH", "Total Hardness" vs
//! "Hardness"). Every header is mapped onto one canonical key before any
//! row is read.

use csv::StringRecord;

/// Canonical name of the pH parameter.
pub const PH: &str = "pH";
/// Canonical name of the hardness parameter (mg/L as CaCO3).
pub const HARDNESS: &str = "Hardness";
/// Canonical name of the alkalinity parameter (mg/L as CaCO3).
pub const ALKALINITY: &str = "Alkalinity";

/// What a header refers to once normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    SampleId,
    Latitude,
    Longitude,
    Datetime,
    Parameter(String),
}

/// Map a raw header onto its canonical column.
///
/// Matching is trimmed and case-insensitive. Unknown headers are kept
/// (trimmed) as parameter names.
pub fn normalize_header(header: &str) -> Column {
    let trimmed = header.trim_start_matches('\u{feff}').trim();
    let lowered = trimmed.to_lowercase();
    match lowered.as_str() {
        "sample_id" | "sample id" | "sampleid" | "sample" | "id" | "s.no" | "s.no." | "sno"
        | "s no" => Column::SampleId,
        "latitude" | "lat" => Column::Latitude,
        "longitude" | "lon" | "long" | "lng" => Column::Longitude,
        "datetime" | "date time" | "date_time" | "timestamp" => Column::Datetime,
        "ph" => Column::Parameter(PH.to_string()),
        "hardness" | "total hardness" | "total_hardness" => Column::Parameter(HARDNESS.to_string()),
        "alkalinity" | "total alkalinity" | "total_alkalinity" => {
            Column::Parameter(ALKALINITY.to_string())
        }
        _ => Column::Parameter(trimmed.to_string()),
    }
}

/// Positions of the canonical columns within one CSV header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    pub sample_id: Option<usize>,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    pub datetime: Option<usize>,
    /// (field index, canonical parameter name), in header order.
    pub parameters: Vec<(usize, String)>,
}

impl ColumnMap {
    /// Build the map from a header record. When two headers normalize to
    /// the same key, the leftmost one wins.
    pub fn from_headers(headers: &StringRecord) -> ColumnMap {
        let mut map = ColumnMap::default();
        for (index, header) in headers.iter().enumerate() {
            match normalize_header(header) {
                Column::SampleId => {
                    map.sample_id.get_or_insert(index);
                }
                Column::Latitude => {
                    map.latitude.get_or_insert(index);
                }
                Column::Longitude => {
                    map.longitude.get_or_insert(index);
                }
                Column::Datetime => {
                    map.datetime.get_or_insert(index);
                }
                Column::Parameter(name) => {
                    if name.is_empty() || map.parameters.iter().any(|(_, n)| *n == name) {
                        continue;
                    }
                    map.parameters.push((index, name));
                }
            }
        }
        map
    }
}

/// Parse a numeric cell. Blank cells and the usual placeholders
/// ("NA", "n/a", "null", "-") are missing, as is anything non-finite.
pub fn parse_reading(cell: &str) -> Option<f64> {
    let lowered = cell.trim().to_lowercase();
    match lowered.as_str() {
        "" | "na" | "n/a" | "null" | "nan" | "-" | "--" | "---" => None,
        s => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_variants_unify() {
        assert_eq!(normalize_header("Latitude"), Column::Latitude);
        assert_eq!(normalize_header(" latitude "), Column::Latitude);
        assert_eq!(normalize_header("LAT"), Column::Latitude);
        assert_eq!(normalize_header("Longitude"), Column::Longitude);
        assert_eq!(normalize_header("Long"), Column::Longitude);
        assert_eq!(normalize_header("lng"), Column::Longitude);
    }

    #[test]
    fn test_parameter_variants_unify() {
        assert_eq!(normalize_header("PH"), Column::Parameter(PH.to_string()));
        assert_eq!(
            normalize_header("Total Hardness"),
            Column::Parameter(HARDNESS.to_string())
        );
        assert_eq!(
            normalize_header("total alkalinity"),
            Column::Parameter(ALKALINITY.to_string())
        );
        assert_eq!(normalize_header(" TDS "), Column::Parameter("TDS".to_string()));
    }

    #[test]
    fn test_sample_id_variants() {
        for header in ["Sample ID", "sample_id", "S.No", "id", "\u{feff}Sample"] {
            assert_eq!(normalize_header(header), Column::SampleId, "{header}");
        }
    }

    #[test]
    fn test_column_map_first_duplicate_wins() {
        let headers = StringRecord::from(vec!["id", "lat", "Latitude", "lon", "pH", "PH", "TDS"]);
        let map = ColumnMap::from_headers(&headers);
        assert_eq!(map.sample_id, Some(0));
        assert_eq!(map.latitude, Some(1));
        assert_eq!(map.longitude, Some(3));
        assert_eq!(
            map.parameters,
            vec![(4, PH.to_string()), (6, "TDS".to_string())]
        );
    }

    #[test]
    fn test_parse_reading() {
        assert_eq!(parse_reading(" 7.25 "), Some(7.25));
        assert_eq!(parse_reading(""), None);
        assert_eq!(parse_reading("NA"), None);
        assert_eq!(parse_reading("n/a"), None);
        assert_eq!(parse_reading("NaN"), None);
        assert_eq!(parse_reading("inf"), None);
        assert_eq!(parse_reading("abc"), None);
    }
}
