use crate::error::Result;
use geojson::{Feature, GeoJson, Geometry, Value};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Property keys checked, in order, for a region's display name.
const NAME_KEYS: [&str; 8] = [
    "name", "Name", "NAME", "ward", "Ward", "WARD", "ward_name", "WARD_NAME",
];

/// A named ward outline used as map overlay.
///
/// `vertices` are `[longitude, latitude]` pairs in file order. Multi-part
/// geometries are split into one region per part, all sharing the name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryRegion {
    pub name: String,
    pub vertices: Vec<[f64; 2]>,
}

impl BoundaryRegion {
    /// Parse a GeoJSON document (FeatureCollection, single Feature or bare
    /// Geometry) into boundary regions.
    ///
    /// Polygons contribute their outer ring, line strings their vertices.
    /// Point geometries carry no outline and are skipped.
    pub fn parse_geojson(geojson_object: &str) -> Result<Vec<BoundaryRegion>> {
        let geojson: GeoJson = geojson_object.parse()?;
        let features = match geojson {
            GeoJson::FeatureCollection(collection) => collection.features,
            GeoJson::Feature(feature) => vec![feature],
            GeoJson::Geometry(geometry) => vec![Feature::from(geometry)],
        };

        let mut regions = Vec::new();
        for (index, feature) in features.iter().enumerate() {
            let name = feature_name(feature).unwrap_or_else(|| format!("Region {}", index + 1));
            match &feature.geometry {
                Some(geometry) => collect_outlines(&name, geometry, &mut regions),
                None => debug!("boundary: feature {name} has no geometry"),
            }
        }
        info!("boundary: Loaded {} regions", regions.len());
        Ok(regions)
    }
}

fn feature_name(feature: &Feature) -> Option<String> {
    NAME_KEYS
        .iter()
        .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn to_vertices(positions: &[Vec<f64>]) -> Vec<[f64; 2]> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| [p[0], p[1]])
        .collect()
}

fn push_region(name: &str, positions: &[Vec<f64>], regions: &mut Vec<BoundaryRegion>) {
    let vertices = to_vertices(positions);
    if !vertices.is_empty() {
        regions.push(BoundaryRegion {
            name: name.to_string(),
            vertices,
        });
    }
}

fn collect_outlines(name: &str, geometry: &Geometry, regions: &mut Vec<BoundaryRegion>) {
    match &geometry.value {
        Value::Polygon(rings) => {
            if let Some(outer) = rings.first() {
                push_region(name, outer, regions);
            }
        }
        Value::MultiPolygon(polygons) => {
            for outer in polygons.iter().filter_map(|rings| rings.first()) {
                push_region(name, outer, regions);
            }
        }
        Value::LineString(line) => push_region(name, line, regions),
        Value::MultiLineString(lines) => {
            for line in lines {
                push_region(name, line, regions);
            }
        }
        Value::GeometryCollection(geometries) => {
            for inner in geometries {
                collect_outlines(name, inner, regions);
            }
        }
        Value::Point(_) | Value::MultiPoint(_) => {
            debug!("boundary: skipping point geometry for {name}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WARDS: &str = include_str!("../../fixtures/wards.geojson");

    #[test]
    fn test_parse_ward_fixture() {
        let regions = BoundaryRegion::parse_geojson(WARDS).unwrap();
        let names: Vec<_> = regions.iter().map(|r| r.name.as_str()).collect();
        // Ward 2 is a two-part MultiPolygon; the Point feature is dropped
        assert_eq!(names, vec!["Ward 1", "Ward 2", "Ward 2", "Ward 3 boundary"]);
        assert_eq!(regions[0].vertices.len(), 5);
        assert_eq!(regions[0].vertices[0], [77.5490, 11.4170]);
        assert_eq!(regions[3].vertices.len(), 3);
    }

    #[test]
    fn test_unnamed_geometry_gets_positional_name() {
        let doc = r#"{"type":"Polygon","coordinates":[[[77.0,11.0],[77.1,11.0],[77.1,11.1],[77.0,11.0]]]}"#;
        let regions = BoundaryRegion::parse_geojson(doc).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Region 1");
    }

    #[test]
    fn test_invalid_geojson_is_an_error() {
        assert!(BoundaryRegion::parse_geojson("{\"type\": \"Nope\"}").is_err());
        assert!(BoundaryRegion::parse_geojson("not json").is_err());
    }
}
