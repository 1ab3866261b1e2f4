//! Feature records evaluated by filters and data-driven properties.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geometry class of a feature, as seen by `$type` filters.
///
/// Multi-geometries collapse onto their single counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    #[default]
    Unknown,
}

impl GeometryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::Unknown => "Unknown",
        }
    }

    /// Map a GeoJSON geometry type name onto a filter geometry type.
    pub fn from_geojson(name: &str) -> Self {
        match name {
            "Point" | "MultiPoint" => GeometryType::Point,
            "LineString" | "MultiLineString" => GeometryType::LineString,
            "Polygon" | "MultiPolygon" => GeometryType::Polygon,
            _ => GeometryType::Unknown,
        }
    }
}

impl From<String> for GeometryType {
    fn from(s: String) -> Self {
        GeometryType::from_geojson(&s)
    }
}

impl From<GeometryType> for String {
    fn from(t: GeometryType) -> Self {
        t.as_str().to_string()
    }
}

/// A single geometry record with its attribute map.
///
/// Only the parts the style engine reads are modeled: the reserved
/// metadata (`$type`, `$id`) and the arbitrary properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(rename = "type", default)]
    pub geometry_type: GeometryType,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(geometry_type: GeometryType) -> Self {
        Self {
            id: None,
            geometry_type,
            properties: Map::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Value>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Look up an arbitrary property (never the reserved metadata).
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }
}
