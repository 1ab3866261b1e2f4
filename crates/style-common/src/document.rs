//! Style document model (style-spec version 8).
//!
//! Only the fields the compiler reads are typed. Everything else a document
//! carries (`metadata`, `center`, `light`, ...) is kept in `extra` so a
//! document survives a parse/serialize cycle unchanged.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StyleError, StyleResult};

/// The only style-spec version accepted.
pub const STYLE_VERSION: u64 = 8;

/// Root of a style document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDocument {
    pub version: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Data sources keyed by id
    pub sources: BTreeMap<String, SourceSpec>,

    /// Layers in draw order (later layers draw on top)
    pub layers: Vec<Layer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sprite: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyphs: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StyleDocument {
    /// Parse and validate a style document from a JSON string.
    pub fn from_json(json: &str) -> StyleResult<Self> {
        let doc: StyleDocument = serde_json::from_str(json)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Parse and validate a style document from an already-decoded value.
    pub fn from_value(value: Value) -> StyleResult<Self> {
        let doc: StyleDocument = serde_json::from_value(value)?;
        doc.validate()?;
        Ok(doc)
    }

    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> StyleResult<()> {
        if self.version != STYLE_VERSION {
            return Err(StyleError::UnsupportedVersion(self.version));
        }

        let mut seen = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(StyleError::DuplicateLayerId(layer.id.clone()));
            }
        }

        Ok(())
    }

    /// Find a layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }
}

/// Layer type as named in the style document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LayerType {
    Background,
    Fill,
    Line,
    Symbol,
    Circle,
    Raster,
    FillExtrusion,
    Heatmap,
    Hillshade,
    /// A type this engine has no default table for
    Other(String),
}

impl LayerType {
    pub fn as_str(&self) -> &str {
        match self {
            LayerType::Background => "background",
            LayerType::Fill => "fill",
            LayerType::Line => "line",
            LayerType::Symbol => "symbol",
            LayerType::Circle => "circle",
            LayerType::Raster => "raster",
            LayerType::FillExtrusion => "fill-extrusion",
            LayerType::Heatmap => "heatmap",
            LayerType::Hillshade => "hillshade",
            LayerType::Other(name) => name,
        }
    }
}

impl From<String> for LayerType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "background" => LayerType::Background,
            "fill" => LayerType::Fill,
            "line" => LayerType::Line,
            "symbol" => LayerType::Symbol,
            "circle" => LayerType::Circle,
            "raster" => LayerType::Raster,
            "fill-extrusion" => LayerType::FillExtrusion,
            "heatmap" => LayerType::Heatmap,
            "hillshade" => LayerType::Hillshade,
            _ => LayerType::Other(s),
        }
    }
}

impl From<LayerType> for String {
    fn from(t: LayerType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One visual rule of a style document.
///
/// `layer_type` is optional because a layer with `ref` takes its type from
/// the referenced layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub layer_type: Option<LayerType>,

    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(rename = "source-layer", default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxzoom: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paint: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Layer {
    pub fn new(id: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            id: id.into(),
            layer_type: Some(layer_type),
            reference: None,
            source: None,
            source_layer: None,
            minzoom: None,
            maxzoom: None,
            filter: None,
            layout: None,
            paint: None,
            extra: Map::new(),
        }
    }
}

/// A data source declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(rename = "type")]
    pub source_type: String,

    /// Link to a TileJSON document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// GeoJSON payload or a URL to one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SourceSpec {
    pub fn is_geojson(&self) -> bool {
        self.source_type == "geojson"
    }

    /// Fill in keys this source leaves unset from fetched metadata.
    ///
    /// The source's own keys win over `info`, and `type` always stays the
    /// declared one.
    pub fn merged_with(&self, info: Map<String, Value>) -> StyleResult<SourceSpec> {
        let own = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(StyleError::ParseError(format!(
                    "source did not serialize to an object: {}",
                    other
                )))
            }
        };
        let mut fields = info;
        fields.extend(own);
        fields.insert("type".to_string(), Value::String(self.source_type.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal(version: u64) -> Value {
        json!({
            "version": version,
            "sources": {"osm": {"type": "vector", "url": "mapbox://mapbox.streets"}},
            "layers": [
                {"id": "bg", "type": "background", "paint": {"background-color": "#fff"}},
                {"id": "water", "type": "fill", "source": "osm", "source-layer": "water"}
            ]
        })
    }

    #[test]
    fn test_parse_minimal_document() {
        let doc = StyleDocument::from_value(minimal(8)).unwrap();
        assert_eq!(doc.layers.len(), 2);
        assert_eq!(doc.layers[1].layer_type, Some(LayerType::Fill));
        assert_eq!(doc.layers[1].source_layer.as_deref(), Some("water"));
        assert_eq!(doc.sources["osm"].url.as_deref(), Some("mapbox://mapbox.streets"));
    }

    #[test]
    fn test_rejects_wrong_version() {
        let err = StyleDocument::from_value(minimal(7)).unwrap_err();
        assert!(matches!(err, StyleError::UnsupportedVersion(7)));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        let no_sources = json!({"version": 8, "sources": null, "layers": []});
        assert!(matches!(
            StyleDocument::from_value(no_sources),
            Err(StyleError::ParseError(_))
        ));

        let layers_object = json!({"version": 8, "sources": {}, "layers": {}});
        assert!(StyleDocument::from_value(layers_object).is_err());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let doc = json!({
            "version": 8,
            "sources": {},
            "layers": [{"id": "a", "type": "fill"}, {"id": "a", "type": "line"}]
        });
        assert!(matches!(
            StyleDocument::from_value(doc),
            Err(StyleError::DuplicateLayerId(id)) if id == "a"
        ));
    }

    #[test]
    fn test_unknown_fields_survive() {
        let mut value = minimal(8);
        value["metadata"] = json!({"editor": "x"});
        value["layers"][0]["interactive"] = json!(true);
        let doc = StyleDocument::from_value(value.clone()).unwrap();
        assert_eq!(doc.extra["metadata"], json!({"editor": "x"}));
        assert_eq!(serde_json::to_value(&doc).unwrap(), value);
    }

    #[test]
    fn test_unknown_layer_type() {
        let layer: Layer = serde_json::from_value(json!({"id": "s", "type": "sky"})).unwrap();
        assert_eq!(layer.layer_type, Some(LayerType::Other("sky".to_string())));
    }

    #[test]
    fn test_merge_source_info() {
        let source: SourceSpec = serde_json::from_value(json!({
            "type": "vector",
            "url": "https://example.com/tiles.json",
            "maxzoom": 12,
            "attribution": "mine"
        }))
        .unwrap();
        let info = json!({
            "type": "raster",
            "tiles": ["https://t/{z}/{x}/{y}.pbf"],
            "maxzoom": 14,
            "minzoom": 2,
            "attribution": "tilejson"
        });
        let Value::Object(info) = info else { unreachable!() };

        let merged = source.merged_with(info).unwrap();
        assert_eq!(merged.source_type, "vector");
        assert_eq!(merged.extra["maxzoom"], json!(12));
        assert_eq!(merged.extra["attribution"], json!("mine"));
        assert_eq!(merged.extra["minzoom"], json!(2));
        assert_eq!(merged.extra["tiles"], json!(["https://t/{z}/{x}/{y}.pbf"]));
        assert_eq!(merged.url.as_deref(), Some("https://example.com/tiles.json"));
    }
}
