//! Common style documents used across the test suite.
//!
//! Every fixture is a `serde_json::Value` so tests can tweak it before
//! parsing.

use std::io::Write;

use serde_json::{json, Value};
use style_common::StyleDocument;
use tempfile::NamedTempFile;

/// A small street style: a background, a `ref` chain, a data-driven
/// extrusion, a zoom-dependent road width and a filtered label layer.
pub fn streets_style() -> Value {
    json!({
        "version": 8,
        "name": "Test Streets",
        "sprite": "mapbox://sprites/test/streets",
        "glyphs": "mapbox://fonts/test/{fontstack}/{range}.pbf",
        "sources": {
            "composite": {"type": "vector", "url": "mapbox://mapbox.mapbox-streets-v8"}
        },
        "layers": [
            {
                "id": "background",
                "type": "background",
                "paint": {"background-color": "#f8f4f0"}
            },
            {
                "id": "park",
                "type": "fill",
                "source": "composite",
                "source-layer": "landuse",
                "filter": ["all", ["==", "class", "park"], ["!=", "type", "water"]],
                "paint": {"fill-color": "#d8e8c8", "fill-opacity": 0.8}
            },
            {
                "id": "park-outline",
                "ref": "park",
                "paint": {"fill-color": "#a0c080"}
            },
            {
                "id": "road",
                "type": "line",
                "source": "composite",
                "source-layer": "road",
                "minzoom": 5,
                "layout": {"line-cap": "round", "line-join": "round"},
                "paint": {
                    "line-width": {"base": 1.5, "stops": [[5, 0.5], [18, 20]]},
                    "line-color": {"stops": [[5, "#ffffff"], [10, "#ffcc00"]]}
                }
            },
            {
                "id": "building",
                "type": "fill-extrusion",
                "source": "composite",
                "source-layer": "building",
                "minzoom": 15,
                "paint": {
                    "fill-extrusion-height": {
                        "property": "height",
                        "stops": [[0, 0], [100, 100]]
                    },
                    "fill-extrusion-color": {
                        "property": "height",
                        "stops": [[{"zoom": 15, "value": 0}, "#dddddd"], [{"zoom": 15, "value": 50}, "#aaaaaa"],
                                  [{"zoom": 18, "value": 0}, "#cccccc"], [{"zoom": 18, "value": 50}, "#888888"]]
                    }
                }
            },
            {
                "id": "place-label",
                "type": "symbol",
                "source": "composite",
                "source-layer": "place_label",
                "filter": ["in", "class", "city", "town"],
                "layout": {"text-field": "{name}", "text-size": 14}
            }
        ]
    })
}

/// A style with one raster source backed by a TileJSON URL and one inline
/// GeoJSON source referenced by URL.
pub fn linked_sources_style() -> Value {
    json!({
        "version": 8,
        "sources": {
            "satellite": {"type": "raster", "url": "mapbox://mapbox.satellite", "tileSize": 256},
            "points": {"type": "geojson", "data": "https://example.com/points.geojson"},
            "inline": {"type": "geojson", "data": {"type": "FeatureCollection", "features": []}}
        },
        "layers": [
            {"id": "sat", "type": "raster", "source": "satellite"},
            {"id": "pts", "type": "circle", "source": "points"}
        ]
    })
}

/// Smallest valid document.
pub fn empty_style() -> Value {
    json!({"version": 8, "sources": {}, "layers": []})
}

/// Parse a fixture, panicking on failure.
pub fn parse_style(value: Value) -> StyleDocument {
    match StyleDocument::from_value(value) {
        Ok(doc) => doc,
        Err(e) => panic!("fixture failed to parse: {}", e),
    }
}

/// Write a style to a temp file that lives as long as the returned handle.
pub fn write_style_file(value: &Value) -> NamedTempFile {
    let mut file = match NamedTempFile::new() {
        Ok(f) => f,
        Err(e) => panic!("failed to create temp file: {}", e),
    };
    if let Err(e) = file.write_all(value.to_string().as_bytes()) {
        panic!("failed to write temp style: {}", e);
    }
    file
}
