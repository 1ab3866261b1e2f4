//! Default layout and paint values per layer type (style-spec v8).
//!
//! Properties without a documented default (patterns, `icon-image`,
//! `fill-outline-color`, ...) are left out; they only appear in a compiled
//! layer when the style sets them.

use serde_json::{json, Map, Value};
use style_common::LayerType;

/// Default tables for one layer type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerDefaults {
    pub layout: Map<String, Value>,
    pub paint: Map<String, Value>,
}

impl LayerDefaults {
    /// Defaults for a layer type. Unknown types get empty tables.
    pub fn for_type(layer_type: &LayerType) -> Self {
        Self {
            layout: layout_defaults(layer_type),
            paint: paint_defaults(layer_type),
        }
    }

    /// Defaults for an optional type (a layer whose `ref` did not resolve
    /// has no type).
    pub fn for_layer_type(layer_type: Option<&LayerType>) -> Self {
        layer_type.map(Self::for_type).unwrap_or_default()
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Layout defaults for a layer type.
pub fn layout_defaults(layer_type: &LayerType) -> Map<String, Value> {
    let table = match layer_type {
        LayerType::Line => json!({
            "visibility": "visible",
            "line-cap": "butt",
            "line-join": "miter",
            "line-miter-limit": 2,
            "line-round-limit": 1.05
        }),
        LayerType::Symbol => json!({
            "visibility": "visible",
            "symbol-placement": "point",
            "symbol-spacing": 250,
            "symbol-avoid-edges": false,
            "symbol-z-order": "auto",
            "icon-allow-overlap": false,
            "icon-ignore-placement": false,
            "icon-optional": false,
            "icon-rotation-alignment": "auto",
            "icon-size": 1,
            "icon-text-fit": "none",
            "icon-text-fit-padding": [0, 0, 0, 0],
            "icon-rotate": 0,
            "icon-padding": 2,
            "icon-keep-upright": false,
            "icon-offset": [0, 0],
            "icon-anchor": "center",
            "icon-pitch-alignment": "auto",
            "text-pitch-alignment": "auto",
            "text-rotation-alignment": "auto",
            "text-field": "",
            "text-font": ["Open Sans Regular", "Arial Unicode MS Regular"],
            "text-size": 16,
            "text-max-width": 10,
            "text-line-height": 1.2,
            "text-letter-spacing": 0,
            "text-justify": "center",
            "text-anchor": "center",
            "text-max-angle": 45,
            "text-rotate": 0,
            "text-padding": 2,
            "text-keep-upright": true,
            "text-transform": "none",
            "text-offset": [0, 0],
            "text-allow-overlap": false,
            "text-ignore-placement": false,
            "text-optional": false
        }),
        LayerType::Background
        | LayerType::Fill
        | LayerType::Circle
        | LayerType::Raster
        | LayerType::FillExtrusion
        | LayerType::Heatmap
        | LayerType::Hillshade => json!({ "visibility": "visible" }),
        LayerType::Other(_) => json!({}),
    };
    into_map(table)
}

/// Paint defaults for a layer type.
pub fn paint_defaults(layer_type: &LayerType) -> Map<String, Value> {
    let table = match layer_type {
        LayerType::Background => json!({
            "background-color": "#000000",
            "background-opacity": 1
        }),
        LayerType::Fill => json!({
            "fill-antialias": true,
            "fill-opacity": 1,
            "fill-color": "#000000",
            "fill-translate": [0, 0],
            "fill-translate-anchor": "map"
        }),
        LayerType::Line => json!({
            "line-opacity": 1,
            "line-color": "#000000",
            "line-translate": [0, 0],
            "line-translate-anchor": "map",
            "line-width": 1,
            "line-gap-width": 0,
            "line-offset": 0,
            "line-blur": 0
        }),
        LayerType::Symbol => json!({
            "icon-opacity": 1,
            "icon-color": "#000000",
            "icon-halo-color": "rgba(0, 0, 0, 0)",
            "icon-halo-width": 0,
            "icon-halo-blur": 0,
            "icon-translate": [0, 0],
            "icon-translate-anchor": "map",
            "text-opacity": 1,
            "text-color": "#000000",
            "text-halo-color": "rgba(0, 0, 0, 0)",
            "text-halo-width": 0,
            "text-halo-blur": 0,
            "text-translate": [0, 0],
            "text-translate-anchor": "map"
        }),
        LayerType::Circle => json!({
            "circle-radius": 5,
            "circle-color": "#000000",
            "circle-blur": 0,
            "circle-opacity": 1,
            "circle-translate": [0, 0],
            "circle-translate-anchor": "map",
            "circle-pitch-scale": "map",
            "circle-pitch-alignment": "viewport",
            "circle-stroke-width": 0,
            "circle-stroke-color": "#000000",
            "circle-stroke-opacity": 1
        }),
        LayerType::Raster => json!({
            "raster-opacity": 1,
            "raster-hue-rotate": 0,
            "raster-brightness-min": 0,
            "raster-brightness-max": 1,
            "raster-saturation": 0,
            "raster-contrast": 0,
            "raster-resampling": "linear",
            "raster-fade-duration": 300
        }),
        LayerType::FillExtrusion => json!({
            "fill-extrusion-opacity": 1,
            "fill-extrusion-color": "#000000",
            "fill-extrusion-translate": [0, 0],
            "fill-extrusion-translate-anchor": "map",
            "fill-extrusion-height": 0,
            "fill-extrusion-base": 0,
            "fill-extrusion-vertical-gradient": true
        }),
        LayerType::Heatmap => json!({
            "heatmap-radius": 30,
            "heatmap-weight": 1,
            "heatmap-intensity": 1,
            "heatmap-opacity": 1
        }),
        LayerType::Hillshade => json!({
            "hillshade-illumination-direction": 335,
            "hillshade-illumination-anchor": "viewport",
            "hillshade-exaggeration": 0.5,
            "hillshade-shadow-color": "#000000",
            "hillshade-highlight-color": "#FFFFFF",
            "hillshade-accent-color": "#000000"
        }),
        LayerType::Other(_) => json!({}),
    };
    into_map(table)
}
