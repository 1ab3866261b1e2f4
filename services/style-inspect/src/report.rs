//! JSON report of a compiled style evaluated at one zoom and feature.

use serde::Serialize;
use serde_json::{Map, Value};
use style_common::{Diagnostic, Feature};
use style_compiler::{describe_evaluators, CompiledLayer, CompiledStyle, PropertyEvaluators};
use style_links::LoadedStyle;

#[derive(Debug, Serialize)]
pub struct StyleReport {
    pub name: Option<String>,
    pub zoom: f64,
    pub sources: Vec<String>,
    pub glyphs: Option<String>,
    pub sprite: Option<SpriteReport>,
    pub layers: Vec<LayerReport>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct SpriteReport {
    pub width: u32,
    pub height: u32,
    pub icons: usize,
}

#[derive(Debug, Serialize)]
pub struct LayerReport {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: Option<String>,
    pub source: Option<String>,
    #[serde(rename = "source-layer")]
    pub source_layer: Option<String>,
    pub visible: bool,
    pub matches: bool,
    pub layout: Map<String, Value>,
    pub paint: Map<String, Value>,
    /// Property name -> constant, zoom, property or zoom-and-property
    pub functions: Map<String, Value>,
}

fn evaluate_all(evaluators: &PropertyEvaluators, zoom: f64, feature: &Feature) -> Map<String, Value> {
    evaluators
        .iter()
        .map(|(name, e)| (name.clone(), e.evaluate(zoom, feature).to_json()))
        .collect()
}

impl LayerReport {
    pub fn new(layer: &CompiledLayer, zoom: f64, feature: &Feature) -> Self {
        let mut functions = describe_evaluators(&layer.layout);
        functions.extend(describe_evaluators(&layer.paint));

        Self {
            id: layer.id.clone(),
            layer_type: layer.layer_type.as_ref().map(|t| t.to_string()),
            source: layer.source.clone(),
            source_layer: layer.source_layer.clone(),
            visible: layer.is_visible_at(zoom),
            matches: layer.matches(feature),
            layout: evaluate_all(&layer.layout, zoom, feature),
            paint: evaluate_all(&layer.paint, zoom, feature),
            functions,
        }
    }
}

impl StyleReport {
    pub fn new(loaded: &LoadedStyle, compiled: &CompiledStyle, zoom: f64, feature: &Feature) -> Self {
        let doc = &loaded.document;
        Self {
            name: doc.name.clone(),
            zoom,
            sources: doc.sources.keys().cloned().collect(),
            glyphs: doc.glyphs.clone(),
            sprite: loaded.sprite.as_ref().map(|s| SpriteReport {
                width: s.image.width,
                height: s.image.height,
                icons: s.meta.as_object().map_or(0, |m| m.len()),
            }),
            layers: compiled
                .layers
                .iter()
                .map(|l| LayerReport::new(l, zoom, feature))
                .collect(),
            diagnostics: compiled.diagnostics.clone(),
        }
    }
}
