//! Layer compilation: filter + layout + paint into a render-ready layer.

use rayon::prelude::*;
use serde_json::Value;
use style_common::{
    Diagnostic, Feature, GeometryType, Layer, LayerType, PropertyValue, StyleDocument, StyleResult,
};
use tracing::{debug, warn};

use crate::defaults::LayerDefaults;
use crate::deref::dereference_layers;
use crate::evaluator::{synthesize_properties, PropertyEvaluator, PropertyEvaluators};
use crate::filter::{compile_filter, FeatureFilter};

/// A layer with every rule compiled. Holds no reference to the source
/// document.
#[derive(Debug, Clone)]
pub struct CompiledLayer {
    pub id: String,
    pub layer_type: Option<LayerType>,
    pub source: Option<String>,
    pub source_layer: Option<String>,
    pub minzoom: Option<f64>,
    pub maxzoom: Option<f64>,
    pub filter: FeatureFilter,
    pub layout: PropertyEvaluators,
    pub paint: PropertyEvaluators,
}

impl CompiledLayer {
    /// Whether the layer draws at all at `zoom`: inside
    /// `[minzoom, maxzoom)` and not hidden by `visibility`.
    pub fn is_visible_at(&self, zoom: f64) -> bool {
        if self.minzoom.is_some_and(|min| zoom < min) {
            return false;
        }
        if self.maxzoom.is_some_and(|max| zoom >= max) {
            return false;
        }
        let blank = Feature::new(GeometryType::Unknown);
        self.layout_value("visibility", zoom, &blank).as_str() != Some("none")
    }

    /// Layout value for a feature, or `Null` for a property this layer does
    /// not carry.
    pub fn layout_value(&self, name: &str, zoom: f64, feature: &Feature) -> PropertyValue {
        evaluate_in(&self.layout, name, zoom, feature)
    }

    /// Paint value for a feature, or `Null` for a property this layer does
    /// not carry.
    pub fn paint_value(&self, name: &str, zoom: f64, feature: &Feature) -> PropertyValue {
        evaluate_in(&self.paint, name, zoom, feature)
    }

    pub fn matches(&self, feature: &Feature) -> bool {
        self.filter.matches(feature)
    }
}

fn evaluate_in(
    evaluators: &PropertyEvaluators,
    name: &str,
    zoom: f64,
    feature: &Feature,
) -> PropertyValue {
    evaluators
        .get(name)
        .map(|e| e.evaluate(zoom, feature))
        .unwrap_or_default()
}

/// Compile one dereferenced layer against its type's default tables.
///
/// Errors carry the layer id.
pub fn compile_layer(layer: &Layer, defaults: &LayerDefaults) -> StyleResult<CompiledLayer> {
    let compile = || -> StyleResult<CompiledLayer> {
        Ok(CompiledLayer {
            id: layer.id.clone(),
            layer_type: layer.layer_type.clone(),
            source: layer.source.clone(),
            source_layer: layer.source_layer.clone(),
            minzoom: layer.minzoom,
            maxzoom: layer.maxzoom,
            filter: compile_filter(layer.filter.as_ref())?,
            layout: synthesize_properties(layer.layout.as_ref(), &defaults.layout)?,
            paint: synthesize_properties(layer.paint.as_ref(), &defaults.paint)?,
        })
    };
    compile().map_err(|e| e.in_layer(&layer.id))
}

/// Compile layers in parallel, keeping their order. Each layer uses the
/// defaults of its own type.
pub fn compile_layers(layers: &[Layer]) -> StyleResult<Vec<CompiledLayer>> {
    layers
        .par_iter()
        .map(|layer| {
            let defaults = LayerDefaults::for_layer_type(layer.layer_type.as_ref());
            compile_layer(layer, &defaults)
        })
        .collect()
}

/// Every layer of a document, compiled.
#[derive(Debug, Clone)]
pub struct CompiledStyle {
    pub layers: Vec<CompiledLayer>,
    /// Non-fatal problems found while compiling (dangling references)
    pub diagnostics: Vec<Diagnostic>,
}

impl CompiledStyle {
    pub fn layer(&self, id: &str) -> Option<&CompiledLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Layers that draw at `zoom`, in draw order.
    pub fn visible_at(&self, zoom: f64) -> impl Iterator<Item = &CompiledLayer> {
        self.layers.iter().filter(move |l| l.is_visible_at(zoom))
    }
}

/// Dereference and compile a whole document.
///
/// Dangling references are reported as diagnostics and the affected layers
/// compile without inherited fields. Use [`compile_style_strict`] to fail
/// on them instead.
pub fn compile_style(doc: &StyleDocument) -> StyleResult<CompiledStyle> {
    let deref = dereference_layers(&doc.layers);
    let diagnostics = deref.diagnostics();
    for d in &diagnostics {
        warn!(layer = %d.subject, "{}", d.message);
    }

    let layers = compile_layers(&deref.layers)?;
    debug!(
        layers = layers.len(),
        diagnostics = diagnostics.len(),
        "Compiled style"
    );

    Ok(CompiledStyle {
        layers,
        diagnostics,
    })
}

/// Like [`compile_style`], but an unresolved `ref` is an error.
pub fn compile_style_strict(doc: &StyleDocument) -> StyleResult<CompiledStyle> {
    let layers = dereference_layers(&doc.layers).into_strict()?;
    Ok(CompiledStyle {
        layers: compile_layers(&layers)?,
        diagnostics: Vec::new(),
    })
}

/// Summaries of a compiled layer's evaluators, for tooling.
pub fn describe_evaluators(evaluators: &PropertyEvaluators) -> serde_json::Map<String, Value> {
    evaluators
        .iter()
        .map(|(name, e)| (name.clone(), Value::String(evaluator_kind(e).to_string())))
        .collect()
}

fn evaluator_kind(e: &PropertyEvaluator) -> &'static str {
    match (e.is_zoom_dependent(), e.is_feature_dependent()) {
        (false, false) => "constant",
        (true, false) => "zoom",
        (false, true) => "property",
        (true, true) => "zoom-and-property",
    }
}
