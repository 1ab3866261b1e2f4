//! Layer dereferencing: expand `ref` inheritance into standalone layers.

use std::collections::HashMap;

use style_common::{Diagnostic, DiagnosticKind, Layer, StyleError, StyleResult};

/// Keys a layer takes from the layer it references. `paint` and `id` are
/// never inherited.
pub const REF_PROPERTIES: [&str; 7] = [
    "type",
    "minzoom",
    "maxzoom",
    "source",
    "source-layer",
    "filter",
    "layout",
];

/// A `ref` that named no layer in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub layer: String,
    pub missing: String,
}

/// Output of [`dereference_layers`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dereferenced {
    /// Layers in input order, none carrying `ref`
    pub layers: Vec<Layer>,
    /// References that did not resolve; those layers inherited nothing
    pub dangling: Vec<DanglingRef>,
}

impl Dereferenced {
    /// Fail on the first unresolved reference.
    pub fn into_strict(self) -> StyleResult<Vec<Layer>> {
        match self.dangling.into_iter().next() {
            Some(DanglingRef { layer, missing }) => {
                Err(StyleError::DanglingReference { layer, missing })
            }
            None => Ok(self.layers),
        }
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.dangling
            .iter()
            .map(|d| {
                Diagnostic::new(
                    DiagnosticKind::DanglingReference,
                    d.layer.clone(),
                    format!("references missing layer '{}'", d.missing),
                )
            })
            .collect()
    }
}

/// Resolve every `ref` against the whole list, so forward and backward
/// references both work. Inheritance is one level deep: a parent that
/// itself has a `ref` contributes only its own fields.
pub fn dereference_layers(layers: &[Layer]) -> Dereferenced {
    let by_id: HashMap<&str, &Layer> = layers.iter().map(|l| (l.id.as_str(), l)).collect();
    let mut dangling = Vec::new();

    let layers = layers
        .iter()
        .map(|layer| {
            let Some(reference) = layer.reference.as_deref() else {
                return layer.clone();
            };
            match by_id.get(reference) {
                Some(parent) => inherit(layer, parent),
                None => {
                    dangling.push(DanglingRef {
                        layer: layer.id.clone(),
                        missing: reference.to_string(),
                    });
                    Layer {
                        reference: None,
                        ..layer.clone()
                    }
                }
            }
        })
        .collect();

    Dereferenced { layers, dangling }
}

fn inherit(layer: &Layer, parent: &Layer) -> Layer {
    fn pick<T: Clone>(own: &Option<T>, parent: &Option<T>) -> Option<T> {
        parent.clone().or_else(|| own.clone())
    }

    Layer {
        reference: None,
        layer_type: pick(&layer.layer_type, &parent.layer_type),
        minzoom: pick(&layer.minzoom, &parent.minzoom),
        maxzoom: pick(&layer.maxzoom, &parent.maxzoom),
        source: pick(&layer.source, &parent.source),
        source_layer: pick(&layer.source_layer, &parent.source_layer),
        filter: pick(&layer.filter, &parent.filter),
        layout: pick(&layer.layout, &parent.layout),
        ..layer.clone()
    }
}
