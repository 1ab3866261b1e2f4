//! Property-function synthesis: raw paint/layout maps into evaluators.
//!
//! Every evaluator is built once per layer and then called per feature per
//! frame, so all stop validation, color parsing and interpolator
//! construction happens in [`synthesize_properties`]. Evaluation itself
//! never fails: missing or mistyped feature data falls back to a default.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use style_common::{Color, Feature, PropertyValue, StyleResult};
use tracing::{debug, warn};

use crate::function::{
    FunctionKind, PropertyFunction, PropertySpec, ZoomAndPropertyFunction, ZoomFunction,
};
use crate::interpolate::{build_interpolator, interpolate_value, Interpolator, Scale};

/// Compiled evaluators keyed by property name.
pub type PropertyEvaluators = BTreeMap<String, PropertyEvaluator>;

/// Whether constant strings of a property should be read as colors: the
/// name ends in `-color` or the layer type's default is a color.
fn is_color_property(name: &str, type_default: Option<&Value>) -> bool {
    name.ends_with("-color") || type_default.and_then(Value::as_str).is_some_and(Color::is_color)
}

fn convert(value: &Value, colors: bool) -> PropertyValue {
    if colors {
        PropertyValue::color_from_json(value)
    } else {
        PropertyValue::from_json(value)
    }
}

/// Hashable form of a categorical stop key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryKey {
    String(String),
    Number(u64),
    Bool(bool),
}

impl CategoryKey {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(CategoryKey::String(s.clone())),
            Value::Bool(b) => Some(CategoryKey::Bool(*b)),
            Value::Number(n) => n.as_f64().map(|f| {
                // -0.0 and 0.0 are the same category
                let f = if f == 0.0 { 0.0 } else { f };
                CategoryKey::Number(f.to_bits())
            }),
            _ => None,
        }
    }
}

/// How a property function maps one input value to an output.
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    /// Numeric input through an interpolator
    Interpolated(Interpolator),
    /// Exact-match table
    Categorical(HashMap<CategoryKey, PropertyValue>),
    /// The feature value itself
    Identity { colors: bool },
    /// Degenerate stops: the same value for every input
    Constant(PropertyValue),
    /// No usable stops: always the fallback
    Fallback,
}

impl Curve {
    /// Build from numeric stops (zoom functions, exponential and interval
    /// property functions).
    fn numeric(
        name: &str,
        stops: &[(f64, Value)],
        base: f64,
        kind: FunctionKind,
        colors: bool,
    ) -> Curve {
        match stops.len() {
            0 => return Curve::Fallback,
            1 => return Curve::Constant(convert(&stops[0].1, colors)),
            _ => {}
        }

        let interpolator = match build_interpolator(stops, base) {
            Some(i) => i,
            None => {
                warn!(property = %name, "Stop values have mixed types, stepping between raw values");
                match Interpolator::step(stops, colors) {
                    Some(i) => i,
                    None => return Curve::Fallback,
                }
            }
        };

        match kind {
            FunctionKind::Interval => Curve::Interpolated(interpolator.into_step()),
            _ => Curve::Interpolated(interpolator),
        }
    }

    fn categorical(stops: &[(Value, Value)], colors: bool) -> Curve {
        let table = stops
            .iter()
            .filter_map(|(k, v)| CategoryKey::of(k).map(|key| (key, convert(v, colors))))
            .collect();
        Curve::Categorical(table)
    }

    /// Build the curve of a property function from its raw stops.
    fn for_property(
        name: &str,
        stops: &[(Value, Value)],
        base: f64,
        kind: FunctionKind,
        colors: bool,
    ) -> Curve {
        match kind {
            FunctionKind::Identity => Curve::Identity { colors },
            FunctionKind::Categorical => Curve::categorical(stops, colors),
            FunctionKind::Exponential | FunctionKind::Interval => {
                let numeric: Vec<(f64, Value)> = stops
                    .iter()
                    .filter_map(|(k, v)| k.as_f64().map(|x| (x, v.clone())))
                    .collect();
                Curve::numeric(name, &numeric, base, kind, colors)
            }
        }
    }

    /// Output for a numeric input (zoom).
    fn at(&self, x: f64, fallback: &PropertyValue) -> PropertyValue {
        match self {
            Curve::Interpolated(i) => i.evaluate(x),
            Curve::Constant(v) => v.clone(),
            _ => fallback.clone(),
        }
    }

    /// Output for a feature value. `None` input means the property is
    /// missing from the feature.
    fn lookup(&self, input: Option<&Value>, fallback: &PropertyValue) -> PropertyValue {
        let Some(input) = input else {
            return fallback.clone();
        };
        match self {
            Curve::Interpolated(i) => match input.as_f64() {
                Some(x) => i.evaluate(x),
                None => fallback.clone(),
            },
            Curve::Categorical(table) => CategoryKey::of(input)
                .and_then(|key| table.get(&key))
                .cloned()
                .unwrap_or_else(|| fallback.clone()),
            Curve::Identity { colors } => convert(input, *colors),
            Curve::Constant(v) => v.clone(),
            Curve::Fallback => fallback.clone(),
        }
    }
}

/// A compiled `(zoom, feature) -> value` function.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyEvaluator {
    /// Ignores zoom and feature
    Constant(PropertyValue),
    /// Depends on zoom only
    Zoom { curve: Curve, fallback: PropertyValue },
    /// Depends on one feature property only
    Property {
        property: String,
        curve: Curve,
        fallback: PropertyValue,
    },
    /// Depends on zoom and one feature property
    ZoomAndProperty {
        property: String,
        zooms: Vec<f64>,
        curves: Vec<Curve>,
        scale: Scale,
        fallback: PropertyValue,
    },
}

impl PropertyEvaluator {
    /// Compile one property. `type_default` is the layer type's default for
    /// it, if the default table knows the property.
    pub fn compile(
        name: &str,
        raw: Option<&Value>,
        type_default: Option<&Value>,
    ) -> StyleResult<Self> {
        let colors = is_color_property(name, type_default);
        let type_default = type_default
            .map(|v| convert(v, colors))
            .unwrap_or_default();

        let Some(raw) = raw else {
            return Ok(PropertyEvaluator::Constant(type_default));
        };

        let evaluator = match PropertySpec::parse(name, raw)? {
            PropertySpec::Constant(value) => PropertyEvaluator::Constant(convert(&value, colors)),
            PropertySpec::Zoom(ZoomFunction { stops, base, kind }) => {
                match Curve::numeric(name, &stops, base, kind, colors) {
                    Curve::Constant(v) => PropertyEvaluator::Constant(v),
                    Curve::Fallback => PropertyEvaluator::Constant(type_default),
                    curve => PropertyEvaluator::Zoom {
                        curve,
                        fallback: type_default,
                    },
                }
            }
            PropertySpec::Property(PropertyFunction {
                property,
                stops,
                base,
                kind,
                default,
            }) => PropertyEvaluator::Property {
                curve: Curve::for_property(name, &stops, base, kind, colors),
                fallback: default.map(|d| convert(&d, colors)).unwrap_or(type_default),
                property,
            },
            PropertySpec::ZoomAndProperty(ZoomAndPropertyFunction {
                property,
                stops,
                base,
                kind,
                default,
            }) => {
                let scale = match kind {
                    FunctionKind::Interval => Scale::Step,
                    _ => Scale::from_base(base),
                };
                let (zooms, curves) = stops
                    .iter()
                    .map(|(zoom, inner)| (*zoom, Curve::for_property(name, inner, base, kind, colors)))
                    .unzip();
                PropertyEvaluator::ZoomAndProperty {
                    property,
                    zooms,
                    curves,
                    scale,
                    fallback: default.map(|d| convert(&d, colors)).unwrap_or(type_default),
                }
            }
        };

        Ok(evaluator)
    }

    /// Evaluate for a zoom level and feature. Never fails.
    pub fn evaluate(&self, zoom: f64, feature: &Feature) -> PropertyValue {
        match self {
            PropertyEvaluator::Constant(v) => v.clone(),
            PropertyEvaluator::Zoom { curve, fallback } => curve.at(zoom, fallback),
            PropertyEvaluator::Property {
                property,
                curve,
                fallback,
            } => curve.lookup(feature.property(property), fallback),
            PropertyEvaluator::ZoomAndProperty {
                property,
                zooms,
                curves,
                scale,
                fallback,
            } => {
                let Some(last) = zooms.len().checked_sub(1) else {
                    return fallback.clone();
                };
                let input = feature.property(property);
                match zooms.iter().position(|&z| z > zoom) {
                    Some(0) => curves[0].lookup(input, fallback),
                    None => curves[last].lookup(input, fallback),
                    Some(i) => {
                        let lower = curves[i - 1].lookup(input, fallback);
                        if *scale == Scale::Step {
                            return lower;
                        }
                        let upper = curves[i].lookup(input, fallback);
                        let t = scale.position(zooms[i - 1], zoom, zooms[i]);
                        interpolate_value(&lower, t, &upper)
                    }
                }
            }
        }
    }

    /// Whether the output can change with zoom.
    pub fn is_zoom_dependent(&self) -> bool {
        matches!(
            self,
            PropertyEvaluator::Zoom { .. } | PropertyEvaluator::ZoomAndProperty { .. }
        )
    }

    /// Whether the output can change from one feature to the next.
    pub fn is_feature_dependent(&self) -> bool {
        matches!(
            self,
            PropertyEvaluator::Property { .. } | PropertyEvaluator::ZoomAndProperty { .. }
        )
    }
}

/// Compile a raw paint or layout map against a type's default table.
///
/// The result has one evaluator per default key, plus one per raw key the
/// table does not know. Absent properties compile to constant defaults.
pub fn synthesize_properties(
    raw: Option<&Map<String, Value>>,
    defaults: &Map<String, Value>,
) -> StyleResult<PropertyEvaluators> {
    let mut evaluators = PropertyEvaluators::new();

    for (name, default) in defaults {
        let raw_value = raw.and_then(|r| r.get(name));
        evaluators.insert(
            name.clone(),
            PropertyEvaluator::compile(name, raw_value, Some(default))?,
        );
    }

    if let Some(raw) = raw {
        for (name, value) in raw.iter().filter(|(name, _)| !defaults.contains_key(*name)) {
            debug!(property = %name, "Property has no default for this layer type");
            evaluators.insert(name.clone(), PropertyEvaluator::compile(name, Some(value), None)?);
        }
    }

    Ok(evaluators)
}
