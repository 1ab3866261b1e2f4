//! Classification of raw paint/layout values into property specs.
//!
//! A raw property value is whatever JSON appears in the document. It is
//! classified exactly once into a [`PropertySpec`]; everything downstream
//! matches on the variant instead of probing JSON shapes.

use serde_json::{Map, Value};
use style_common::{StyleError, StyleResult};

/// How a function maps its input onto its stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    /// Interpolate between stops (linear or exponential by `base`)
    Exponential,
    /// Step: the value of the greatest stop not above the input
    Interval,
    /// Exact match of the input against stop keys
    Categorical,
    /// The input itself is the value
    Identity,
}

impl FunctionKind {
    fn parse(property: &str, raw: &str) -> StyleResult<Self> {
        match raw {
            "exponential" => Ok(FunctionKind::Exponential),
            "interval" => Ok(FunctionKind::Interval),
            "categorical" => Ok(FunctionKind::Categorical),
            "identity" => Ok(FunctionKind::Identity),
            other => Err(StyleError::malformed_function(
                property,
                format!("unknown function type '{}'", other),
            )),
        }
    }
}

/// A function whose input is the current zoom level.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomFunction {
    pub stops: Vec<(f64, Value)>,
    pub base: f64,
    pub kind: FunctionKind,
}

/// A function whose input is a named feature property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFunction {
    pub property: String,
    /// Stop keys are raw JSON: numbers for exponential/interval, any scalar
    /// for categorical. Empty for identity functions.
    pub stops: Vec<(Value, Value)>,
    pub base: f64,
    pub kind: FunctionKind,
    /// The function's own fallback, used before the type default
    pub default: Option<Value>,
}

/// A function over zoom whose stop values are property functions.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomAndPropertyFunction {
    pub property: String,
    /// Outer zoom stops, each with its inner property stops
    pub stops: Vec<(f64, Vec<(Value, Value)>)>,
    pub base: f64,
    pub kind: FunctionKind,
    pub default: Option<Value>,
}

/// A classified property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertySpec {
    Constant(Value),
    Zoom(ZoomFunction),
    Property(PropertyFunction),
    ZoomAndProperty(ZoomAndPropertyFunction),
}

impl PropertySpec {
    /// Classify the raw value of property `name`.
    pub fn parse(name: &str, raw: &Value) -> StyleResult<Self> {
        let Value::Object(obj) = raw else {
            return Ok(PropertySpec::Constant(raw.clone()));
        };
        if !obj.contains_key("stops") && !obj.contains_key("property") {
            return Ok(PropertySpec::Constant(raw.clone()));
        }

        let base = match obj.get("base") {
            None => 1.0,
            Some(v) => v
                .as_f64()
                .ok_or_else(|| StyleError::malformed_function(name, "base must be a number"))?,
        };
        if base <= 0.0 {
            return Err(StyleError::malformed_function(name, "base must be positive"));
        }
        let declared_kind = match obj.get("type") {
            None => None,
            Some(Value::String(s)) => Some(FunctionKind::parse(name, s)?),
            Some(_) => {
                return Err(StyleError::malformed_function(name, "type must be a string"))
            }
        };
        let default = obj.get("default").cloned();

        let property = match obj.get("property") {
            None => None,
            Some(Value::String(p)) => Some(p.clone()),
            Some(_) => {
                return Err(StyleError::malformed_function(name, "property must be a string"))
            }
        };

        let pairs = stop_pairs(name, obj)?;

        match property {
            None => parse_zoom(name, pairs, base, declared_kind),
            Some(property) => {
                if declared_kind == Some(FunctionKind::Identity) {
                    return Ok(PropertySpec::Property(PropertyFunction {
                        property,
                        stops: Vec::new(),
                        base,
                        kind: FunctionKind::Identity,
                        default,
                    }));
                }
                if pairs.is_empty() && !obj.contains_key("stops") {
                    return Err(StyleError::malformed_function(
                        name,
                        "property function needs stops",
                    ));
                }
                parse_property(name, property, pairs, base, declared_kind, default)
            }
        }
    }

    /// True for anything that is not a constant.
    pub fn is_function(&self) -> bool {
        !matches!(self, PropertySpec::Constant(_))
    }
}

/// Split `stops` into `(key, value)` pairs, checking the array shape.
fn stop_pairs(name: &str, obj: &Map<String, Value>) -> StyleResult<Vec<(Value, Value)>> {
    let Some(stops) = obj.get("stops") else {
        return Ok(Vec::new());
    };
    let Value::Array(stops) = stops else {
        return Err(StyleError::malformed_function(name, "stops must be an array"));
    };

    stops
        .iter()
        .map(|stop| match stop {
            Value::Array(pair) if pair.len() == 2 => Ok((pair[0].clone(), pair[1].clone())),
            _ => Err(StyleError::malformed_function(
                name,
                "each stop must be a [input, output] pair",
            )),
        })
        .collect()
}

fn numeric_key(name: &str, key: &Value) -> StyleResult<f64> {
    key.as_f64()
        .ok_or_else(|| StyleError::malformed_function(name, format!("stop input {} is not a number", key)))
}

fn parse_zoom(
    name: &str,
    pairs: Vec<(Value, Value)>,
    base: f64,
    kind: Option<FunctionKind>,
) -> StyleResult<PropertySpec> {
    let kind = kind.unwrap_or(FunctionKind::Exponential);
    if matches!(kind, FunctionKind::Categorical | FunctionKind::Identity) {
        return Err(StyleError::malformed_function(
            name,
            "categorical and identity functions need a property",
        ));
    }

    let stops = pairs
        .into_iter()
        .map(|(k, v)| Ok((numeric_key(name, &k)?, v)))
        .collect::<StyleResult<Vec<_>>>()?;

    Ok(PropertySpec::Zoom(ZoomFunction { stops, base, kind }))
}

fn parse_property(
    name: &str,
    property: String,
    pairs: Vec<(Value, Value)>,
    base: f64,
    kind: Option<FunctionKind>,
    default: Option<Value>,
) -> StyleResult<PropertySpec> {
    let Some((first_key, first_value)) = pairs.first() else {
        return Ok(PropertySpec::Property(PropertyFunction {
            property,
            stops: pairs,
            base,
            kind: kind.unwrap_or(FunctionKind::Exponential),
            default,
        }));
    };

    // [[{"zoom": z, "value": v}, out], ...]
    if first_key.is_object() {
        let stops = group_zoom_keyed(name, pairs)?;
        return Ok(PropertySpec::ZoomAndProperty(ZoomAndPropertyFunction {
            property,
            stops,
            base,
            kind: kind.unwrap_or(FunctionKind::Exponential),
            default,
        }));
    }

    // [[z, [[v, out], ...]], ...]
    if first_key.is_number() && is_nested_stops(first_value) {
        let stops = pairs
            .into_iter()
            .map(|(zoom, inner)| {
                let zoom = numeric_key(name, &zoom)?;
                let inner_obj = Map::from_iter([("stops".to_string(), inner)]);
                Ok((zoom, stop_pairs(name, &inner_obj)?))
            })
            .collect::<StyleResult<Vec<_>>>()?;
        return Ok(PropertySpec::ZoomAndProperty(ZoomAndPropertyFunction {
            property,
            stops,
            base,
            kind: kind.unwrap_or(FunctionKind::Exponential),
            default,
        }));
    }

    let kind = match kind {
        Some(k) => k,
        None if first_key.is_number() => FunctionKind::Exponential,
        None => FunctionKind::Categorical,
    };
    if matches!(kind, FunctionKind::Exponential | FunctionKind::Interval) {
        for (key, _) in &pairs {
            numeric_key(name, key)?;
        }
    }

    Ok(PropertySpec::Property(PropertyFunction {
        property,
        stops: pairs,
        base,
        kind,
        default,
    }))
}

fn is_nested_stops(value: &Value) -> bool {
    match value {
        Value::Array(items) => {
            !items.is_empty()
                && items
                    .iter()
                    .all(|item| matches!(item, Value::Array(pair) if pair.len() == 2))
        }
        _ => false,
    }
}

/// Group Mapbox-style `{zoom, value}` keyed stops into per-zoom lists,
/// keeping the order in which zoom levels first appear.
fn group_zoom_keyed(
    name: &str,
    pairs: Vec<(Value, Value)>,
) -> StyleResult<Vec<(f64, Vec<(Value, Value)>)>> {
    let mut groups: Vec<(f64, Vec<(Value, Value)>)> = Vec::new();

    for (key, output) in pairs {
        let Value::Object(key) = key else {
            return Err(StyleError::malformed_function(
                name,
                "zoom-and-property stop inputs must all be {zoom, value} objects",
            ));
        };
        let zoom = key
            .get("zoom")
            .and_then(Value::as_f64)
            .ok_or_else(|| StyleError::malformed_function(name, "stop input is missing zoom"))?;
        let value = key
            .get("value")
            .cloned()
            .ok_or_else(|| StyleError::malformed_function(name, "stop input is missing value"))?;

        match groups.iter_mut().find(|(z, _)| *z == zoom) {
            Some((_, inner)) => inner.push((value, output)),
            None => groups.push((zoom, vec![(value, output)])),
        }
    }

    Ok(groups)
}
