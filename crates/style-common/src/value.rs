//! Render-ready property values produced by compiled evaluators.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::color::Color;

/// A resolved paint/layout value.
///
/// Strings and composite JSON are reference counted so evaluators can hand
/// out values per feature without copying their contents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PropertyValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(Arc<str>),
    Color(Color),
    /// Arrays and objects (`text-font`, `line-dasharray`, offsets, ...)
    Json(Arc<Value>),
}

impl PropertyValue {
    /// Convert raw JSON without any color detection.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(PropertyValue::Number).unwrap_or_default(),
            Value::String(s) => PropertyValue::String(Arc::from(s.as_str())),
            other => PropertyValue::Json(Arc::new(other.clone())),
        }
    }

    /// Convert raw JSON, parsing strings as CSS colors where possible.
    pub fn color_from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => match Color::parse(s) {
                Some(c) => PropertyValue::Color(c),
                None => PropertyValue::String(Arc::from(s.as_str())),
            },
            other => PropertyValue::from_json(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<&Color> {
        match self {
            PropertyValue::Color(c) => Some(c),
            _ => None,
        }
    }

    /// Back to JSON. Colors become `rgba(...)` strings.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            PropertyValue::String(s) => Value::String(s.to_string()),
            PropertyValue::Color(c) => Value::String(c.to_css()),
            PropertyValue::Json(v) => v.as_ref().clone(),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Null => serializer.serialize_unit(),
            PropertyValue::Bool(b) => serializer.serialize_bool(*b),
            PropertyValue::Number(n) => serializer.serialize_f64(*n),
            PropertyValue::String(s) => serializer.serialize_str(s),
            PropertyValue::Color(c) => serializer.serialize_str(&c.to_css()),
            PropertyValue::Json(v) => v.serialize(serializer),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(Arc::from(s))
    }
}

impl From<Color> for PropertyValue {
    fn from(c: Color) -> Self {
        PropertyValue::Color(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_strings() {
        assert_eq!(PropertyValue::from_json(&json!("red")), PropertyValue::from("red"));
        assert_eq!(PropertyValue::from_json(&json!(2)), PropertyValue::Number(2.0));
        assert!(matches!(
            PropertyValue::from_json(&json!(["Open Sans"])),
            PropertyValue::Json(_)
        ));
    }

    #[test]
    fn test_color_from_json() {
        let v = PropertyValue::color_from_json(&json!("#ff0000"));
        assert_eq!(v.as_color().unwrap().to_rgba8(), (255, 0, 0, 255));
        assert_eq!(
            PropertyValue::color_from_json(&json!("{name}")),
            PropertyValue::from("{name}")
        );
    }

    #[test]
    fn test_serialize_color_as_css() {
        let v = PropertyValue::Color(Color::BLACK);
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"rgba(0,0,0,1)\"");
    }
}
