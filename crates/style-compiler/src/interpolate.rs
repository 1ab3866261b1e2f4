//! Stop-based interpolation for numbers and colors.
//!
//! An [`Interpolator`] is built once from a stop array and then queried
//! per frame (zoom functions) or per feature (property functions). All
//! type detection and color parsing happens at build time.

use serde_json::Value;
use style_common::{Color, PropertyValue};

/// How the relative position `t` between two stops is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// `t = (x - a) / (b - a)`
    Linear,
    /// `t = (base^(x - a) - 1) / (base^(b - a) - 1)`
    Exponential(f64),
    /// No blending; the lower stop wins.
    Step,
}

impl Scale {
    /// Scale for a given exponential base; `base == 1` is linear.
    pub fn from_base(base: f64) -> Self {
        if base == 1.0 {
            Scale::Linear
        } else {
            Scale::Exponential(base)
        }
    }

    /// Relative position of `x` between `a` and `b`.
    pub fn position(&self, a: f64, x: f64, b: f64) -> f64 {
        if a == b {
            return 0.0;
        }
        match *self {
            Scale::Linear => (x - a) / (b - a),
            Scale::Exponential(base) => (base.powf(x - a) - 1.0) / (base.powf(b - a) - 1.0),
            Scale::Step => 0.0,
        }
    }
}

/// Blend two resolved values. Numbers and colors interpolate, anything else
/// (or a mismatched pair) steps to `lower`.
pub fn interpolate_value(lower: &PropertyValue, t: f64, upper: &PropertyValue) -> PropertyValue {
    match (lower, upper) {
        (PropertyValue::Number(v0), PropertyValue::Number(v1)) => {
            PropertyValue::Number(v0 + t * (v1 - v0))
        }
        (PropertyValue::Color(c0), PropertyValue::Color(c1)) => PropertyValue::Color(c0.lerp(c1, t)),
        _ => lower.clone(),
    }
}

/// Value type of a stop array, detected from its first value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopKind {
    Number,
    Color,
    String,
    Bool,
    Other,
}

impl StopKind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => StopKind::Number,
            Value::String(s) if Color::is_color(s) => StopKind::Color,
            Value::String(_) => StopKind::String,
            Value::Bool(_) => StopKind::Bool,
            _ => StopKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum StopValues {
    Number(Vec<f64>),
    Color(Vec<Color>),
    Step(Vec<PropertyValue>),
}

/// A pre-built piecewise function over sorted stop positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator {
    positions: Vec<f64>,
    values: StopValues,
    scale: Scale,
}

/// Build an interpolator over `(position, value)` stops.
///
/// Returns `None` when there are fewer than two stops or the values do not
/// all share one type; callers treat that as "not interpolatable".
pub fn build_interpolator(stops: &[(f64, Value)], base: f64) -> Option<Interpolator> {
    if stops.len() < 2 {
        return None;
    }

    let kind = StopKind::of(&stops[0].1);
    if !stops.iter().all(|(_, v)| StopKind::of(v) == kind) {
        return None;
    }

    let positions = stops.iter().map(|(x, _)| *x).collect();
    let (values, scale) = match kind {
        StopKind::Number => (
            StopValues::Number(stops.iter().filter_map(|(_, v)| v.as_f64()).collect()),
            Scale::from_base(base),
        ),
        StopKind::Color => (
            StopValues::Color(
                stops
                    .iter()
                    .filter_map(|(_, v)| v.as_str().and_then(Color::parse))
                    .collect(),
            ),
            Scale::from_base(base),
        ),
        StopKind::String | StopKind::Bool | StopKind::Other => (
            StopValues::Step(stops.iter().map(|(_, v)| PropertyValue::from_json(v)).collect()),
            Scale::Step,
        ),
    };

    Some(Interpolator {
        positions,
        values,
        scale,
    })
}

impl Interpolator {
    /// A step function over stops of any (even mixed) value types.
    ///
    /// With `parse_colors`, string values that parse as CSS colors are
    /// stored as colors.
    pub fn step(stops: &[(f64, Value)], parse_colors: bool) -> Option<Interpolator> {
        if stops.len() < 2 {
            return None;
        }
        let convert = |v: &Value| {
            if parse_colors {
                PropertyValue::color_from_json(v)
            } else {
                PropertyValue::from_json(v)
            }
        };
        Some(Interpolator {
            positions: stops.iter().map(|(x, _)| *x).collect(),
            values: StopValues::Step(stops.iter().map(|(_, v)| convert(v)).collect()),
            scale: Scale::Step,
        })
    }

    /// Force step behaviour while keeping the normalized values.
    pub fn into_step(mut self) -> Self {
        self.scale = Scale::Step;
        self
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Evaluate at `x`, clamping outside the stop range.
    pub fn evaluate(&self, x: f64) -> PropertyValue {
        let last = self.positions.len() - 1;
        match self.positions.iter().position(|&p| p > x) {
            Some(0) => self.value_at(0),
            None => self.value_at(last),
            Some(i) => {
                let t = self.scale.position(self.positions[i - 1], x, self.positions[i]);
                self.blend(i - 1, t, i)
            }
        }
    }

    fn value_at(&self, i: usize) -> PropertyValue {
        match &self.values {
            StopValues::Number(v) => PropertyValue::Number(v[i]),
            StopValues::Color(v) => PropertyValue::Color(v[i]),
            StopValues::Step(v) => v[i].clone(),
        }
    }

    fn blend(&self, lo: usize, t: f64, hi: usize) -> PropertyValue {
        if self.scale == Scale::Step {
            return self.value_at(lo);
        }
        match &self.values {
            StopValues::Number(v) => PropertyValue::Number(v[lo] + t * (v[hi] - v[lo])),
            StopValues::Color(v) => PropertyValue::Color(v[lo].lerp(&v[hi], t)),
            StopValues::Step(v) => v[lo].clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stops(pairs: &[(f64, Value)]) -> Vec<(f64, Value)> {
        pairs.to_vec()
    }

    #[test]
    fn test_rejects_short_and_mixed() {
        assert!(build_interpolator(&[], 1.0).is_none());
        assert!(build_interpolator(&stops(&[(0.0, json!(1))]), 1.0).is_none());
        assert!(build_interpolator(&stops(&[(0.0, json!(1)), (1.0, json!("red"))]), 1.0).is_none());
        assert!(build_interpolator(&stops(&[(0.0, json!("red")), (1.0, json!("bold"))]), 1.0).is_none());
    }

    #[test]
    fn test_zero_range_is_start() {
        assert_eq!(Scale::Linear.position(3.0, 3.0, 3.0), 0.0);
        assert_eq!(Scale::Exponential(2.0).position(3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn test_string_stops_step() {
        let i = build_interpolator(
            &stops(&[(0.0, json!("a")), (5.0, json!("b")), (10.0, json!("c"))]),
            1.0,
        )
        .unwrap();
        assert_eq!(i.scale(), Scale::Step);
        assert_eq!(i.evaluate(4.9), PropertyValue::from("a"));
        assert_eq!(i.evaluate(5.0), PropertyValue::from("b"));
        assert_eq!(i.evaluate(50.0), PropertyValue::from("c"));
    }

    #[test]
    fn test_mixed_step_parses_colors() {
        let i = Interpolator::step(&stops(&[(0.0, json!("red")), (5.0, json!(3))]), true).unwrap();
        assert_eq!(i.evaluate(1.0).as_color(), Some(&Color::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(i.evaluate(6.0), PropertyValue::Number(3.0));
    }

    #[test]
    fn test_interpolate_value_mismatch_steps() {
        let lower = PropertyValue::Number(1.0);
        let upper = PropertyValue::from("x");
        assert_eq!(interpolate_value(&lower, 0.7, &upper), lower);
    }
}
