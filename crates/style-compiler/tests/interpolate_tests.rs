//! Tests for stop interpolation.

use serde_json::{json, Value};
use style_common::{Color, PropertyValue};
use style_compiler::interpolate::{build_interpolator, Scale};
use test_utils::{assert_approx_eq, assert_number_eq, assert_rgba8_eq, color_stops, numeric_stops};

fn pairs(stops: Value) -> Vec<(f64, Value)> {
    stops
        .as_array()
        .unwrap()
        .iter()
        .map(|s| (s[0].as_f64().unwrap(), s[1].clone()))
        .collect()
}

// ============================================================================
// Linear interpolation
// ============================================================================

#[test]
fn test_linear_endpoints_and_midpoint() {
    for (a, b, v0, v1) in [(0.0, 10.0, 0.0, 100.0), (3.0, 4.0, -2.0, 2.0), (5.0, 18.0, 0.5, 20.0)] {
        let i = build_interpolator(&[(a, json!(v0)), (b, json!(v1))], 1.0).unwrap();
        assert_number_eq!(i.evaluate(a), v0);
        assert_number_eq!(i.evaluate(b), v1);
        assert_number_eq!(i.evaluate((a + b) / 2.0), (v0 + v1) / 2.0);
    }
}

#[test]
fn test_clamps_outside_range() {
    let i = build_interpolator(&pairs(json!([[5, 1], [10, 2]])), 1.0).unwrap();
    assert_number_eq!(i.evaluate(-100.0), 1.0);
    assert_number_eq!(i.evaluate(4.999), 1.0);
    assert_number_eq!(i.evaluate(10.001), 2.0);
    assert_number_eq!(i.evaluate(1e9), 2.0);
}

#[test]
fn test_many_stops_pick_the_right_segment() {
    let i = build_interpolator(&pairs(numeric_stops(10, 2.0, 3.0)), 1.0).unwrap();
    // stops at 0,2,4,...,18 with value 3x
    for x in [0.0, 1.0, 7.5, 13.2, 18.0] {
        assert_number_eq!(i.evaluate(x), 3.0 * x);
    }
}

// ============================================================================
// Exponential interpolation
// ============================================================================

#[test]
fn test_exponential_formula() {
    let i = build_interpolator(&pairs(json!([[0, 0], [10, 100]])), 2.0).unwrap();
    assert_eq!(i.scale(), Scale::Exponential(2.0));
    let t = (2f64.powf(5.0) - 1.0) / (2f64.powf(10.0) - 1.0);
    assert_number_eq!(i.evaluate(5.0), 100.0 * t);
}

#[test]
fn test_exponential_is_monotonic_and_below_linear() {
    let i = build_interpolator(&pairs(json!([[5, 0.5], [18, 20]])), 1.5).unwrap();
    let mut previous = f64::MIN;
    for step in 0..=26 {
        let z = 5.0 + step as f64 * 0.5;
        let v = i.evaluate(z).as_f64().unwrap();
        assert!(v >= previous, "not monotonic at {}", z);
        let linear = 0.5 + (z - 5.0) / 13.0 * 19.5;
        assert!(v <= linear + 1e-9, "exponential above linear at {}", z);
        previous = v;
    }
}

#[test]
fn test_base_one_is_linear() {
    assert_eq!(Scale::from_base(1.0), Scale::Linear);
    assert_approx_eq!(Scale::Exponential(1.0000001).position(0.0, 5.0, 10.0), 0.5, 1e-4);
}

// ============================================================================
// Colors
// ============================================================================

#[test]
fn test_color_midpoint() {
    let i = build_interpolator(&pairs(json!([[0, "#000000"], [10, "#ffffff"]])), 1.0).unwrap();
    assert_rgba8_eq!(i.evaluate(0.0), (0, 0, 0, 255));
    assert_rgba8_eq!(i.evaluate(10.0), (255, 255, 255, 255));
    let mid = i.evaluate(5.0);
    let c = mid.as_color().unwrap();
    assert_approx_eq!(c.r, 0.5, 1e-9);
    assert_approx_eq!(c.g, 0.5, 1e-9);
    assert_approx_eq!(c.b, 0.5, 1e-9);
    assert_approx_eq!(c.a, 1.0, 1e-9);
}

#[test]
fn test_color_alpha_interpolates() {
    let i = build_interpolator(
        &pairs(json!([[0, "rgba(255, 0, 0, 0)"], [4, "rgba(255, 0, 0, 1)"]])),
        1.0,
    )
    .unwrap();
    let c = *i.evaluate(1.0).as_color().unwrap();
    assert_approx_eq!(c.a, 0.25, 1e-9);
    assert_eq!(c.to_rgba8().0, 255);
}

#[test]
fn test_alternating_color_stops() {
    let i = build_interpolator(&pairs(color_stops(4, 1.0)), 1.0).unwrap();
    assert_eq!(i.evaluate(1.0), PropertyValue::Color(Color::WHITE));
    assert_eq!(i.evaluate(2.0), PropertyValue::Color(Color::BLACK));
}

// ============================================================================
// Non-interpolatable stops
// ============================================================================

#[test]
fn test_fewer_than_two_stops() {
    assert!(build_interpolator(&[], 1.0).is_none());
    assert!(build_interpolator(&[(0.0, json!(1))], 1.0).is_none());
}

#[test]
fn test_mixed_types_rejected() {
    assert!(build_interpolator(&pairs(json!([[0, 1], [1, "#fff"]])), 1.0).is_none());
    assert!(build_interpolator(&pairs(json!([[0, true], [1, 1]])), 1.0).is_none());
}

#[test]
fn test_booleans_step() {
    let i = build_interpolator(&pairs(json!([[0, false], [10, true]])), 1.0).unwrap();
    assert_eq!(i.evaluate(9.0), PropertyValue::Bool(false));
    assert_eq!(i.evaluate(10.0), PropertyValue::Bool(true));
}
