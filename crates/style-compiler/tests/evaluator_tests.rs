//! Tests for property-function synthesis and evaluation.

use serde_json::{json, Map, Value};
use style_common::{GeometryType, LayerType, PropertyValue, StyleError};
use style_compiler::{paint_defaults, synthesize_properties, PropertyEvaluator};
use test_utils::{assert_number_eq, assert_rgba8_eq, create_landuse_features, feature_with};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

fn compile(name: &str, raw: Value) -> PropertyEvaluator {
    PropertyEvaluator::compile(name, Some(&raw), None).unwrap()
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn test_empty_spec_yields_constant_defaults() {
    let defaults = paint_defaults(&LayerType::Line);
    let evaluators = synthesize_properties(Some(&Map::new()), &defaults).unwrap();
    assert_eq!(evaluators.len(), defaults.len());

    let features = create_landuse_features(3);
    for (name, e) in &evaluators {
        assert!(!e.is_zoom_dependent() && !e.is_feature_dependent(), "{}", name);
        let first = e.evaluate(0.0, &features[0]);
        for zoom in [3.0, 12.5, 22.0] {
            for f in &features {
                assert_eq!(e.evaluate(zoom, f), first, "{}", name);
            }
        }
    }
    assert_number_eq!(evaluators["line-width"].evaluate(8.0, &features[1]), 1.0);
    assert_rgba8_eq!(evaluators["line-color"].evaluate(8.0, &features[1]), (0, 0, 0, 255));
}

#[test]
fn test_absent_spec_is_same_as_empty() {
    let defaults = paint_defaults(&LayerType::Circle);
    let a = synthesize_properties(None, &defaults).unwrap();
    let b = synthesize_properties(Some(&Map::new()), &defaults).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_raw_keys_outside_defaults_are_kept() {
    let raw = object(json!({"fill-pattern": "dots", "fill-opacity": 0.3}));
    let evaluators = synthesize_properties(Some(&raw), &paint_defaults(&LayerType::Fill)).unwrap();
    let f = feature_with(GeometryType::Polygon, json!({}));
    assert_eq!(evaluators["fill-pattern"].evaluate(0.0, &f), PropertyValue::from("dots"));
    assert_number_eq!(evaluators["fill-opacity"].evaluate(0.0, &f), 0.3);
}

// ============================================================================
// Zoom functions
// ============================================================================

#[test]
fn test_zoom_function_interpolates() {
    let e = compile("line-width", json!({"stops": [[10, 1], [20, 11]]}));
    let f = feature_with(GeometryType::LineString, json!({}));
    assert!(e.is_zoom_dependent());
    assert!(!e.is_feature_dependent());
    assert_number_eq!(e.evaluate(15.0, &f), 6.0);
    assert_number_eq!(e.evaluate(0.0, &f), 1.0);
}

#[test]
fn test_zoom_color_function() {
    let e = compile("line-color", json!({"stops": [[0, "#000000"], [10, "#ff0000"]]}));
    let f = feature_with(GeometryType::LineString, json!({}));
    assert_rgba8_eq!(e.evaluate(10.0, &f), (255, 0, 0, 255));
    let c = *e.evaluate(5.0, &f).as_color().unwrap();
    assert!((c.r - 0.5).abs() < 1e-9);
}

#[test]
fn test_mixed_stop_types_step() {
    let e = compile("line-dasharray", json!({"stops": [[0, [2, 1]], [10, 3]]}));
    let f = feature_with(GeometryType::LineString, json!({}));
    assert_eq!(e.evaluate(5.0, &f).to_json(), json!([2, 1]));
    assert_number_eq!(e.evaluate(10.0, &f), 3.0);
}

// ============================================================================
// Property functions
// ============================================================================

#[test]
fn test_property_function_interpolates_feature_value() {
    let e = compile("fill-extrusion-height", json!({"property": "height", "stops": [[0, 0], [100, 200]]}));
    let f = feature_with(GeometryType::Polygon, json!({"height": 25}));
    assert!(e.is_feature_dependent());
    assert!(!e.is_zoom_dependent());
    assert_number_eq!(e.evaluate(0.0, &f), 50.0);
    assert_number_eq!(e.evaluate(22.0, &f), 50.0);
}

#[test]
fn test_missing_feature_property_uses_type_default() {
    let raw = json!({"property": "height", "stops": [[0, 0], [100, 200]]});
    let e = PropertyEvaluator::compile("fill-extrusion-height", Some(&raw), Some(&json!(3))).unwrap();
    let f = feature_with(GeometryType::Polygon, json!({"name": "x"}));
    assert_number_eq!(e.evaluate(14.0, &f), 3.0);
}

#[test]
fn test_categorical_strings() {
    let raw = json!({
        "property": "class",
        "type": "categorical",
        "stops": [["park", "#00ff00"], ["water", "#0000ff"]],
        "default": "#ff0000"
    });
    let e = compile("fill-color", raw);
    let park = feature_with(GeometryType::Polygon, json!({"class": "park"}));
    let sand = feature_with(GeometryType::Polygon, json!({"class": "sand"}));
    assert_rgba8_eq!(e.evaluate(0.0, &park), (0, 255, 0, 255));
    assert_rgba8_eq!(e.evaluate(0.0, &sand), (255, 0, 0, 255));
}

#[test]
fn test_string_keys_imply_categorical() {
    let e = compile("text-size", json!({"property": "rank", "stops": [["big", 20], ["small", 10]]}));
    let f = feature_with(GeometryType::Point, json!({"rank": "small"}));
    assert_number_eq!(e.evaluate(0.0, &f), 10.0);
}

#[test]
fn test_interval_property_function() {
    let raw = json!({"property": "pop", "type": "interval", "stops": [[0, 8], [1000, 12], [100000, 16]]});
    let e = compile("text-size", raw);
    let sized = |pop: u64| e.evaluate(0.0, &feature_with(GeometryType::Point, json!({"pop": pop})));
    assert_number_eq!(sized(999), 8.0);
    assert_number_eq!(sized(1000), 12.0);
    assert_number_eq!(sized(5_000_000), 16.0);
}

// ============================================================================
// Zoom-and-property functions
// ============================================================================

#[test]
fn test_zoom_and_property_nested_form() {
    let raw = json!({
        "property": "rank",
        "stops": [
            [0, [[0, 0], [10, 10]]],
            [10, [[0, 0], [10, 110]]]
        ]
    });
    let e = compile("circle-radius", raw);
    assert!(e.is_zoom_dependent() && e.is_feature_dependent());
    let f = feature_with(GeometryType::Point, json!({"rank": 5}));
    assert_number_eq!(e.evaluate(0.0, &f), 5.0);
    assert_number_eq!(e.evaluate(10.0, &f), 55.0);
    assert_number_eq!(e.evaluate(5.0, &f), 30.0);
    assert_number_eq!(e.evaluate(30.0, &f), 55.0);
}

#[test]
fn test_zoom_and_property_keyed_form() {
    let raw = json!({
        "property": "rank",
        "stops": [
            [{"zoom": 0, "value": 0}, 0], [{"zoom": 0, "value": 10}, 10],
            [{"zoom": 10, "value": 0}, 0], [{"zoom": 10, "value": 10}, 110]
        ]
    });
    let e = compile("circle-radius", raw);
    let f = feature_with(GeometryType::Point, json!({"rank": 5}));
    assert_number_eq!(e.evaluate(5.0, &f), 30.0);
}

#[test]
fn test_zoom_and_property_missing_value_falls_back() {
    let raw = json!({
        "property": "rank",
        "default": 2,
        "stops": [[0, [[0, 0], [10, 10]]], [10, [[0, 0], [10, 110]]]]
    });
    let e = compile("circle-radius", raw);
    let f = feature_with(GeometryType::Point, json!({}));
    assert_number_eq!(e.evaluate(5.0, &f), 2.0);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_malformed_specs() {
    for raw in [
        json!({"stops": [[0, 1, 2]]}),
        json!({"stops": [["a", 1], ["b", 2]]}),
        json!({"property": 5, "stops": [[0, 1]]}),
        json!({"property": "x"}),
        json!({"stops": [[0, 1]], "base": "two"}),
        json!({"stops": [[0, 1]], "type": "bezier"}),
    ] {
        let result = PropertyEvaluator::compile("line-width", Some(&raw), None);
        assert!(
            matches!(result, Err(StyleError::MalformedFunction { .. })),
            "{}",
            raw
        );
    }
}
