//! End-to-end compilation of style documents.

use serde_json::json;
use style_common::{DiagnosticKind, GeometryType, LayerType, PropertyValue, StyleError};
use style_compiler::{compile_layer, compile_style, compile_style_strict, LayerDefaults};
use test_utils::{
    assert_number_eq, assert_rgba8_eq, create_landuse_features, feature_with, parse_style,
    streets_style,
};

// ============================================================================
// Whole documents
// ============================================================================

#[test]
fn test_compile_streets_style() {
    let doc = parse_style(streets_style());
    let style = compile_style(&doc).unwrap();

    let ids: Vec<&str> = style.layers.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(
        ids,
        ["background", "park", "park-outline", "road", "building", "place-label"]
    );
    assert!(style.diagnostics.is_empty());

    let outline = style.layer("park-outline").unwrap();
    assert_eq!(outline.layer_type, Some(LayerType::Fill));
    assert_eq!(outline.source_layer.as_deref(), Some("landuse"));
    let park = feature_with(GeometryType::Polygon, json!({"class": "park", "type": "grass"}));
    assert!(outline.matches(&park));
    assert_rgba8_eq!(outline.paint_value("fill-color", 10.0, &park), (160, 192, 128, 255));
    // fill-opacity is not inherited, so the type default applies
    assert_number_eq!(outline.paint_value("fill-opacity", 10.0, &park), 1.0);
}

#[test]
fn test_every_default_key_is_present() {
    let style = compile_style(&parse_style(streets_style())).unwrap();
    let road = style.layer("road").unwrap();
    let defaults = LayerDefaults::for_type(&LayerType::Line);
    for key in defaults.paint.keys() {
        assert!(road.paint.contains_key(key), "missing paint {}", key);
    }
    for key in defaults.layout.keys() {
        assert!(road.layout.contains_key(key), "missing layout {}", key);
    }
    let f = feature_with(GeometryType::LineString, json!({}));
    assert_eq!(road.layout_value("line-cap", 8.0, &f), PropertyValue::from("round"));
    assert_eq!(road.layout_value("line-miter-limit", 8.0, &f), PropertyValue::Number(2.0));
}

#[test]
fn test_visibility_by_zoom() {
    let style = compile_style(&parse_style(streets_style())).unwrap();
    let at_4: Vec<&str> = style.visible_at(4.0).map(|l| l.id.as_str()).collect();
    assert_eq!(at_4, ["background", "park", "park-outline", "place-label"]);
    assert_eq!(style.visible_at(16.0).count(), 6);
}

#[test]
fn test_data_driven_building_height() {
    let style = compile_style(&parse_style(streets_style())).unwrap();
    let building = style.layer("building").unwrap();
    let tall = feature_with(GeometryType::Polygon, json!({"height": 40}));
    let unknown = feature_with(GeometryType::Polygon, json!({}));
    assert_number_eq!(building.paint_value("fill-extrusion-height", 16.0, &tall), 40.0);
    assert_number_eq!(building.paint_value("fill-extrusion-height", 16.0, &unknown), 0.0);
    let low = feature_with(GeometryType::Polygon, json!({"height": 0}));
    let high = feature_with(GeometryType::Polygon, json!({"height": 50}));
    assert_rgba8_eq!(
        building.paint_value("fill-extrusion-color", 15.0, &low),
        (0xdd, 0xdd, 0xdd, 255)
    );
    assert_rgba8_eq!(
        building.paint_value("fill-extrusion-color", 18.0, &high),
        (0x88, 0x88, 0x88, 255)
    );
    // no height: both zoom sides fall back to the type default
    assert_rgba8_eq!(
        building.paint_value("fill-extrusion-color", 16.0, &unknown),
        (0, 0, 0, 255)
    );
}

#[test]
fn test_filters_over_many_features() {
    let style = compile_style(&parse_style(streets_style())).unwrap();
    let park = style.layer("park").unwrap();
    let features = create_landuse_features(100);
    assert_eq!(features.iter().filter(|f| park.matches(f)).count(), 20);
}

// ============================================================================
// Failures and diagnostics
// ============================================================================

#[test]
fn test_dangling_ref_is_a_diagnostic() {
    let mut value = streets_style();
    value["layers"][2]["ref"] = json!("ghost");
    let doc = parse_style(value);

    let style = compile_style(&doc).unwrap();
    assert_eq!(style.diagnostics.len(), 1);
    assert_eq!(style.diagnostics[0].kind, DiagnosticKind::DanglingReference);
    assert_eq!(style.diagnostics[0].subject, "park-outline");
    assert_eq!(style.layer("park-outline").unwrap().layer_type, None);

    assert!(matches!(
        compile_style_strict(&doc),
        Err(StyleError::DanglingReference { missing, .. }) if missing == "ghost"
    ));
}

#[test]
fn test_malformed_filter_aborts_compilation() {
    let mut value = streets_style();
    value["layers"][5]["filter"] = json!(["within", "class"]);
    let err = compile_style(&parse_style(value)).unwrap_err();
    assert!(matches!(&err, StyleError::InLayer { layer, .. } if layer == "place-label"));
    assert!(matches!(err.root(), StyleError::MalformedFilter(_)));
}

#[test]
fn test_compile_does_not_mutate_layer() {
    let doc = parse_style(streets_style());
    let before = doc.clone();
    let road = &doc.layers[3];
    let _ = compile_layer(road, &LayerDefaults::for_type(&LayerType::Line)).unwrap();
    assert_eq!(doc, before);
}
