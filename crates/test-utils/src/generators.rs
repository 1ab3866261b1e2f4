//! Generators for synthetic features and stop arrays.
//!
//! Output is deterministic so benchmarks and property-style tests are
//! repeatable.

use serde_json::{json, Value};
use style_common::{Feature, GeometryType};

const CLASSES: [&str; 5] = ["park", "wood", "water", "residential", "industrial"];

/// Create `count` polygon features cycling through land-use classes, with a
/// numeric `height` and a `name`.
///
/// # Example
///
/// ```
/// use test_utils::create_landuse_features;
///
/// let features = create_landuse_features(10);
/// assert_eq!(features.len(), 10);
/// assert_eq!(features[0].property("class").unwrap(), "park");
/// assert_eq!(features[1].property("height").unwrap(), 7);
/// ```
pub fn create_landuse_features(count: usize) -> Vec<Feature> {
    (0..count)
        .map(|i| {
            Feature::new(GeometryType::Polygon)
                .with_id(i as u64)
                .with_property("class", CLASSES[i % CLASSES.len()])
                .with_property("height", (i * 7) % 200)
                .with_property("name", format!("feature-{}", i))
        })
        .collect()
}

/// A feature with the given properties and geometry type.
pub fn feature_with(geometry_type: GeometryType, properties: Value) -> Feature {
    let Value::Object(properties) = properties else {
        panic!("feature properties must be an object, got {}", properties);
    };
    Feature {
        id: None,
        geometry_type,
        properties,
    }
}

/// Numeric zoom stops `[[0, 0], [step, step*scale], ...]` with `count` entries.
pub fn numeric_stops(count: usize, step: f64, scale: f64) -> Value {
    let stops: Vec<Value> = (0..count)
        .map(|i| {
            let x = i as f64 * step;
            json!([x, x * scale])
        })
        .collect();
    Value::Array(stops)
}

/// Color zoom stops alternating between black and white.
pub fn color_stops(count: usize, step: f64) -> Value {
    let stops: Vec<Value> = (0..count)
        .map(|i| {
            let color = if i % 2 == 0 { "#000000" } else { "#ffffff" };
            json!([i as f64 * step, color])
        })
        .collect();
    Value::Array(stops)
}
