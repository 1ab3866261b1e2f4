//! Shared test utilities for the map-style workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Style document fixtures
//! - Feature and stop generators
//! - Approximate equality macros for numbers and colors
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, assert_approx_eq};
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of two evaluated values that should be numbers.
///
/// ```ignore
/// assert_number_eq!(evaluator.evaluate(5.0, &feature), 2.5);
/// ```
#[macro_export]
macro_rules! assert_number_eq {
    ($value:expr, $expected:expr) => {{
        let value = $value;
        match value.as_f64() {
            Some(n) => $crate::assert_approx_eq!(n, $expected, 1e-9),
            None => panic!("expected a number, got {:?}", value),
        }
    }};
}

/// Compare an evaluated color against an 8-bit RGBA tuple.
///
/// ```ignore
/// assert_rgba8_eq!(evaluator.evaluate(5.0, &feature), (128, 0, 0, 255));
/// ```
#[macro_export]
macro_rules! assert_rgba8_eq {
    ($value:expr, $expected:expr) => {{
        let value = $value;
        match value.as_color() {
            Some(c) => assert_eq!(c.to_rgba8(), $expected, "color {}", c),
            None => panic!("expected a color, got {:?}", value),
        }
    }};
}
