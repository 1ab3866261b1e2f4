//! Style compilation engine.
//!
//! Turns a parsed style document into render-ready layers:
//! - `deref` expands `ref` inheritance
//! - `filter` compiles filter expressions into predicates
//! - `function` and `evaluator` turn property specs into evaluators
//! - `interpolate` is the stop interpolation both depend on
//!
//! Compilation is synchronous and pure; everything it returns is
//! `Send + Sync` and never fails at evaluation time.

pub mod compile;
pub mod defaults;
pub mod deref;
pub mod evaluator;
pub mod filter;
pub mod function;
pub mod interpolate;

pub use compile::{
    compile_layer, compile_layers, compile_style, compile_style_strict, describe_evaluators,
    CompiledLayer, CompiledStyle,
};
pub use defaults::{layout_defaults, paint_defaults, LayerDefaults};
pub use deref::{dereference_layers, DanglingRef, Dereferenced, REF_PROPERTIES};
pub use evaluator::{synthesize_properties, PropertyEvaluator, PropertyEvaluators};
pub use filter::{compile_filter, FeatureFilter};
pub use function::{FunctionKind, PropertySpec};
pub use interpolate::{build_interpolator, Interpolator, Scale};
