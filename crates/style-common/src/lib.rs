//! Common types shared by the style compiler, the link loader and tools.

pub mod color;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod feature;
pub mod value;

pub use color::Color;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use document::{Layer, LayerType, SourceSpec, StyleDocument, STYLE_VERSION};
pub use error::{StyleError, StyleResult};
pub use feature::{Feature, GeometryType};
pub use value::PropertyValue;
