//! Non-fatal issues reported alongside a successful load or compile.

use std::fmt;

use serde::Serialize;

/// What kind of degradation happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A layer's `ref` names a layer that does not exist
    DanglingReference,
    /// A source's linked metadata or data could not be loaded
    SourceUnavailable,
    /// The sprite image or its metadata could not be loaded
    SpriteUnavailable,
}

/// A single non-fatal issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The layer id, source id or URL the issue is about
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}): {}", self.kind, self.subject, self.message)
    }
}
