//! Error types for the optimizer.
//!
//! | Error             | Fatal | Raised by                                  |
//! |-------------------|-------|--------------------------------------------|
//! | `ParseError`      | yes   | `Document::parse` / `Document::from_bytes` |
//! | `StructureError`  | yes   | parse time, `head()` / `body()` accessors  |
//! | `ConfigError`     | yes   | configuration construction and `get()`     |
//! | `TransformError`  | only for transformers marked `required`      |
//!
//! Failures of non-required transformers are recorded as [`Diagnostic`]s in an
//! [`ErrorCollection`] and the pipeline keeps going.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::pipeline::TransformerId;

// ============================================================================
// Document errors
// ============================================================================

/// Input could not be interpreted as an HTML document at all.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("document is empty")]
    Empty,

    #[error("document is not valid UTF-8")]
    Encoding(#[from] std::str::Utf8Error),
}

/// The tree lacks an element the optimizer requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("document has no <{0}> element")]
    Missing(&'static str),
}

// ============================================================================
// Transform errors
// ============================================================================

/// A single transformer failed.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("custom CSS is {used} bytes, exceeding the {max} byte budget")]
    CssBudgetExceeded { used: usize, max: usize },

    #[error("{0}")]
    Failed(String),
}

/// Top-level error of an optimize call.
///
/// Callers must not serve partial output when they receive one of these:
/// fall back to the unoptimized (or previously cached) markup instead.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("failed to parse document: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("required transformer `{transformer}` failed: {source}")]
    Transform {
        transformer: TransformerId,
        #[source]
        source: TransformError,
    },
}

// ============================================================================
// Diagnostics
// ============================================================================

/// A non-fatal problem surfaced during optimization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Transformer that reported the problem.
    pub source: TransformerId,
    /// Tag name of the offending element, for per-element problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(source: TransformerId, message: impl Into<String>) -> Self {
        Self {
            source,
            element: None,
            message: message.into(),
        }
    }

    pub fn with_element(mut self, tag: impl Into<String>) -> Self {
        self.element = Some(tag.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.element {
            Some(tag) => write!(f, "{}: <{}> {}", self.source, tag, self.message),
            None => write!(f, "{}: {}", self.source, self.message),
        }
    }
}

/// Diagnostics collected over one or more optimize calls.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    entries: Vec<Diagnostic>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Check if any diagnostic came from `source`.
    pub fn has(&self, source: TransformerId) -> bool {
        self.entries.iter().any(|d| d.source == source)
    }

    /// Move all diagnostics of `other` into this collection.
    pub fn extend(&mut self, other: ErrorCollection) {
        self.entries.extend(other.entries);
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(TransformerId::ServerSideRendering, "invalid width `abc`")
            .with_element("amp-img");
        assert_eq!(
            d.to_string(),
            "server_side_rendering: <amp-img> invalid width `abc`"
        );
    }

    #[test]
    fn test_error_collection_tracks_sources() {
        let mut errors = ErrorCollection::new();
        assert!(errors.is_empty());
        errors.add(Diagnostic::new(TransformerId::CssBudget, "too big"));
        assert_eq!(errors.len(), 1);
        assert!(errors.has(TransformerId::CssBudget));
        assert!(!errors.has(TransformerId::ReorderHead));
    }

    #[test]
    fn test_optimize_error_display() {
        let err = OptimizeError::Transform {
            transformer: TransformerId::CssBudget,
            source: TransformError::CssBudgetExceeded { used: 10, max: 5 },
        };
        let display = err.to_string();
        assert!(display.contains("css_budget"));
        assert!(display.contains("10 bytes"));
    }
}
