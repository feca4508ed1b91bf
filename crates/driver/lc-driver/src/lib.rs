//! Embedding surface for the linearity checker
//!
//! Hosts hand each resolved [`Unit`] to [`check_unit`] and render the
//! diagnostics however they like; [`render_error`] provides the
//! conventional `file:line message` form.

use lc_ast::Unit;
use lc_intern::Interner;
use lc_linear::{DiagnosticSink, LinearChecker, LinearError};
use lc_span::LineMap;
use serde::{Deserialize, Serialize};

/// Marker annotation used when the host does not configure one.
pub const DEFAULT_MARKER: &str = "linearcheck.annotation.Linear";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Fully qualified name of the marker annotation.
    pub marker: String,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { marker: DEFAULT_MARKER.to_owned() }
    }
}

impl CheckConfig {
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self { marker: marker.into() }
    }
}

/// Checks one unit and returns its diagnostics in source order.
///
/// Every call starts from a clean slate, so units can be checked in any
/// order and rechecking a unit yields the same result.
pub fn check_unit(unit: &Unit, interner: &Interner, config: &CheckConfig) -> Vec<LinearError> {
    LinearChecker::check(unit, interner, &config.marker)
}

/// Like [`check_unit`], but streams diagnostics into `sink`.
pub fn check_unit_into(
    unit: &Unit,
    interner: &Interner,
    config: &CheckConfig,
    sink: &mut dyn DiagnosticSink,
) {
    LinearChecker::run(unit, interner, &config.marker, sink);
}

/// Renders one diagnostic as `name:line message`, e.g.
/// `Runner.java:6 Re-using @Linear variable y (aliased as x)`.
pub fn render_error(error: &LinearError, file_name: &str, lines: &LineMap) -> String {
    let line = lines.line_number(error.span().span.start);
    format!("{file_name}:{line} {error}")
}
