//! Diagnostics produced by the linearity pass

use lc_span::FileSpan;
use serde::{Deserialize, Serialize};

/// A linearity violation. The pass is fail-slow: it reports every
/// violation it finds and keeps scanning.
// Display/Error are hand-written (not thiserror-derived) because the
// `source` field name would be misread by the derive as an error source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearError {
    /// A linear variable was read after it was already consumed.
    Reuse { name: String, span: FileSpan },

    /// Same as [`LinearError::Reuse`], but the read went through an
    /// alias rather than the originally declared name.
    ReuseAliased { name: String, alias: String, span: FileSpan },

    /// A variable without a linear mark was assigned to a linear one.
    NonLinearSource { source: String, target: String, span: FileSpan },

    /// A call whose return type is not linear-compatible initialized a
    /// linear variable.
    NonLinearCallResult { call: String, target: String, span: FileSpan },

    /// A linear variable was passed where the callee does not declare a
    /// linear-compatible parameter, so the value would escape tracking.
    NonLinearParameter { arg: String, callee: String, index: usize, span: FileSpan },

    /// A method with a linear return type returned a value the caller
    /// could not track.
    NonLinearReturn { value: String, method: String, span: FileSpan },
}

impl std::fmt::Display for LinearError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinearError::Reuse { name, .. } => {
                write!(f, "Re-using @Linear variable {name}")
            }
            LinearError::ReuseAliased { name, alias, .. } => {
                write!(f, "Re-using @Linear variable {name} (aliased as {alias})")
            }
            LinearError::NonLinearSource { source, target, .. } => {
                write!(f, "Cannot assign non-linear variable {source} to linear variable {target}")
            }
            LinearError::NonLinearCallResult { call, target, .. } => {
                write!(
                    f,
                    "Cannot assign non-linear return type of {call} to linear variable {target}"
                )
            }
            LinearError::NonLinearParameter { arg, callee, index, .. } => {
                write!(
                    f,
                    "Cannot use linear variable {arg} as argument of method {callee}() at index {index} (parameter is not linear)"
                )
            }
            LinearError::NonLinearReturn { value, method, .. } => {
                write!(f, "Cannot return non-linear value {value} in linear method {method}()")
            }
        }
    }
}

impl std::error::Error for LinearError {}

impl LinearError {
    pub fn span(&self) -> FileSpan {
        match self {
            LinearError::Reuse { span, .. }
            | LinearError::ReuseAliased { span, .. }
            | LinearError::NonLinearSource { span, .. }
            | LinearError::NonLinearCallResult { span, .. }
            | LinearError::NonLinearParameter { span, .. }
            | LinearError::NonLinearReturn { span, .. } => *span,
        }
    }
}

/// Where the pass sends its diagnostics. Hosts that want streaming
/// reporting implement this; batch callers use the `Vec` impl.
pub trait DiagnosticSink {
    fn report(&mut self, error: LinearError);
}

impl DiagnosticSink for Vec<LinearError> {
    fn report(&mut self, error: LinearError) {
        self.push(error);
    }
}
