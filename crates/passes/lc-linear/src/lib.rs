//! Linear-usage checking
//!
//! Variables whose declaration carries the configured marker annotation
//! are *linear*: each executable path may consume them at most once.
//! [`LinearChecker`] walks one [`lc_ast::Unit`] and reports every
//! violation it finds without stopping at the first.
//!
//! The analysis is scope-based rather than graph-based: straight-line
//! code threads one set of [`LinearMark`]s through a [`ScopeStack`],
//! and mutually exclusive branches are each run on a duplicated frame
//! and folded back together, so `if`/`else` arms and switch runs may
//! each consume the same variable. Loop bodies are the one place the
//! scheme cannot model, so any reference to a tracked variable inside a
//! loop is rejected outright.

pub mod block;
pub mod checker;
pub mod detect;
pub mod error;
pub mod mark;
pub mod scope;

pub use block::BlockKind;
pub use checker::LinearChecker;
pub use detect::AnnotationDetector;
pub use error::{DiagnosticSink, LinearError};
pub use mark::{LinearMark, Mark};
pub use scope::{RoutineInfo, Scope, ScopeStack};
