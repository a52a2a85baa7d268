//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the catalogue core and the outside world:
//! trigger handlers plug in through [`TriggerHandler`], the host supplies a
//! [`TriggerListener`], and absorbed failures flow out through a
//! [`DiagnosticSink`].

pub mod diagnostics;
pub mod handler;
pub mod listener;

pub use diagnostics::{Diagnostic, DiagnosticSink, Operation, TracingDiagnostics};
pub use handler::{BoxedHandler, ConstructArgs, TriggerHandler, TriggerType};
pub use listener::{NullListener, SharedListener, TriggerListener};
