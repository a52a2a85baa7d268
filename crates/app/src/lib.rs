//! # triggerhub-app
//!
//! Application layer — the trigger-type catalogue and its dispatch surface.
//!
//! ## Responsibilities
//! - Define **port traits**:
//!   - `TriggerHandler` / `TriggerType` — what a pluggable trigger type implements
//!   - `TriggerListener` — host callbacks handed to every rebuilt instance
//!   - `DiagnosticSink` — where absorbed failures are reported
//! - Provide the **catalogue use-cases**:
//!   - `TriggerTypeRegistry` — append-only, position-stable registration
//!   - `InstanceResolver` — rebuild an instance from a position or a persisted key
//!   - `TriggerDispatcher` — host-facing operations with uniform failure absorption
//!
//! ## Dependency rule
//! Depends on `triggerhub-domain` only (plus `tracing`).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod dispatcher;
pub mod ports;
pub mod registry;
pub mod resolver;

mod guard;

#[cfg(test)]
mod test_support;
