//! Panic containment for handler code.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

use triggerhub_domain::error::HandlerError;

/// Run handler code, turning a panic into [`HandlerError::Panicked`].
///
/// Instances are dropped right after the call and the registry holds no
/// handler state, so nothing observes a half-updated value after unwinding.
///
/// The process panic hook still runs before the unwind is caught, so with
/// the default hook every contained panic is also printed to stderr.
/// Binaries that want it silenced or routed elsewhere install their own
/// hook.
pub(crate) fn contain<T>(f: impl FnOnce() -> T) -> Result<T, HandlerError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| HandlerError::Panicked {
        message: panic_message(payload.as_ref()),
    })
}

/// Drop handler-owned state; a panicking `Drop` is swallowed.
pub(crate) fn discard<T>(value: T) {
    let _ = contain(move || drop(value));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
