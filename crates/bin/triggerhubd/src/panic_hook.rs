//! Panic reports routed through `tracing`.
//!
//! The dispatcher contains handler panics, but the process hook runs before
//! the unwind is caught. With the default hook every contained panic would
//! be printed to stderr whatever the dispatch debug flag says.

use std::panic::PanicHookInfo;

/// Hook that logs each panic at `warn` when `verbose`, at `debug` otherwise.
pub fn route_to_tracing(verbose: bool) -> impl Fn(&PanicHookInfo<'_>) + Send + Sync + 'static {
    move |info| {
        if verbose {
            tracing::warn!(panic = %info, "thread panicked");
        } else {
            tracing::debug!(panic = %info, "thread panicked");
        }
    }
}
