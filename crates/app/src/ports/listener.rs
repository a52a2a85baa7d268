//! Listener port — the callback handle a handler uses to reach back into the
//! owning plugin.
//!
//! The dispatcher passes the listener through to every from-descriptor
//! construction unchanged and never calls it itself.

use std::sync::Arc;

use triggerhub_domain::id::EntityRef;
use triggerhub_domain::time::{self, LocalTimestamp};

/// Host capabilities available to trigger handlers.
pub trait TriggerListener: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> LocalTimestamp {
        time::now()
    }

    /// Current state of an external entity, `None` if the host does not
    /// know it.
    fn entity_state(&self, entity: EntityRef) -> Option<String>;
}

/// Shared listener handle.
pub type SharedListener = Arc<dyn TriggerListener>;

/// Listener for hosts without an entity model: system clock, no entities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullListener;

impl TriggerListener for NullListener {
    fn entity_state(&self, _entity: EntityRef) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_know_no_entities() {
        assert!(NullListener.entity_state(EntityRef::new(1)).is_none());
    }
}
