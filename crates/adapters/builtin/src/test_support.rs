use std::collections::HashMap;

use chrono::NaiveDateTime;

use triggerhub_app::ports::TriggerListener;
use triggerhub_domain::id::EntityRef;
use triggerhub_domain::time::LocalTimestamp;

/// Listener with a frozen clock and a fixed set of entity states.
pub(crate) struct FixedListener {
    now: LocalTimestamp,
    states: HashMap<EntityRef, String>,
}

impl FixedListener {
    /// Clock frozen at `YYYY-MM-DD HH:MM[:SS]`.
    pub fn at(text: &str) -> Self {
        let now = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M"))
            .unwrap();
        Self {
            now,
            states: HashMap::new(),
        }
    }

    pub fn with_state(mut self, entity: i64, state: &str) -> Self {
        self.states.insert(EntityRef::new(entity), state.to_string());
        self
    }
}

impl Default for FixedListener {
    fn default() -> Self {
        // A Monday.
        Self::at("2024-06-03 12:00")
    }
}

impl TriggerListener for FixedListener {
    fn now(&self) -> LocalTimestamp {
        self.now
    }

    fn entity_state(&self, entity: EntityRef) -> Option<String> {
        self.states.get(&entity).cloned()
    }
}
