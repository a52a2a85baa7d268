//! Host-side listener — system clock plus the entity states from config.

use std::collections::HashMap;

use triggerhub_app::ports::TriggerListener;
use triggerhub_domain::id::EntityRef;

#[derive(Debug, Default)]
pub struct HostListener {
    states: HashMap<EntityRef, String>,
}

impl HostListener {
    #[must_use]
    pub fn new(states: HashMap<EntityRef, String>) -> Self {
        Self { states }
    }
}

impl TriggerListener for HostListener {
    fn entity_state(&self, entity: EntityRef) -> Option<String> {
        self.states.get(&entity).cloned()
    }
}
