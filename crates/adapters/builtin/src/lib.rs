//! # triggerhub-adapter-builtin
//!
//! Trigger types shipped with triggerhub.
//!
//! ## Provided types
//!
//! | Position | Type name | Sub-variants | True when |
//! |----------|-----------|--------------|-----------|
//! | 1 | `builtin.weekday` | Mon-Fri, Weekend, Any day | today is a matching day and not skipped |
//! | 2 | `builtin.time_of_day` | At, Between | the clock matches the minute or window |
//! | 3 | `builtin.entity_state` | Changes to, Is | the entity reports the configured state |
//!
//! Configuration is stored as a JSON blob; an empty blob is an unconfigured
//! trigger.
//!
//! ## Dependency rule
//!
//! Depends on `triggerhub-app` (port traits) and `triggerhub-domain` only.

mod blob;
mod entity_state;
mod markup;
mod time_of_day;
mod weekday;

#[cfg(test)]
mod test_support;

pub use entity_state::EntityStateTrigger;
pub use time_of_day::TimeOfDayTrigger;
pub use weekday::WeekdayTrigger;

use anyhow::anyhow;

use triggerhub_app::ports::SharedListener;
use triggerhub_app::registry::TriggerTypeRegistry;
use triggerhub_domain::descriptor::TriggerTypeDescriptor;
use triggerhub_domain::error::{HandlerError, RegistrationError};

/// Register every built-in trigger type in catalogue order.
///
/// # Errors
///
/// Returns [`RegistrationError::DuplicateHandlerName`] when one of the
/// built-in names is already taken in `registry`.
pub fn register_builtin(
    registry: &mut TriggerTypeRegistry,
) -> Result<Vec<TriggerTypeDescriptor>, RegistrationError> {
    Ok(vec![
        registry.register_type::<WeekdayTrigger>()?,
        registry.register_type::<TimeOfDayTrigger>()?,
        registry.register_type::<EntityStateTrigger>()?,
    ])
}

/// Default instances carry no listener and cannot evaluate.
fn listener(listener: Option<&SharedListener>) -> Result<&SharedListener, HandlerError> {
    listener.ok_or_else(|| HandlerError::Other(anyhow!("trigger was not rebuilt from a key")))
}
