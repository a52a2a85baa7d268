//! Handler port — the capability set every trigger type implements.
//!
//! A handler instance is rebuilt for each dispatch from a persisted key and
//! dropped when the call returns, so implementations keep their state in
//! their own fields and never share it across calls.

use triggerhub_domain::descriptor::InstanceIdentity;
use triggerhub_domain::edit::{AppliedEdit, EditFields};
use triggerhub_domain::error::HandlerError;
use triggerhub_domain::id::{EntityRef, SubVariantPosition};
use triggerhub_domain::markup::Markup;

use super::listener::SharedListener;

/// A live trigger instance.
///
/// Only [`name`](Self::name) and [`evaluate`](Self::evaluate) are required.
/// The provided bodies describe a minimal trigger type: no sub-variants,
/// nothing to configure, no entity references, not combinable.
pub trait TriggerHandler {
    /// Human-readable type name shown in the host's catalogue.
    fn name(&self) -> String;

    /// Number of selectable sub-variants, `0` if the type has none.
    fn sub_variant_count(&self) -> u32 {
        0
    }

    /// Name of the sub-variant at a 1-based position.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::SubVariantOutOfRange`] when `position` does not
    /// address a sub-variant.
    fn sub_variant_name(&self, position: SubVariantPosition) -> Result<String, HandlerError> {
        Err(HandlerError::SubVariantOutOfRange {
            position,
            count: self.sub_variant_count(),
        })
    }

    /// Configuration UI for the current state.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Unsupported`] unless overridden.
    fn render_config_ui(&self) -> Result<Markup, HandlerError> {
        Err(HandlerError::Unsupported {
            capability: "render_config_ui",
        })
    }

    /// Validate and apply user-submitted field values.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError::Unsupported`] unless overridden.
    fn apply_edits(&mut self, _fields: &EditFields) -> Result<AppliedEdit, HandlerError> {
        Err(HandlerError::Unsupported {
            capability: "apply_edits",
        })
    }

    /// Whether the user has supplied everything the trigger needs.
    ///
    /// # Errors
    ///
    /// Implementations fail when their saved state cannot be interpreted.
    fn is_fully_configured(&self) -> Result<bool, HandlerError> {
        Ok(true)
    }

    /// Prose summary of the current configuration.
    ///
    /// # Errors
    ///
    /// Implementations fail when their saved state cannot be interpreted.
    fn describe(&self) -> Result<Markup, HandlerError> {
        Ok(Markup::new(self.name()))
    }

    /// The trigger's truth value. `is_condition` is `true` when the host is
    /// checking it as a condition alongside other triggers rather than as
    /// the rule's firing trigger.
    ///
    /// # Errors
    ///
    /// Implementations fail when their saved state cannot be interpreted.
    fn evaluate(&self, is_condition: bool) -> Result<bool, HandlerError>;

    /// Whether the configuration depends on the given external entity.
    ///
    /// # Errors
    ///
    /// Implementations fail when their saved state cannot be interpreted.
    fn references_entity(&self, _entity: EntityRef) -> Result<bool, HandlerError> {
        Ok(false)
    }

    /// Whether the type may be used as a condition alongside other triggers.
    fn supports_combination(&self) -> bool {
        false
    }
}

/// A handler instance owned by a single dispatch.
pub type BoxedHandler = Box<dyn TriggerHandler>;

/// Arguments handed to a from-descriptor constructor.
pub struct ConstructArgs {
    pub identity: InstanceIdentity,
    pub sub_variant: SubVariantPosition,
    pub config_data: Vec<u8>,
    pub listener: SharedListener,
    /// Diagnostic verbosity of the owning dispatcher.
    pub debug: bool,
}

impl std::fmt::Debug for ConstructArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstructArgs")
            .field("identity", &self.identity)
            .field("sub_variant", &self.sub_variant)
            .field("config_len", &self.config_data.len())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

/// A trigger type known at compile time.
///
/// Implementing this trait supplies both construction paths the registry
/// requires, so [`TriggerTypeRegistry::register_type`](crate::registry::TriggerTypeRegistry::register_type)
/// can never fail with a shape error.
pub trait TriggerType: TriggerHandler + Sized + 'static {
    /// Fully-qualified, unique catalogue name (e.g. `"builtin.weekday"`).
    const TYPE_NAME: &'static str;

    /// Instance with no saved state, used for catalogue metadata.
    fn new_default() -> Self;

    /// Rebuild a configured instance from its persisted key.
    ///
    /// # Errors
    ///
    /// Fails when the key cannot produce a usable instance.
    fn from_descriptor(args: ConstructArgs) -> Result<Self, HandlerError>;
}

/// Look up a 1-based sub-variant in a static name table.
///
/// # Errors
///
/// Returns [`HandlerError::SubVariantOutOfRange`] for `0` or any position
/// past the end of `names`.
pub fn sub_variant_from_table(
    names: &[&str],
    position: SubVariantPosition,
) -> Result<String, HandlerError> {
    position
        .index()
        .and_then(|index| names.get(index))
        .map(|name| (*name).to_string())
        .ok_or_else(|| HandlerError::SubVariantOutOfRange {
            position,
            count: u32::try_from(names.len()).unwrap_or(u32::MAX),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl TriggerHandler for Bare {
        fn name(&self) -> String {
            "Bare".to_string()
        }

        fn evaluate(&self, _is_condition: bool) -> Result<bool, HandlerError> {
            Ok(true)
        }
    }

    const DAYS: &[&str] = &["Mon-Fri", "Weekend", "Any day"];

    #[test]
    fn should_pick_sub_variant_by_one_based_position() {
        let name = sub_variant_from_table(DAYS, SubVariantPosition::new(2)).unwrap();
        assert_eq!(name, "Weekend");
    }

    #[test]
    fn should_reject_position_zero() {
        let err = sub_variant_from_table(DAYS, SubVariantPosition::NONE).unwrap_err();
        assert!(matches!(
            err,
            HandlerError::SubVariantOutOfRange { count: 3, .. }
        ));
    }

    #[test]
    fn should_reject_position_past_end() {
        assert!(sub_variant_from_table(DAYS, SubVariantPosition::new(4)).is_err());
    }

    #[test]
    fn should_provide_minimal_defaults() {
        let mut handler = Bare;
        assert_eq!(handler.sub_variant_count(), 0);
        assert!(handler.sub_variant_name(SubVariantPosition::new(1)).is_err());
        assert!(matches!(
            handler.render_config_ui(),
            Err(HandlerError::Unsupported { .. })
        ));
        assert!(handler.apply_edits(&EditFields::new()).is_err());
        assert!(handler.is_fully_configured().unwrap());
        assert_eq!(handler.describe().unwrap().as_str(), "Bare");
        assert!(!handler.references_entity(EntityRef::new(1)).unwrap());
        assert!(!handler.supports_combination());
    }
}
