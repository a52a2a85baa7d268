//! Instance resolver — turns a catalogue position or a persisted key into a
//! live handler instance.
//!
//! Every call builds a fresh instance; nothing is cached or pooled.

use std::sync::Arc;

use triggerhub_domain::descriptor::TriggerInstanceKey;
use triggerhub_domain::error::ResolveError;
use triggerhub_domain::id::TypePosition;

use crate::guard;
use crate::ports::{BoxedHandler, ConstructArgs, SharedListener};
use crate::registry::{RegisteredType, TriggerTypeRegistry};

/// Builds handler instances from a frozen registry.
#[derive(Clone)]
pub struct InstanceResolver {
    registry: Arc<TriggerTypeRegistry>,
    listener: SharedListener,
    debug: bool,
}

impl std::fmt::Debug for InstanceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceResolver")
            .field("registry", &self.registry)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl InstanceResolver {
    #[must_use]
    pub fn new(registry: Arc<TriggerTypeRegistry>, listener: SharedListener) -> Self {
        Self {
            registry,
            listener,
            debug: false,
        }
    }

    /// Debug flag handed to every from-descriptor construction.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &TriggerTypeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Build an instance with no saved state, for catalogue metadata.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnknownTypePosition`] when `position` is outside the catalogue
    /// - [`ResolveError::HandlerConstructionFailed`] when the default factory panics
    /// - [`ResolveError::HandlerContractViolation`] when the instance is unusable
    pub fn resolve_default(&self, position: TypePosition) -> Result<BoxedHandler, ResolveError> {
        let entry = self.lookup(position)?;
        let handler = guard::contain(|| entry.construct_default()).map_err(|source| {
            ResolveError::HandlerConstructionFailed {
                name: entry.name().to_string(),
                source,
            }
        })?;
        check_contract(entry, handler)
    }

    /// Rebuild a configured instance from its persisted key.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnknownTypePosition`] when the key's type position is
    ///   outside the catalogue, whatever its other fields hold
    /// - [`ResolveError::HandlerConstructionFailed`] when the factory fails or panics
    /// - [`ResolveError::HandlerContractViolation`] when the instance is unusable
    pub fn resolve_from_key(&self, key: &TriggerInstanceKey) -> Result<BoxedHandler, ResolveError> {
        let entry = self.lookup(key.type_position)?;
        let args = ConstructArgs {
            identity: key.identity,
            sub_variant: key.sub_type_position,
            config_data: key.config_data.clone(),
            listener: Arc::clone(&self.listener),
            debug: self.debug,
        };
        let handler = guard::contain(|| entry.construct(args))
            .and_then(|built| built)
            .map_err(|source| ResolveError::HandlerConstructionFailed {
                name: entry.name().to_string(),
                source,
            })?;
        check_contract(entry, handler)
    }

    fn lookup(&self, position: TypePosition) -> Result<&RegisteredType, ResolveError> {
        self.registry
            .get(position)
            .ok_or_else(|| ResolveError::UnknownTypePosition {
                position,
                count: self.registry.count(),
            })
    }
}

/// A usable instance reports a non-empty display name.
fn check_contract(
    entry: &RegisteredType,
    handler: BoxedHandler,
) -> Result<BoxedHandler, ResolveError> {
    let violation = |reason: &'static str| ResolveError::HandlerContractViolation {
        name: entry.name().to_string(),
        reason,
    };
    let reason = match guard::contain(|| handler.name()) {
        Ok(name) if name.trim().is_empty() => "instance reports an empty name",
        Ok(_) => return Ok(handler),
        Err(_) => "instance panics when asked for its name",
    };
    guard::discard(handler);
    Err(violation(reason))
}
