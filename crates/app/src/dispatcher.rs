//! Trigger dispatcher — the operation surface the host calls.
//!
//! Every operation resolves a fresh instance, invokes exactly one handler
//! capability, and absorbs any failure (unknown position, constructor error,
//! handler error, handler panic, panicking `Drop`) into a documented safe
//! default. Resolution itself asks each new instance for its `name()` once
//! to reject nameless instances, so a handler sees that call before the
//! operation's own; [`name`](TriggerDispatcher::name) therefore reaches
//! `name()` twice. When the dispatcher runs in debug mode each absorbed
//! failure is also reported to the [`DiagnosticSink`].
//!
//! | Operation | Safe default |
//! |-----------|--------------|
//! | [`name`](TriggerDispatcher::name) | [`NAME_ERROR`] |
//! | [`sub_variant_count`](TriggerDispatcher::sub_variant_count) | `0` |
//! | [`sub_variant_name`](TriggerDispatcher::sub_variant_name) | [`NO_SUB_VARIANT`] |
//! | [`render_ui`](TriggerDispatcher::render_ui) | failure message |
//! | [`apply_edits`](TriggerDispatcher::apply_edits) | failed outcome, previous data |
//! | [`is_configured`](TriggerDispatcher::is_configured) | `true` |
//! | [`describe`](TriggerDispatcher::describe) | failure message |
//! | [`evaluate`](TriggerDispatcher::evaluate) | `false` |
//! | [`references_entity`](TriggerDispatcher::references_entity) | `false` |
//! | [`supports_combination`](TriggerDispatcher::supports_combination) | `false` |
//!
//! `is_configured` is the odd one out: the host re-opens the configuration
//! UI for triggers reported as unconfigured, so answering `false` for a
//! broken handler would trap the user in that UI.

use std::sync::Arc;

use triggerhub_domain::descriptor::{TriggerInstanceKey, TriggerTypeDescriptor};
use triggerhub_domain::edit::{EditFields, EditOutcome};
use triggerhub_domain::error::{DispatchError, HandlerError};
use triggerhub_domain::id::{EntityRef, SubVariantPosition, TriggerUid, TypePosition};
use triggerhub_domain::markup::Markup;

use crate::guard;
use crate::ports::{
    Diagnostic, DiagnosticSink, Operation, SharedListener, TracingDiagnostics, TriggerHandler,
};
use crate::registry::TriggerTypeRegistry;
use crate::resolver::InstanceResolver;

/// Returned by [`TriggerDispatcher::name`] when the name cannot be obtained.
pub const NAME_ERROR: &str = "Error retrieving trigger name";

/// Returned by [`TriggerDispatcher::sub_variant_name`] when the sub-variant
/// cannot be obtained.
pub const NO_SUB_VARIANT: &str = "No sub-trigger type for that index";

/// Failure-absorbing front door to the trigger catalogue.
///
/// Cheap to clone and safe to share across threads: the registry is frozen
/// behind an `Arc` and every call owns the instance it builds.
#[derive(Clone)]
pub struct TriggerDispatcher {
    resolver: InstanceResolver,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl std::fmt::Debug for TriggerDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriggerDispatcher")
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl TriggerDispatcher {
    /// Create a dispatcher over a fully registered catalogue.
    #[must_use]
    pub fn new(registry: Arc<TriggerTypeRegistry>, listener: SharedListener) -> Self {
        Self {
            resolver: InstanceResolver::new(registry, listener),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Enable diagnostics for absorbed failures. The flag is also handed to
    /// every handler constructed from a key.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.resolver = self.resolver.with_debug(debug);
        self
    }

    /// Replace the default `tracing` diagnostic sink.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    #[must_use]
    pub fn resolver(&self) -> &InstanceResolver {
        &self.resolver
    }

    /// Number of registered trigger types.
    #[must_use]
    pub fn count(&self) -> usize {
        self.resolver.registry().count()
    }

    /// Catalogue entries in position order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<TriggerTypeDescriptor> {
        self.resolver.registry().descriptors().cloned().collect()
    }

    // ── Type-level operations (default instance) ───────────────

    /// Display name of the trigger type at `position`.
    #[must_use]
    pub fn name(&self, position: TypePosition) -> String {
        self.on_default(Operation::Name, position, |handler| Ok(handler.name()))
            .unwrap_or_else(|_| NAME_ERROR.to_string())
    }

    /// Number of sub-variants of the trigger type at `position`.
    #[must_use]
    pub fn sub_variant_count(&self, position: TypePosition) -> u32 {
        self.on_default(Operation::SubVariantCount, position, |handler| {
            Ok(handler.sub_variant_count())
        })
        .unwrap_or(0)
    }

    /// Name of a sub-variant of the trigger type at `position`.
    #[must_use]
    pub fn sub_variant_name(
        &self,
        position: TypePosition,
        sub_variant: SubVariantPosition,
    ) -> String {
        self.on_default(Operation::SubVariantName, position, |handler| {
            handler.sub_variant_name(sub_variant)
        })
        .unwrap_or_else(|_| NO_SUB_VARIANT.to_string())
    }

    /// Whether the trigger type at `position` may be combined with others.
    #[must_use]
    pub fn supports_combination(&self, position: TypePosition) -> bool {
        self.on_default(Operation::SupportsCombination, position, |handler| {
            Ok(handler.supports_combination())
        })
        .unwrap_or(false)
    }

    /// Display names of every registered type, in position order.
    #[must_use]
    pub fn type_names(&self) -> Vec<String> {
        self.resolver
            .registry()
            .descriptors()
            .map(|descriptor| self.name(descriptor.position))
            .collect()
    }

    /// Every sub-variant name of the trigger type at `position`.
    #[must_use]
    pub fn sub_variant_names(&self, position: TypePosition) -> Vec<String> {
        (1..=self.sub_variant_count(position))
            .map(|sub| self.sub_variant_name(position, SubVariantPosition::new(sub)))
            .collect()
    }

    // ── Instance-level operations (rebuilt from a key) ─────────

    /// Configuration UI for a configured trigger.
    #[must_use]
    pub fn render_ui(&self, key: &TriggerInstanceKey) -> Markup {
        self.on_key(Operation::RenderUi, key, |handler| handler.render_config_ui())
            .unwrap_or_else(|err| Markup::new(err.chain()))
    }

    /// Apply user-submitted fields; on failure the key's data is returned
    /// unchanged.
    #[must_use]
    pub fn apply_edits(&self, fields: &EditFields, key: &TriggerInstanceKey) -> EditOutcome {
        self.on_key(Operation::ApplyEdits, key, |handler| handler.apply_edits(fields))
            .map_or_else(
                |err| EditOutcome::failed(key.config_data.clone(), err.chain()),
                EditOutcome::from,
            )
    }

    /// Whether the trigger has everything it needs. Defaults to `true`.
    #[must_use]
    pub fn is_configured(&self, key: &TriggerInstanceKey) -> bool {
        self.on_key(Operation::IsConfigured, key, |handler| {
            handler.is_fully_configured()
        })
        .unwrap_or(true)
    }

    /// Prose summary of a configured trigger.
    #[must_use]
    pub fn describe(&self, key: &TriggerInstanceKey) -> Markup {
        self.on_key(Operation::Describe, key, |handler| handler.describe())
            .unwrap_or_else(|err| Markup::new(err.chain()))
    }

    /// Truth value of a configured trigger.
    #[must_use]
    pub fn evaluate(&self, key: &TriggerInstanceKey, is_condition: bool) -> bool {
        self.on_key(Operation::Evaluate, key, |handler| {
            handler.evaluate(is_condition)
        })
        .unwrap_or(false)
    }

    /// Whether a configured trigger depends on `entity`.
    #[must_use]
    pub fn references_entity(&self, entity: EntityRef, key: &TriggerInstanceKey) -> bool {
        self.on_key(Operation::ReferencesEntity, key, |handler| {
            handler.references_entity(entity)
        })
        .unwrap_or(false)
    }

    // ── Plumbing ───────────────────────────────────────────────

    fn on_default<T>(
        &self,
        operation: Operation,
        position: TypePosition,
        call: impl FnOnce(&mut dyn TriggerHandler) -> Result<T, HandlerError>,
    ) -> Result<T, DispatchError> {
        let result = self
            .resolver
            .resolve_default(position)
            .map_err(DispatchError::from)
            .and_then(|handler| invoke(handler, call));
        self.report(operation, position, None, result)
    }

    fn on_key<T>(
        &self,
        operation: Operation,
        key: &TriggerInstanceKey,
        call: impl FnOnce(&mut dyn TriggerHandler) -> Result<T, HandlerError>,
    ) -> Result<T, DispatchError> {
        let result = self
            .resolver
            .resolve_from_key(key)
            .map_err(DispatchError::from)
            .and_then(|handler| invoke(handler, call));
        self.report(
            operation,
            key.type_position,
            Some(key.identity.uid),
            result,
        )
    }

    fn report<T>(
        &self,
        operation: Operation,
        type_position: TypePosition,
        uid: Option<TriggerUid>,
        result: Result<T, DispatchError>,
    ) -> Result<T, DispatchError> {
        if self.resolver.is_debug()
            && let Err(err) = &result
        {
            self.diagnostics.record(&Diagnostic {
                operation,
                type_position,
                uid,
                message: err.chain(),
            });
        }
        result
    }
}

/// Run one capability on an owned instance; the instance is dropped inside
/// the guard so a panicking `Drop` is absorbed too.
fn invoke<T>(
    mut handler: Box<dyn TriggerHandler>,
    call: impl FnOnce(&mut dyn TriggerHandler) -> Result<T, HandlerError>,
) -> Result<T, DispatchError> {
    guard::contain(move || {
        let outcome = call(handler.as_mut());
        drop(handler);
        outcome
    })
    .and_then(|outcome| outcome)
    .map_err(DispatchError::from)
}
