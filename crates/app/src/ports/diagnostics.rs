//! Diagnostics port — where absorbed dispatch failures are reported.

use triggerhub_domain::id::{TriggerUid, TypePosition};

/// Dispatcher operation a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Name,
    SubVariantCount,
    SubVariantName,
    RenderUi,
    ApplyEdits,
    IsConfigured,
    Describe,
    Evaluate,
    ReferencesEntity,
    SupportsCombination,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::SubVariantCount => "sub_variant_count",
            Self::SubVariantName => "sub_variant_name",
            Self::RenderUi => "render_ui",
            Self::ApplyEdits => "apply_edits",
            Self::IsConfigured => "is_configured",
            Self::Describe => "describe",
            Self::Evaluate => "evaluate",
            Self::ReferencesEntity => "references_entity",
            Self::SupportsCombination => "supports_combination",
        })
    }
}

/// A failure the dispatcher replaced with a safe default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub operation: Operation,
    pub type_position: TypePosition,
    /// Set for operations dispatched against a configured trigger.
    pub uid: Option<TriggerUid>,
    /// Full error chain.
    pub message: String,
}

/// Receives diagnostics when the dispatcher runs in debug mode.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: &Diagnostic);
}

/// Default sink: one `tracing` warning per diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn record(&self, diagnostic: &Diagnostic) {
        tracing::warn!(
            operation = %diagnostic.operation,
            type_position = %diagnostic.type_position,
            uid = ?diagnostic.uid.map(TriggerUid::get),
            error = %diagnostic.message,
            "trigger dispatch failed"
        );
    }
}
