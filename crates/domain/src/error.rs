//! Error types shared across the workspace.
//!
//! Each stage has its own typed error:
//! - [`RegistrationError`] — catalogue building, surfaced to the integrator
//! - [`ResolveError`] — rebuilding an instance from a position or key
//! - [`HandlerError`] — anything a trigger handler reports
//!
//! [`DispatchError`] unifies the last two; it is what the dispatcher absorbs
//! into safe defaults.

use crate::id::{SubVariantPosition, TypePosition};

/// The part of a handler registration that was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPart {
    /// The registration has an empty type name.
    Name,
    /// No zero-argument (default) factory.
    DefaultConstructor,
    /// No factory rebuilding an instance from a persisted key.
    DescriptorConstructor,
}

impl std::fmt::Display for MissingPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => f.write_str("type name"),
            Self::DefaultConstructor => f.write_str("default constructor"),
            Self::DescriptorConstructor => f.write_str("from-descriptor constructor"),
        }
    }
}

/// Registration-time failures. The catalogue is left unchanged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("handler `{name}` is missing its {missing}")]
    InvalidHandlerShape { name: String, missing: MissingPart },

    #[error("a handler named `{name}` is already registered at position {position}")]
    DuplicateHandlerName {
        name: String,
        position: TypePosition,
    },

    #[error("catalogue cannot hold more trigger types")]
    CatalogueFull,
}

/// Failures while turning a position or key into a live handler instance.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no trigger type at position {position} (catalogue holds {count})")]
    UnknownTypePosition { position: TypePosition, count: usize },

    #[error("failed to construct trigger type `{name}`")]
    HandlerConstructionFailed {
        name: String,
        #[source]
        source: HandlerError,
    },

    #[error("trigger type `{name}` violated the handler contract: {reason}")]
    HandlerContractViolation { name: String, reason: &'static str },
}

/// Failures reported by a trigger handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("no sub-variant at position {position} (type has {count})")]
    SubVariantOutOfRange {
        position: SubVariantPosition,
        count: u32,
    },

    #[error("`{capability}` is not supported by this trigger type")]
    Unsupported { capability: &'static str },

    #[error("invalid configuration data")]
    InvalidConfig(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("handler panicked: {message}")]
    Panicked { message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Any failure along the dispatch path.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl DispatchError {
    /// Render the error with its full `source()` chain, `": "`-separated.
    #[must_use]
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            let text = err.to_string();
            if !message.ends_with(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = err.source();
        }
        message
    }
}
