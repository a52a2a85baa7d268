//! Edits — user-submitted configuration values and their outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field values posted back by the host's configuration UI, keyed by field id.
pub type EditFields = BTreeMap<String, String>;

/// What a handler reports after applying edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEdit {
    /// Whether every submitted field was accepted.
    pub success: bool,
    /// Configuration bytes to persist from now on.
    pub config_data: Vec<u8>,
}

impl AppliedEdit {
    #[must_use]
    pub fn accepted(config_data: Vec<u8>) -> Self {
        Self {
            success: true,
            config_data,
        }
    }

    #[must_use]
    pub fn rejected(config_data: Vec<u8>) -> Self {
        Self {
            success: false,
            config_data,
        }
    }
}

/// What the host receives from an edit dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOutcome {
    pub success: bool,
    pub config_data: Vec<u8>,
    /// Failure message when the edit could not be dispatched at all.
    pub message: Option<String>,
}

impl EditOutcome {
    /// Outcome for an edit that never reached a handler, or whose handler
    /// failed: the previous configuration is kept.
    #[must_use]
    pub fn failed(previous: Vec<u8>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            config_data: previous,
            message: Some(message.into()),
        }
    }
}

impl From<AppliedEdit> for EditOutcome {
    fn from(edit: AppliedEdit) -> Self {
        Self {
            success: edit.success,
            config_data: edit.config_data,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_previous_data_when_failed() {
        let outcome = EditOutcome::failed(b"old".to_vec(), "broken");
        assert!(!outcome.success);
        assert_eq!(outcome.config_data, b"old");
        assert_eq!(outcome.message.as_deref(), Some("broken"));
    }

    #[test]
    fn should_carry_handler_result_without_message() {
        let outcome = EditOutcome::from(AppliedEdit::rejected(b"kept".to_vec()));
        assert!(!outcome.success);
        assert_eq!(outcome.config_data, b"kept");
        assert!(outcome.message.is_none());
    }
}
