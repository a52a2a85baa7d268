//! Markup — an opaque UI fragment handed back to the host.
//!
//! The catalogue never parses markup. Handlers produce it; the host's UI
//! layer embeds it.

use serde::{Deserialize, Serialize};

/// A rendered UI fragment or prose description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Markup {
    fn from(content: String) -> Self {
        Self(content)
    }
}

impl From<&str> for Markup {
    fn from(content: &str) -> Self {
        Self(content.to_string())
    }
}

impl std::fmt::Display for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
