//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `triggerhub.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values.

use std::collections::HashMap;

use serde::Deserialize;

use triggerhub_domain::descriptor::{InstanceIdentity, TriggerInstanceKey};
use triggerhub_domain::id::{EntityRef, OwnerRef, SubVariantPosition, TriggerUid, TypePosition};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Dispatcher settings.
    pub dispatch: DispatchConfig,
    /// Known entities and their current state.
    pub entities: Vec<EntityConfig>,
    /// Persisted trigger instances to evaluate.
    pub rules: Vec<RuleConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Report absorbed failures and let handlers log their decisions.
    pub debug: bool,
    /// Seconds between two evaluations of every rule.
    pub poll_interval_secs: u64,
}

/// A host entity with a fixed state.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityConfig {
    pub id: EntityRef,
    pub state: String,
}

/// A rule as the host would persist it.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub type_position: TypePosition,
    #[serde(default)]
    pub sub_type_position: SubVariantPosition,
    #[serde(default)]
    pub uid: TriggerUid,
    #[serde(default)]
    pub owner_ref: OwnerRef,
    /// Saved configuration blob, empty when unconfigured.
    #[serde(default)]
    pub config: String,
}

impl RuleConfig {
    /// The persisted key the dispatcher resolves this rule from.
    #[must_use]
    pub fn key(&self) -> TriggerInstanceKey {
        TriggerInstanceKey::new(
            self.type_position,
            InstanceIdentity::new(self.uid, self.owner_ref),
        )
        .with_sub_type(self.sub_type_position)
        .with_config(self.config.as_bytes())
    }
}

impl Config {
    /// Load configuration from `triggerhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("triggerhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("TRIGGERHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("TRIGGERHUB_DEBUG") {
            self.dispatch.debug = matches!(val.trim(), "1" | "true");
        }
        if let Some(val) = lookup("TRIGGERHUB_POLL_SECS")
            && let Ok(secs) = val.parse()
        {
            self.dispatch.poll_interval_secs = secs;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll_interval_secs must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Entity states keyed by reference. Later entries win.
    #[must_use]
    pub fn entity_states(&self) -> HashMap<EntityRef, String> {
        self.entities
            .iter()
            .map(|entity| (entity.id, entity.state.clone()))
            .collect()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "triggerhubd=info,triggerhub=info".to_string(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            debug: false,
            poll_interval_secs: 60,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
