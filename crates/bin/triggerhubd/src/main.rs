//! # triggerhubd — triggerhub daemon
//!
//! Composition root that registers the trigger catalogue and evaluates the
//! configured rules on a fixed interval.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the `tracing` subscriber and route panic reports through it
//! - Register the built-in trigger types, in catalogue order
//! - Build the dispatcher over the frozen registry
//! - Evaluate every rule each interval on the blocking pool
//! - Stop on Ctrl-C
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no trigger logic belongs here.

mod config;
mod listener;
mod panic_hook;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use triggerhub_adapter_builtin::register_builtin;
use triggerhub_app::dispatcher::TriggerDispatcher;
use triggerhub_app::registry::TriggerTypeRegistry;
use triggerhub_domain::error::RegistrationError;

use crate::config::{Config, ConfigError, RuleConfig};
use crate::listener::HostListener;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to register built-in trigger types")]
    Registration(#[from] RegistrationError),
    #[error("failed to listen for the shutdown signal")]
    Signal(#[source] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();
    std::panic::set_hook(Box::new(panic_hook::route_to_tracing(
        config.dispatch.debug,
    )));

    let mut registry = TriggerTypeRegistry::new();
    for descriptor in register_builtin(&mut registry)? {
        tracing::info!(
            position = %descriptor.position,
            name = %descriptor.name,
            "trigger type registered"
        );
    }

    let listener = Arc::new(HostListener::new(config.entity_states()));
    let dispatcher =
        TriggerDispatcher::new(Arc::new(registry), listener).with_debug(config.dispatch.debug);

    for rule in &config.rules {
        let key = rule.key();
        if dispatcher.is_configured(&key) {
            tracing::info!(
                rule = %rule.name,
                description = %dispatcher.describe(&key),
                "rule loaded"
            );
        } else {
            tracing::warn!(rule = %rule.name, "rule is not fully configured");
        }
    }

    let rules: Arc<[RuleConfig]> = config.rules.into();
    let every = Duration::from_secs(config.dispatch.poll_interval_secs);
    let mut interval = tokio::time::interval(every);
    tracing::info!(
        rules = rules.len(),
        every_secs = every.as_secs(),
        "triggerhubd started"
    );

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.map_err(StartupError::Signal)?;
                tracing::info!("shutdown signal received");
                break;
            }
            _ = interval.tick() => poll(&dispatcher, &rules).await,
        }
    }

    Ok(())
}

/// Evaluate every rule concurrently; handlers may block.
async fn poll(dispatcher: &TriggerDispatcher, rules: &Arc<[RuleConfig]>) {
    let tasks: Vec<_> = (0..rules.len())
        .map(|index| {
            let dispatcher = dispatcher.clone();
            let rules = Arc::clone(rules);
            tokio::task::spawn_blocking(move || {
                let rule = &rules[index];
                (index, dispatcher.evaluate(&rule.key(), false))
            })
        })
        .collect();

    for task in tasks {
        match task.await {
            Ok((index, fired)) => {
                let rule = &rules[index].name;
                if fired {
                    tracing::info!(%rule, "rule fired");
                } else {
                    tracing::debug!(%rule, "rule idle");
                }
            }
            Err(err) => tracing::error!(error = %err, "rule evaluation task failed"),
        }
    }
}
