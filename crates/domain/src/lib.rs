//! # triggerhub-domain
//!
//! Pure domain model for the triggerhub trigger-type catalogue.
//!
//! ## Responsibilities
//! - Foundational types: catalogue positions, host identities, error conventions, timestamps
//! - Define **descriptors** (what the catalogue exposes about each trigger type)
//! - Define **instance keys** (the persisted reference a host hands back to rebuild a trigger)
//! - Define **markup** and **edit** values exchanged with the host's UI
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod descriptor;
pub mod edit;
pub mod markup;
