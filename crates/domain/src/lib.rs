//! # smarthome-domain
//!
//! Pure domain model for the smarthome device-state backend.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **device states** (the on/off value tracked for a device)
//! - Contain all invariant enforcement and domain logic (e.g. toggling)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device_state;
