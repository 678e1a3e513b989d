//! Shared helpers for gatekeeper tests: one-time logging setup and unique
//! fixture identifiers.

pub mod logging;
pub mod unique;

pub use unique::{unique_email, unique_sub};
