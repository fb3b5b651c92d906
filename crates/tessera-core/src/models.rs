//! Domain models for Tessera.
//!
//! These are the core types shared across all crates.

pub mod membership;
pub mod tenant;
pub mod user;
