//! Tessera Core — domain models, repository contracts, and the shared
//! error taxonomy for the multi-tenant identity core.

pub mod error;
pub mod models;
pub mod repository;
