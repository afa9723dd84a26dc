//! Tenant Config Core - Domain entities, services, and traits.
//!
//! This crate contains the routing logic of the tenant configuration service:
//! which backend process handles an API operation for a tenant, product and
//! channel. It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod errors;
pub mod process_mappings;
pub mod tenants;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
