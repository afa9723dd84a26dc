//! SQLite storage implementation for the tenant configuration service.
//!
//! This crate is the only place where Diesel dependencies exist. It implements
//! the repository traits defined in `tenant-config-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for tenants and process mappings
//! - Database-specific model types (with Diesel derives)
//!
//! ```text
//!   core (domain, resolution, cache)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod process_mappings;
pub mod tenants;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle, DEFAULT_POOL_SIZE,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use process_mappings::ProcessMappingRepository;
pub use tenants::TenantRepository;

// Re-export from tenant-config-core for convenience
pub use tenant_config_core::errors::{DatabaseError, Error, Result};
