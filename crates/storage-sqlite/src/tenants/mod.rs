//! SQLite storage implementation for tenants.

mod model;
mod repository;

pub use model::TenantDB;
pub use repository::TenantRepository;
