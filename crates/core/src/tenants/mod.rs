//! Tenants module - domain models, services, and traits.

mod tenants_model;
mod tenants_service;
mod tenants_traits;

pub use tenants_model::{NewTenant, Tenant, TenantUpdate};
pub use tenants_service::TenantService;
pub use tenants_traits::{TenantRepositoryTrait, TenantServiceTrait};
