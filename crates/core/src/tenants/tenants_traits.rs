use crate::errors::Result;
use crate::tenants::tenants_model::{NewTenant, Tenant, TenantUpdate};
use async_trait::async_trait;

/// Trait for tenant repository operations
#[async_trait]
pub trait TenantRepositoryTrait: Send + Sync {
    fn load_tenants(&self) -> Result<Vec<Tenant>>;
    fn get_tenant(&self, tenant_id: &str) -> Result<Tenant>;
    async fn insert_new_tenant(&self, new_tenant: NewTenant) -> Result<Tenant>;
    async fn update_tenant(&self, tenant_update: TenantUpdate) -> Result<Tenant>;
    /// Hard delete. Tenant-scoped process mappings go with it.
    async fn delete_tenant(&self, tenant_id: String) -> Result<usize>;
}

/// Trait for tenant service operations
#[async_trait]
pub trait TenantServiceTrait: Send + Sync {
    fn get_tenants(&self) -> Result<Vec<Tenant>>;
    fn get_tenant(&self, tenant_id: &str) -> Result<Tenant>;
    async fn create_tenant(&self, new_tenant: NewTenant) -> Result<Tenant>;
    async fn update_tenant(&self, tenant_update: TenantUpdate) -> Result<Tenant>;
    async fn delete_tenant(&self, tenant_id: String) -> Result<usize>;
}
