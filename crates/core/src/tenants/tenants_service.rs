use crate::errors::Result;
use crate::process_mappings::ResolutionCache;
use crate::tenants::tenants_model::{NewTenant, Tenant, TenantUpdate};
use crate::tenants::tenants_traits::{TenantRepositoryTrait, TenantServiceTrait};
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

pub struct TenantService<T: TenantRepositoryTrait> {
    tenant_repo: Arc<T>,
    resolution_cache: Arc<ResolutionCache>,
}

impl<T: TenantRepositoryTrait> TenantService<T> {
    pub fn new(tenant_repo: Arc<T>, resolution_cache: Arc<ResolutionCache>) -> Self {
        TenantService {
            tenant_repo,
            resolution_cache,
        }
    }
}

#[async_trait]
impl<T: TenantRepositoryTrait + Send + Sync> TenantServiceTrait for TenantService<T> {
    fn get_tenants(&self) -> Result<Vec<Tenant>> {
        self.tenant_repo.load_tenants()
    }

    fn get_tenant(&self, tenant_id: &str) -> Result<Tenant> {
        self.tenant_repo.get_tenant(tenant_id)
    }

    async fn create_tenant(&self, new_tenant: NewTenant) -> Result<Tenant> {
        new_tenant.validate()?;
        let tenant = self.tenant_repo.insert_new_tenant(new_tenant).await?;
        info!("Created tenant {} ({})", tenant.code, tenant.id);
        Ok(tenant)
    }

    async fn update_tenant(&self, tenant_update: TenantUpdate) -> Result<Tenant> {
        tenant_update.validate()?;
        self.tenant_repo.update_tenant(tenant_update).await
    }

    async fn delete_tenant(&self, tenant_id: String) -> Result<usize> {
        let deleted = self.tenant_repo.delete_tenant(tenant_id.clone()).await?;
        if deleted > 0 {
            self.resolution_cache.invalidate(Some(&tenant_id));
            info!("Deleted tenant {} and its process mappings", tenant_id);
        }
        Ok(deleted)
    }
}
