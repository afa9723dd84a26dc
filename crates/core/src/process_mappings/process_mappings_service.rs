use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::mapping_resolver::MappingResolver;
use super::process_mappings_model::{
    NewProcessMapping, ProcessMapping, ProcessMappingFilter, ProcessMappingUpdate, ResolutionKey,
};
use super::process_mappings_traits::{ProcessMappingRepositoryTrait, ProcessMappingServiceTrait};
use super::resolution_cache::ResolutionCache;
use crate::errors::{DatabaseError, Result};

pub struct ProcessMappingService {
    repository: Arc<dyn ProcessMappingRepositoryTrait>,
    resolver: MappingResolver<dyn ProcessMappingRepositoryTrait>,
    cache: Arc<ResolutionCache>,
}

impl ProcessMappingService {
    pub fn new(
        repository: Arc<dyn ProcessMappingRepositoryTrait>,
        cache: Arc<ResolutionCache>,
    ) -> Self {
        ProcessMappingService {
            resolver: MappingResolver::new(repository.clone()),
            repository,
            cache,
        }
    }
}

#[async_trait]
impl ProcessMappingServiceTrait for ProcessMappingService {
    async fn resolve(&self, key: ResolutionKey) -> Result<Option<ProcessMapping>> {
        key.validate()?;
        let resolver = &self.resolver;
        let lookup_key = key.clone();
        self.cache
            .get_or_resolve(key, || async move { resolver.resolve(&lookup_key).await })
            .await
    }

    fn invalidate_cache(&self, tenant_id: Option<&str>) -> usize {
        let removed = self.cache.invalidate(tenant_id);
        info!(
            "Resolution cache invalidated for {}: {} entries removed",
            tenant_id.unwrap_or("all tenants"),
            removed
        );
        removed
    }

    async fn cached_resolutions(&self) -> usize {
        self.cache.len().await
    }

    fn get_mapping(&self, mapping_id: &str) -> Result<ProcessMapping> {
        self.repository.get_mapping(mapping_id)
    }

    fn list_mappings(&self, filter: &ProcessMappingFilter) -> Result<Vec<ProcessMapping>> {
        self.repository.list_mappings(filter)
    }

    async fn create_mapping(&self, new_mapping: NewProcessMapping) -> Result<ProcessMapping> {
        new_mapping.validate()?;
        let created = self.repository.insert_mapping(new_mapping).await?;
        debug!(
            "Created process mapping {} ({} -> {})",
            created.id, created.operation_id, created.process_id
        );
        // A vanilla mapping (no tenant) can answer any tenant: clear everything.
        self.cache.invalidate(created.tenant_id.as_deref());
        Ok(created)
    }

    async fn update_mapping(&self, mapping_update: ProcessMappingUpdate) -> Result<ProcessMapping> {
        mapping_update.validate()?;
        let (previous, updated) = self.repository.update_mapping(mapping_update).await?;
        debug!(
            "Updated process mapping {} to version {}",
            updated.id, updated.version
        );
        match (previous.tenant_id.as_deref(), updated.tenant_id.as_deref()) {
            (Some(before), Some(after)) => {
                self.cache.invalidate(Some(before));
                if before != after {
                    self.cache.invalidate(Some(after));
                }
            }
            _ => {
                self.cache.invalidate(None);
            }
        }
        Ok(updated)
    }

    async fn delete_mapping(&self, mapping_id: String) -> Result<usize> {
        let deleted = self
            .repository
            .delete_mapping(mapping_id.clone())
            .await?
            .ok_or(DatabaseError::NotFound(mapping_id))?;
        debug!("Deleted process mapping {}", deleted.id);
        self.cache.invalidate(deleted.tenant_id.as_deref());
        Ok(1)
    }
}
