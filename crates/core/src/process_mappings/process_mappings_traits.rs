//! Repository and service traits for process mappings.

use async_trait::async_trait;

use crate::errors::Result;
use crate::process_mappings::process_mappings_model::{
    NewProcessMapping, ProcessMapping, ProcessMappingFilter, ProcessMappingUpdate, ResolutionKey,
};

/// The two queries resolution depends on.
#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Active mappings of `tenant_id` for `operation_id` whose product and
    /// channel are either a wildcard or equal to the inputs, best first.
    ///
    /// An empty result is not an error.
    async fn find_best_match(
        &self,
        tenant_id: &str,
        operation_id: &str,
        product_id: Option<&str>,
        channel_type: Option<&str>,
    ) -> Result<Vec<ProcessMapping>>;

    /// The active tenant-agnostic mapping for `operation_id`, if any.
    async fn find_vanilla_mapping(&self, operation_id: &str) -> Result<Option<ProcessMapping>>;
}

/// Trait for process mapping repository operations
#[async_trait]
pub trait ProcessMappingRepositoryTrait: MappingStore {
    fn get_mapping(&self, mapping_id: &str) -> Result<ProcessMapping>;
    fn list_mappings(&self, filter: &ProcessMappingFilter) -> Result<Vec<ProcessMapping>>;
    async fn insert_mapping(&self, new_mapping: NewProcessMapping) -> Result<ProcessMapping>;
    /// Replaces every mutable field, keeps `id` and `created_at`, bumps `version`.
    ///
    /// Returns the row as it was just before the write, then the stored row,
    /// both read in the same transaction.
    async fn update_mapping(
        &self,
        mapping_update: ProcessMappingUpdate,
    ) -> Result<(ProcessMapping, ProcessMapping)>;
    /// Returns the deleted row, or `None` when nothing matched `mapping_id`.
    async fn delete_mapping(&self, mapping_id: String) -> Result<Option<ProcessMapping>>;
}

/// Trait for process mapping service operations
#[async_trait]
pub trait ProcessMappingServiceTrait: Send + Sync {
    /// Picks the single mapping that should handle `key`, going through the cache.
    async fn resolve(&self, key: ResolutionKey) -> Result<Option<ProcessMapping>>;

    /// Drops cached resolutions for one tenant, or all of them when `tenant_id` is `None`.
    fn invalidate_cache(&self, tenant_id: Option<&str>) -> usize;

    async fn cached_resolutions(&self) -> usize;

    fn get_mapping(&self, mapping_id: &str) -> Result<ProcessMapping>;
    fn list_mappings(&self, filter: &ProcessMappingFilter) -> Result<Vec<ProcessMapping>>;
    async fn create_mapping(&self, new_mapping: NewProcessMapping) -> Result<ProcessMapping>;
    async fn update_mapping(&self, mapping_update: ProcessMappingUpdate) -> Result<ProcessMapping>;
    async fn delete_mapping(&self, mapping_id: String) -> Result<usize>;
}
