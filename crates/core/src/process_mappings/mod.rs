//! Process mappings module - routing models, resolution, caching and service.

mod mapping_resolver;
mod process_mappings_model;
mod process_mappings_service;
mod process_mappings_traits;
mod resolution_cache;

pub use mapping_resolver::{compare_candidates, rank_candidates, MappingResolver};
pub use process_mappings_model::{
    NewProcessMapping, ProcessMapping, ProcessMappingFilter, ProcessMappingUpdate, ResolutionKey,
    Specificity,
};
pub use process_mappings_service::ProcessMappingService;
pub use process_mappings_traits::{
    MappingStore, ProcessMappingRepositoryTrait, ProcessMappingServiceTrait,
};
pub use resolution_cache::{ResolutionCache, DEFAULT_CACHE_CAPACITY};
