//! Picks the single process mapping that handles a request.
//!
//! Tenant-scoped candidates are tried first, most specific wins:
//!
//! ```text
//! tenant + product + channel
//! tenant + product
//! tenant + channel
//! tenant only
//! vanilla (no tenant)
//! ```
//!
//! Within one specificity level the lower `priority` wins, then the most
//! recently updated mapping.

use std::cmp::Ordering;
use std::sync::Arc;

use log::debug;

use super::process_mappings_model::{ProcessMapping, ResolutionKey};
use super::process_mappings_traits::MappingStore;
use crate::errors::{Error, Result};

/// Orders two candidates best-first.
pub fn compare_candidates(a: &ProcessMapping, b: &ProcessMapping) -> Ordering {
    b.specificity()
        .cmp(&a.specificity())
        .then_with(|| a.priority.cmp(&b.priority))
        .then_with(|| b.updated_at.cmp(&a.updated_at))
}

/// Sorts candidates best-first. Stores that cannot order by specificity in
/// their query language call this on the raw candidate set.
pub fn rank_candidates(candidates: &mut [ProcessMapping]) {
    candidates.sort_by(compare_candidates);
}

pub struct MappingResolver<S: MappingStore + ?Sized> {
    store: Arc<S>,
}

impl<S: MappingStore + ?Sized> MappingResolver<S> {
    pub fn new(store: Arc<S>) -> Self {
        MappingResolver { store }
    }

    pub async fn resolve(&self, key: &ResolutionKey) -> Result<Option<ProcessMapping>> {
        key.validate()?;

        if let Some(tenant_id) = key.tenant_id.as_deref() {
            let candidates = self
                .store
                .find_best_match(
                    tenant_id,
                    &key.operation_id,
                    key.product_id.as_deref(),
                    key.channel_type.as_deref(),
                )
                .await
                .map_err(Error::into_lookup_failure)?;

            if let Some(best) = candidates
                .into_iter()
                .find(|candidate| !candidate.is_vanilla() && candidate.applies_to(key))
            {
                debug!(
                    "Resolved {} for tenant {} to tenant mapping {} ({:?}) -> {}",
                    key.operation_id,
                    tenant_id,
                    best.id,
                    best.specificity(),
                    best.process_id
                );
                return Ok(Some(best));
            }
        }

        let vanilla = self
            .store
            .find_vanilla_mapping(&key.operation_id)
            .await
            .map_err(Error::into_lookup_failure)?
            .filter(|mapping| mapping.is_vanilla() && mapping.applies_to(key));

        match &vanilla {
            Some(mapping) => debug!(
                "Resolved {} for tenant {:?} to vanilla mapping {} -> {}",
                key.operation_id, key.tenant_id, mapping.id, mapping.process_id
            ),
            None => debug!(
                "No process mapping for {} (tenant {:?}, product {:?}, channel {:?})",
                key.operation_id, key.tenant_id, key.product_id, key.channel_type
            ),
        }

        Ok(vanilla)
    }
}
