use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::warn;
use uuid::Uuid;

use tenant_config_core::errors::{DatabaseError, Error, Result};
use tenant_config_core::process_mappings::{
    rank_candidates, MappingStore, NewProcessMapping, ProcessMapping, ProcessMappingFilter,
    ProcessMappingRepositoryTrait, ProcessMappingUpdate,
};

use super::model::{NewProcessMappingDB, ProcessMappingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::process_mappings;
use crate::schema::process_mappings::dsl::*;

pub struct ProcessMappingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ProcessMappingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ProcessMappingRepository { pool, writer }
    }

    /// Active tenant-scoped candidates, unordered.
    fn load_candidates(
        pool: &DbPool,
        tenant: &str,
        operation: &str,
        product: Option<&str>,
        channel: Option<&str>,
    ) -> Result<Vec<ProcessMapping>> {
        let mut conn = get_connection(pool)?;

        let mut query = process_mappings::table
            .filter(tenant_id.eq(tenant))
            .filter(operation_id.eq(operation))
            .filter(is_active.eq(true))
            .into_boxed();

        query = match product {
            Some(requested) => query.filter(product_id.is_null().or(product_id.eq(requested))),
            None => query.filter(product_id.is_null()),
        };
        query = match channel {
            Some(requested) => query.filter(channel_type.is_null().or(channel_type.eq(requested))),
            None => query.filter(channel_type.is_null()),
        };

        let rows = query
            .select(ProcessMappingDB::as_select())
            .load::<ProcessMappingDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(ProcessMapping::from).collect())
    }

    fn load_vanilla(pool: &DbPool, operation: &str) -> Result<Option<ProcessMapping>> {
        let mut conn = get_connection(pool)?;
        let rows = process_mappings::table
            .filter(tenant_id.is_null())
            .filter(operation_id.eq(operation))
            .filter(is_active.eq(true))
            .order((priority.asc(), updated_at.desc()))
            .select(ProcessMappingDB::as_select())
            .load::<ProcessMappingDB>(&mut conn)
            .into_core()?;

        if rows.len() > 1 {
            warn!(
                "{} active vanilla mappings for operation {}; using the highest-precedence one",
                rows.len(),
                operation
            );
        }
        Ok(rows.into_iter().next().map(ProcessMapping::from))
    }
}

/// Runs a pooled read off the async runtime.
async fn read_blocking<T, F>(job: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))?
}

#[async_trait]
impl MappingStore for ProcessMappingRepository {
    async fn find_best_match(
        &self,
        tenant: &str,
        operation: &str,
        product: Option<&str>,
        channel: Option<&str>,
    ) -> Result<Vec<ProcessMapping>> {
        let pool = self.pool.clone();
        let tenant = tenant.to_string();
        let operation = operation.to_string();
        let product = product.map(str::to_string);
        let channel = channel.map(str::to_string);

        read_blocking(move || {
            let mut candidates = Self::load_candidates(
                &pool,
                &tenant,
                &operation,
                product.as_deref(),
                channel.as_deref(),
            )?;
            rank_candidates(&mut candidates);
            Ok(candidates)
        })
        .await
    }

    async fn find_vanilla_mapping(&self, operation: &str) -> Result<Option<ProcessMapping>> {
        let pool = self.pool.clone();
        let operation = operation.to_string();
        read_blocking(move || Self::load_vanilla(&pool, &operation)).await
    }
}

#[async_trait]
impl ProcessMappingRepositoryTrait for ProcessMappingRepository {
    fn get_mapping(&self, mapping_id: &str) -> Result<ProcessMapping> {
        let mut conn = get_connection(&self.pool)?;
        let row = process_mappings
            .find(mapping_id)
            .select(ProcessMappingDB::as_select())
            .first::<ProcessMappingDB>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!(
                    "Process mapping {} not found",
                    mapping_id
                )))
            })?;
        Ok(ProcessMapping::from(row))
    }

    fn list_mappings(&self, filter: &ProcessMappingFilter) -> Result<Vec<ProcessMapping>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = process_mappings::table.into_boxed();

        if let Some(tenant) = filter.tenant_id.as_deref() {
            query = query.filter(tenant_id.eq(tenant.to_string()));
        }
        if let Some(operation) = filter.operation_id.as_deref() {
            query = query.filter(operation_id.eq(operation.to_string()));
        }
        match filter.vanilla {
            Some(true) => query = query.filter(tenant_id.is_null()),
            Some(false) => query = query.filter(tenant_id.is_not_null()),
            None => {}
        }

        let rows = query
            .order((operation_id.asc(), priority.asc(), created_at.asc()))
            .select(ProcessMappingDB::as_select())
            .load::<ProcessMappingDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(ProcessMapping::from).collect())
    }

    async fn insert_mapping(&self, new_mapping: NewProcessMapping) -> Result<ProcessMapping> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ProcessMapping> {
                let now = Utc::now().naive_utc();
                let new_mapping_db =
                    NewProcessMappingDB::from_domain(new_mapping, Uuid::new_v4().to_string(), now);

                let result_db = diesel::insert_into(process_mappings::table)
                    .values(&new_mapping_db)
                    .returning(ProcessMappingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(ProcessMapping::from(result_db))
            })
            .await
    }

    async fn update_mapping(
        &self,
        mapping_update: ProcessMappingUpdate,
    ) -> Result<(ProcessMapping, ProcessMapping)> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<(ProcessMapping, ProcessMapping)> {
                let current = process_mappings
                    .find(&mapping_update.id)
                    .select(ProcessMappingDB::as_select())
                    .first::<ProcessMappingDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| {
                        Error::Database(DatabaseError::NotFound(format!(
                            "Process mapping {} not found",
                            mapping_update.id
                        )))
                    })?;

                if current.version != mapping_update.version {
                    return Err(Error::ConstraintViolation(format!(
                        "Process mapping {} was modified concurrently (expected version {}, found {})",
                        current.id, mapping_update.version, current.version
                    )));
                }

                let replacement = ProcessMappingDB {
                    id: current.id.clone(),
                    tenant_id: mapping_update.tenant_id,
                    product_id: mapping_update.product_id,
                    channel_type: mapping_update.channel_type,
                    operation_id: mapping_update.operation_id,
                    process_id: mapping_update.process_id,
                    process_version: mapping_update.process_version,
                    priority: mapping_update.priority,
                    is_active: mapping_update.is_active,
                    effective_from: mapping_update.effective_from,
                    effective_to: mapping_update.effective_to,
                    version: current.version + 1,
                    created_at: current.created_at,
                    updated_at: Utc::now().naive_utc(),
                };

                diesel::update(process_mappings.find(&replacement.id))
                    .set(&replacement)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok((ProcessMapping::from(current), ProcessMapping::from(replacement)))
            })
            .await
    }

    async fn delete_mapping(&self, mapping_id: String) -> Result<Option<ProcessMapping>> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Option<ProcessMapping>> {
                let deleted = diesel::delete(process_mappings.find(mapping_id))
                    .returning(ProcessMappingDB::as_returning())
                    .get_result::<ProcessMappingDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                Ok(deleted.map(ProcessMapping::from))
            })
            .await
    }
}
