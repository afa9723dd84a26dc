use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use tenant_config_core::errors::{DatabaseError, Error, Result};
use tenant_config_core::tenants::{NewTenant, Tenant, TenantRepositoryTrait, TenantUpdate};

use super::model::TenantDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::tenants;
use crate::schema::tenants::dsl::*;

pub struct TenantRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TenantRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TenantRepository { pool, writer }
    }
}

fn tenant_not_found(tenant_id: &str) -> Error {
    Error::Database(DatabaseError::NotFound(format!(
        "Tenant {} not found",
        tenant_id
    )))
}

#[async_trait]
impl TenantRepositoryTrait for TenantRepository {
    fn load_tenants(&self) -> Result<Vec<Tenant>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = tenants
            .order(code.asc())
            .select(TenantDB::as_select())
            .load::<TenantDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Tenant::from).collect())
    }

    fn get_tenant(&self, tenant_id: &str) -> Result<Tenant> {
        let mut conn = get_connection(&self.pool)?;
        tenants
            .find(tenant_id)
            .select(TenantDB::as_select())
            .first::<TenantDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Tenant::from)
            .ok_or_else(|| tenant_not_found(tenant_id))
    }

    async fn insert_new_tenant(&self, new_tenant: NewTenant) -> Result<Tenant> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Tenant> {
                let tenant_db = TenantDB::from_new(
                    new_tenant,
                    Uuid::new_v4().to_string(),
                    Utc::now().naive_utc(),
                );
                let inserted = diesel::insert_into(tenants::table)
                    .values(&tenant_db)
                    .returning(TenantDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Tenant::from(inserted))
            })
            .await
    }

    async fn update_tenant(&self, tenant_update: TenantUpdate) -> Result<Tenant> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Tenant> {
                let existing = tenants
                    .find(&tenant_update.id)
                    .select(TenantDB::as_select())
                    .first::<TenantDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| tenant_not_found(&tenant_update.id))?;

                let tenant_db = TenantDB {
                    id: existing.id,
                    code: tenant_update.code.trim().to_string(),
                    name: tenant_update.name,
                    is_active: tenant_update.is_active,
                    created_at: existing.created_at,
                    updated_at: Utc::now().naive_utc(),
                };

                diesel::update(tenants.find(&tenant_db.id))
                    .set(&tenant_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(Tenant::from(tenant_db))
            })
            .await
    }

    async fn delete_tenant(&self, tenant_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(tenants.find(tenant_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
