//! Database models for tenants.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use tenant_config_core::tenants::{NewTenant, Tenant};

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::tenants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct TenantDB {
    pub id: String,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TenantDB {
    pub fn from_new(new_tenant: NewTenant, id: String, now: NaiveDateTime) -> Self {
        Self {
            id,
            code: new_tenant.code.trim().to_string(),
            name: new_tenant.name,
            is_active: new_tenant.is_active,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<TenantDB> for Tenant {
    fn from(db: TenantDB) -> Self {
        Self {
            id: db.id,
            code: db.code,
            name: db.name,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
