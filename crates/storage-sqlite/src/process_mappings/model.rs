//! Database models for process mappings.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use tenant_config_core::process_mappings::{NewProcessMapping, ProcessMapping};

/// Database model for process mappings
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::process_mappings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMappingDB {
    pub id: String,
    pub tenant_id: Option<String>,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
    pub operation_id: String,
    pub process_id: String,
    pub process_version: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    pub effective_from: Option<NaiveDateTime>,
    pub effective_to: Option<NaiveDateTime>,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for creating a new process mapping
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::process_mappings)]
#[serde(rename_all = "camelCase")]
pub struct NewProcessMappingDB {
    pub id: String,
    pub tenant_id: Option<String>,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
    pub operation_id: String,
    pub process_id: String,
    pub process_version: Option<String>,
    pub priority: i32,
    pub is_active: bool,
    pub effective_from: Option<NaiveDateTime>,
    pub effective_to: Option<NaiveDateTime>,
    pub version: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewProcessMappingDB {
    pub fn from_domain(domain: NewProcessMapping, id: String, now: NaiveDateTime) -> Self {
        Self {
            id,
            tenant_id: domain.tenant_id,
            product_id: domain.product_id,
            channel_type: domain.channel_type,
            operation_id: domain.operation_id,
            process_id: domain.process_id,
            process_version: domain.process_version,
            priority: domain.priority,
            is_active: domain.is_active,
            effective_from: domain.effective_from,
            effective_to: domain.effective_to,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

// Conversion to domain models
impl From<ProcessMappingDB> for ProcessMapping {
    fn from(db: ProcessMappingDB) -> Self {
        Self {
            id: db.id,
            tenant_id: db.tenant_id,
            product_id: db.product_id,
            channel_type: db.channel_type,
            operation_id: db.operation_id,
            process_id: db.process_id,
            process_version: db.process_version,
            priority: db.priority,
            is_active: db.is_active,
            effective_from: db.effective_from,
            effective_to: db.effective_to,
            version: db.version,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
