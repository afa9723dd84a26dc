//! Wire models for the HTTP API. They mirror the core models and carry the
//! OpenAPI schema derives so the core crate stays free of web dependencies.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tenant_config_core::{process_mappings as core_mappings, tenants as core_tenants};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMapping {
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

impl From<core_mappings::ProcessMapping> for ProcessMapping {
    fn from(m: core_mappings::ProcessMapping) -> Self {
        Self {
            id: m.id,
            tenant_id: m.tenant_id,
            product_id: m.product_id,
            channel_type: m.channel_type,
            operation_id: m.operation_id,
            process_id: m.process_id,
            process_version: m.process_version,
            priority: m.priority,
            is_active: m.is_active,
            effective_from: m.effective_from,
            effective_to: m.effective_to,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewProcessMapping {
    pub tenant_id: Option<String>,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
    pub operation_id: String,
    pub process_id: String,
    pub process_version: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub effective_from: Option<NaiveDateTime>,
    pub effective_to: Option<NaiveDateTime>,
}

impl From<NewProcessMapping> for core_mappings::NewProcessMapping {
    fn from(m: NewProcessMapping) -> Self {
        Self {
            tenant_id: m.tenant_id,
            product_id: m.product_id,
            channel_type: m.channel_type,
            operation_id: m.operation_id,
            process_id: m.process_id,
            process_version: m.process_version,
            priority: m.priority,
            is_active: m.is_active,
            effective_from: m.effective_from,
            effective_to: m.effective_to,
        }
    }
}

/// Full replacement body. The id comes from the path.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMappingUpdate {
    pub tenant_id: Option<String>,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
    pub operation_id: String,
    pub process_id: String,
    pub process_version: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub effective_from: Option<NaiveDateTime>,
    pub effective_to: Option<NaiveDateTime>,
    /// Version the client last read; a mismatch is rejected with 409.
    pub version: i32,
}

impl ProcessMappingUpdate {
    pub fn into_core(self, id: String) -> core_mappings::ProcessMappingUpdate {
        core_mappings::ProcessMappingUpdate {
            id,
            tenant_id: self.tenant_id,
            product_id: self.product_id,
            channel_type: self.channel_type,
            operation_id: self.operation_id,
            process_id: self.process_id,
            process_version: self.process_version,
            priority: self.priority,
            is_active: self.is_active,
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            version: self.version,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<core_tenants::Tenant> for Tenant {
    fn from(t: core_tenants::Tenant) -> Self {
        Self {
            id: t.id,
            code: t.code,
            name: t.name,
            is_active: t.is_active,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub code: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl From<NewTenant> for core_tenants::NewTenant {
    fn from(t: NewTenant) -> Self {
        Self {
            code: t.code,
            name: t.name,
            is_active: t.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdate {
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

impl TenantUpdate {
    pub fn into_core(self, id: String) -> core_tenants::TenantUpdate {
        core_tenants::TenantUpdate {
            id,
            code: self.code,
            name: self.name,
            is_active: self.is_active,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, Copy)]
pub struct CacheStats {
    pub entries: usize,
}

fn default_active() -> bool {
    true
}
