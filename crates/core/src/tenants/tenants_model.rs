//! Tenant domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Domain model representing a tenant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: String,
    pub code: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new tenant
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTenant {
    pub code: String,
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Input model for updating a tenant
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TenantUpdate {
    #[serde(default)]
    pub id: String,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_tenant_fields(code: &str, name: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::MissingField("code".to_string()).into());
    }
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name".to_string()).into());
    }
    Ok(())
}

impl NewTenant {
    pub fn validate(&self) -> Result<()> {
        validate_tenant_fields(&self.code, &self.name)
    }
}

impl TenantUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        validate_tenant_fields(&self.code, &self.name)
    }
}
