//! Process mapping domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};

/// Routes one API operation to a backend process, optionally scoped to a
/// tenant, a product and a channel.
///
/// A mapping without a tenant is a vanilla mapping: the tenant-agnostic
/// default used when no tenant-scoped mapping matches.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
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

/// How precisely a mapping is scoped. Later variants win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Specificity {
    Vanilla,
    Tenant,
    TenantChannel,
    TenantProduct,
    TenantProductChannel,
}

impl ProcessMapping {
    pub fn is_vanilla(&self) -> bool {
        self.tenant_id.is_none()
    }

    pub fn specificity(&self) -> Specificity {
        if self.is_vanilla() {
            return Specificity::Vanilla;
        }
        match (self.product_id.is_some(), self.channel_type.is_some()) {
            (true, true) => Specificity::TenantProductChannel,
            (true, false) => Specificity::TenantProduct,
            (false, true) => Specificity::TenantChannel,
            (false, false) => Specificity::Tenant,
        }
    }

    /// Whether this mapping may answer `key`.
    ///
    /// Product and channel must be a wildcard or equal the requested value.
    /// A vanilla mapping only checks the operation.
    pub fn applies_to(&self, key: &ResolutionKey) -> bool {
        if !self.is_active || self.operation_id != key.operation_id {
            return false;
        }
        if self.is_vanilla() {
            return true;
        }
        self.tenant_id == key.tenant_id
            && scope_matches(self.product_id.as_deref(), key.product_id.as_deref())
            && scope_matches(self.channel_type.as_deref(), key.channel_type.as_deref())
    }
}

fn scope_matches(scope: Option<&str>, requested: Option<&str>) -> bool {
    match scope {
        None => true,
        Some(value) => requested == Some(value),
    }
}

/// The four inputs of a resolution. Doubles as the resolution cache key, so
/// an absent field stays distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionKey {
    pub tenant_id: Option<String>,
    pub operation_id: String,
    pub product_id: Option<String>,
    pub channel_type: Option<String>,
}

impl ResolutionKey {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            tenant_id: None,
            operation_id: operation_id.into(),
            product_id: None,
            channel_type: None,
        }
    }

    pub fn for_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_product(mut self, product_id: impl Into<String>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    pub fn with_channel(mut self, channel_type: impl Into<String>) -> Self {
        self.channel_type = Some(channel_type.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.operation_id.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "operationId must not be empty".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Input model for creating a new process mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

fn default_active() -> bool {
    true
}

impl NewProcessMapping {
    pub fn validate(&self) -> Result<()> {
        validate_mapping_fields(
            &self.operation_id,
            &self.process_id,
            self.effective_from,
            self.effective_to,
        )
    }
}

/// Full replacement of a stored mapping.
///
/// `version` must equal the stored version; the repository bumps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMappingUpdate {
    #[serde(default)]
    pub id: String,
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
    pub version: i32,
}

impl ProcessMappingUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::MissingField("id".to_string()).into());
        }
        validate_mapping_fields(
            &self.operation_id,
            &self.process_id,
            self.effective_from,
            self.effective_to,
        )
    }
}

fn validate_mapping_fields(
    operation_id: &str,
    process_id: &str,
    effective_from: Option<NaiveDateTime>,
    effective_to: Option<NaiveDateTime>,
) -> Result<()> {
    if operation_id.trim().is_empty() {
        return Err(ValidationError::MissingField("operationId".to_string()).into());
    }
    if process_id.trim().is_empty() {
        return Err(ValidationError::MissingField("processId".to_string()).into());
    }
    if let (Some(from), Some(to)) = (effective_from, effective_to) {
        if from > to {
            return Err(ValidationError::InvalidInput(
                "effectiveFrom must not be after effectiveTo".to_string(),
            )
            .into());
        }
    }
    Ok(())
}

/// Listing filter for the mapping administration endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMappingFilter {
    pub tenant_id: Option<String>,
    pub operation_id: Option<String>,
    /// `Some(true)` keeps only vanilla mappings, `Some(false)` only tenant-scoped ones.
    pub vanilla: Option<bool>,
}
