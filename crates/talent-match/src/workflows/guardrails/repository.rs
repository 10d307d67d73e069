use serde::{Deserialize, Serialize};

use super::domain::{TenantId, TenantMode};

/// Raw guardrail document as persisted by the tenant configuration store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantGuardrailsRecord {
    /// Only configured tenants have their stored values merged.
    pub configured: bool,
    pub stored: Option<serde_json::Value>,
}

/// Synchronous read contract for tenant configuration. Caching lives behind it.
pub trait TenantConfigStore: Send + Sync {
    fn load_guardrails(&self, tenant: &TenantId) -> Result<TenantGuardrailsRecord, TenantStoreError>;
    fn load_mode(&self, tenant: &TenantId) -> Result<TenantMode, TenantStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TenantStoreError {
    #[error("tenant {0} not found")]
    NotFound(TenantId),
    #[error("tenant store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only kill-switch capability consulted before any agent runs.
pub trait AgentFlags: Send + Sync {
    fn is_enabled(&self, agent: &str, tenant: &TenantId) -> bool;
}
