//! Tenant guardrail resolution: defaults, stored tenant values, mode presets, and
//! the fire-drill override merged into one immutable configuration.

pub mod domain;
mod presets;
pub mod repository;
mod resolver;
mod stored;


pub use domain::{
    BandOverrides, ConfidenceBands, GuardrailOverrides, GuardrailsConfig, ResolvedGuardrails,
    SafetyOverrides, SafetySettings, ScoringWeights, ShortlistStrategy, StoredGuardrails,
    TenantId, TenantMode, ThresholdOverrides, Thresholds, WeightOverrides,
};
pub use presets::{
    default_guardrails, FireDrillPolicy, DEFAULT_HIGH_BAND, DEFAULT_MAX_CANDIDATES,
    DEFAULT_MEDIUM_BAND,
};
pub use repository::{AgentFlags, TenantConfigStore, TenantGuardrailsRecord, TenantStoreError};
pub use resolver::{merge_guardrails, GuardrailsError, GuardrailsResolver};
pub use stored::parse_stored_guardrails;
