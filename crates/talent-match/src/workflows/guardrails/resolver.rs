use std::sync::Arc;

use tracing::{info, warn};

use crate::config::KillSwitchConfig;

use super::domain::{
    ConfidenceBands, GuardrailsConfig, ResolvedGuardrails, StoredGuardrails, TenantId, TenantMode,
};
use super::presets::{
    default_guardrails, FireDrillPolicy, DEFAULT_HIGH_BAND, DEFAULT_MAX_CANDIDATES,
    DEFAULT_MEDIUM_BAND,
};
use super::repository::{TenantConfigStore, TenantStoreError};
use super::stored::parse_stored_guardrails;

/// Resolves the effective guardrails for a tenant. Call once per evaluation batch.
pub struct GuardrailsResolver<T> {
    store: Arc<T>,
    kill_switches: KillSwitchConfig,
    fire_drill: FireDrillPolicy,
}

impl<T> GuardrailsResolver<T>
where
    T: TenantConfigStore + 'static,
{
    pub fn new(store: Arc<T>, kill_switches: KillSwitchConfig) -> Self {
        Self {
            store,
            kill_switches,
            fire_drill: FireDrillPolicy::default(),
        }
    }

    pub fn with_fire_drill_policy(mut self, policy: FireDrillPolicy) -> Self {
        self.fire_drill = policy;
        self
    }

    pub fn kill_switches(&self) -> &KillSwitchConfig {
        &self.kill_switches
    }

    pub fn resolve(&self, tenant_id: &TenantId) -> Result<ResolvedGuardrails, GuardrailsError> {
        let mode = self.store.load_mode(tenant_id).map_err(GuardrailsError::from)?;
        let record = self
            .store
            .load_guardrails(tenant_id)
            .map_err(GuardrailsError::from)?;

        let stored = parse_stored_guardrails(record.configured, record.stored.as_ref());
        let resolved = merge_guardrails(
            tenant_id,
            &stored,
            mode,
            self.kill_switches.force_fire_drill,
            &self.fire_drill,
        );

        info!(
            tenant = %tenant_id,
            mode = mode.label(),
            strategy = resolved.config.shortlist_strategy.label(),
            fire_drill = resolved.fire_drill_applied,
            "guardrails resolved"
        );

        Ok(resolved)
    }
}

/// Merge the precedence layers: defaults, configured tenant values, the mode
/// preset, then the fire-drill override.
pub fn merge_guardrails(
    tenant_id: &TenantId,
    stored: &StoredGuardrails,
    mode: TenantMode,
    force_fire_drill: bool,
    policy: &FireDrillPolicy,
) -> ResolvedGuardrails {
    let mut notes = Vec::new();
    let mut config = default_guardrails();

    if stored.configured {
        for dropped in &stored.dropped_fields {
            warn!(tenant = %tenant_id, detail = %dropped, "tenant guardrail field ignored");
            notes.push(dropped.clone());
        }
        stored.overrides.apply_to(&mut config);
    } else {
        notes.push("tenant guardrails not configured; using system defaults".to_string());
    }

    mode.preset().apply_to(&mut config);
    sanitize(&mut config, &mut notes);

    let fire_drill_applied = mode == TenantMode::FireDrill || force_fire_drill;
    if fire_drill_applied {
        config = policy.apply(&config);
        if mode == TenantMode::FireDrill {
            notes.push("fire drill override applied; strategy forced to strict".to_string());
        } else {
            notes.push(
                "environment kill switch forced fire drill guardrails; strategy forced to strict"
                    .to_string(),
            );
        }
    }

    ResolvedGuardrails {
        tenant_id: tenant_id.clone(),
        mode,
        config,
        fire_drill_applied,
        notes,
    }
}

fn sanitize(config: &mut GuardrailsConfig, notes: &mut Vec<String>) {
    let weights = &mut config.scoring_weights;
    for (name, weight) in [
        ("skills", &mut weights.skills),
        ("seniority", &mut weights.seniority),
        ("location", &mut weights.location),
        ("candidateSignals", &mut weights.candidate_signals),
    ] {
        if !weight.is_finite() || *weight < 0.0 {
            record_anomaly(
                notes,
                format!("scoringWeights.{name} was {weight}; clamped to 0"),
            );
            *weight = 0.0;
        }
    }

    let thresholds = &mut config.thresholds;
    let min_match = thresholds.min_match_score.clamp(0.0, 1.0);
    if min_match != thresholds.min_match_score {
        record_anomaly(
            notes,
            format!(
                "thresholds.minMatchScore {} outside 0..1; clamped to {min_match}",
                thresholds.min_match_score
            ),
        );
        thresholds.min_match_score = min_match;
    }

    if let Some(floor) = thresholds.shortlist_min_score {
        let clamped = floor.clamp(0.0, 100.0);
        if clamped != floor {
            record_anomaly(
                notes,
                format!("thresholds.shortlistMinScore {floor} outside 0..100; clamped to {clamped}"),
            );
            thresholds.shortlist_min_score = Some(clamped);
        }
    }

    if thresholds.shortlist_max_candidates == 0 {
        record_anomaly(
            notes,
            format!("thresholds.shortlistMaxCandidates was 0; using default {DEFAULT_MAX_CANDIDATES}"),
        );
        thresholds.shortlist_max_candidates = DEFAULT_MAX_CANDIDATES;
    }

    let bands = &mut config.confidence_bands;
    bands.high = bands.high.clamp(0.0, 1.0);
    bands.medium = bands.medium.clamp(0.0, 1.0);
    if !bands.is_ordered() {
        record_anomaly(
            notes,
            format!(
                "confidenceBands high {} must exceed medium {}; using defaults {DEFAULT_HIGH_BAND}/{DEFAULT_MEDIUM_BAND}",
                bands.high, bands.medium
            ),
        );
        *bands = ConfidenceBands {
            high: DEFAULT_HIGH_BAND,
            medium: DEFAULT_MEDIUM_BAND,
        };
    }
}

fn record_anomaly(notes: &mut Vec<String>, detail: String) {
    warn!(detail = %detail, "guardrail invariant sanitized");
    notes.push(detail);
}

/// Error raised while resolving guardrails. Only infrastructure failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum GuardrailsError {
    #[error("tenant not found: {0}")]
    TenantNotFound(TenantId),
    #[error(transparent)]
    Store(TenantStoreError),
}

impl From<TenantStoreError> for GuardrailsError {
    fn from(value: TenantStoreError) -> Self {
        match value {
            TenantStoreError::NotFound(tenant) => GuardrailsError::TenantNotFound(tenant),
            other => GuardrailsError::Store(other),
        }
    }
}
