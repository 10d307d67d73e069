use super::domain::{
    ConfidenceBands, GuardrailOverrides, GuardrailsConfig, SafetyOverrides, SafetySettings,
    ScoringWeights, ShortlistStrategy, ThresholdOverrides, Thresholds, TenantMode,
};

pub const DEFAULT_HIGH_BAND: f64 = 0.75;
pub const DEFAULT_MEDIUM_BAND: f64 = 0.55;
pub const DEFAULT_MAX_CANDIDATES: usize = 10;

/// Built-in guardrails used for unconfigured tenants and as the lowest precedence layer.
pub fn default_guardrails() -> GuardrailsConfig {
    GuardrailsConfig {
        scoring_weights: ScoringWeights {
            skills: 0.5,
            seniority: 0.2,
            location: 0.1,
            candidate_signals: 0.2,
        },
        thresholds: Thresholds {
            min_match_score: 0.5,
            shortlist_min_score: None,
            shortlist_max_candidates: DEFAULT_MAX_CANDIDATES,
        },
        shortlist_strategy: ShortlistStrategy::Quality,
        confidence_bands: ConfidenceBands {
            high: DEFAULT_HIGH_BAND,
            medium: DEFAULT_MEDIUM_BAND,
        },
        safety: SafetySettings {
            require_must_haves: false,
        },
    }
}

impl TenantMode {
    /// Partial overlay applied above the tenant's stored guardrails.
    pub fn preset(self) -> GuardrailOverrides {
        match self {
            TenantMode::Sandbox => sandbox_preset(),
            TenantMode::Pilot => pilot_preset(),
            TenantMode::Production => production_preset(),
            TenantMode::Maintenance => maintenance_preset(),
            TenantMode::FireDrill => fire_drill_base_preset(),
        }
    }
}

fn sandbox_preset() -> GuardrailOverrides {
    GuardrailOverrides {
        thresholds: ThresholdOverrides {
            shortlist_max_candidates: Some(50),
            ..ThresholdOverrides::default()
        },
        shortlist_strategy: Some(ShortlistStrategy::Broad),
        safety: SafetyOverrides {
            require_must_haves: Some(false),
        },
        ..GuardrailOverrides::default()
    }
}

fn pilot_preset() -> GuardrailOverrides {
    GuardrailOverrides {
        thresholds: ThresholdOverrides {
            shortlist_max_candidates: Some(25),
            ..ThresholdOverrides::default()
        },
        shortlist_strategy: Some(ShortlistStrategy::Quality),
        ..GuardrailOverrides::default()
    }
}

fn production_preset() -> GuardrailOverrides {
    GuardrailOverrides::default()
}

fn maintenance_preset() -> GuardrailOverrides {
    GuardrailOverrides {
        shortlist_strategy: Some(ShortlistStrategy::Strict),
        safety: SafetyOverrides {
            require_must_haves: Some(true),
        },
        ..GuardrailOverrides::default()
    }
}

// Fire drill judges against production rules before tightening them.
fn fire_drill_base_preset() -> GuardrailOverrides {
    production_preset()
}

/// Conservative limits enforced during an incident. Values only ever tighten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireDrillPolicy {
    pub min_match_floor: f64,
    pub shortlist_min_floor: f64,
    pub max_candidates_ceiling: usize,
    pub high_band_floor: f64,
    pub medium_band_floor: f64,
}

impl Default for FireDrillPolicy {
    fn default() -> Self {
        Self {
            min_match_floor: 0.7,
            shortlist_min_floor: 70.0,
            max_candidates_ceiling: 5,
            high_band_floor: 0.85,
            medium_band_floor: 0.65,
        }
    }
}

impl FireDrillPolicy {
    pub fn apply(&self, base: &GuardrailsConfig) -> GuardrailsConfig {
        let mut tightened = base.clone();
        let thresholds = &mut tightened.thresholds;

        let shortlist_floor = base.thresholds.shortlist_floor().max(self.shortlist_min_floor);
        thresholds.min_match_score = base.thresholds.min_match_score.max(self.min_match_floor);
        thresholds.shortlist_min_score = Some(shortlist_floor);
        thresholds.shortlist_max_candidates = base
            .thresholds
            .shortlist_max_candidates
            .min(self.max_candidates_ceiling);

        tightened.confidence_bands = ConfidenceBands {
            high: base.confidence_bands.high.max(self.high_band_floor),
            medium: base.confidence_bands.medium.max(self.medium_band_floor),
        };
        tightened.safety.require_must_haves = true;
        tightened.shortlist_strategy = ShortlistStrategy::Strict;
        tightened
    }
}
