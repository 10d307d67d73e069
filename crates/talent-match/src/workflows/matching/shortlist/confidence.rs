use tracing::warn;

use super::super::domain::ConfidenceBand;
use crate::workflows::guardrails::{ConfidenceBands, DEFAULT_HIGH_BAND, DEFAULT_MEDIUM_BAND};

/// Classify a 0-100 match score against the fractional band cutoffs.
pub fn classify_match_score(score: u8, bands: &ConfidenceBands) -> ConfidenceBand {
    classify_confidence(f64::from(score) / 100.0, bands)
}

/// Classify a fractional score (0.0-1.0) against the band cutoffs.
///
/// Misordered cutoffs fall back to the system defaults; NaN scores are Low.
pub fn classify_confidence(score: f64, bands: &ConfidenceBands) -> ConfidenceBand {
    let bands = if bands.is_ordered() {
        *bands
    } else {
        warn!(
            high = bands.high,
            medium = bands.medium,
            "confidence bands misordered; using defaults"
        );
        ConfidenceBands {
            high: DEFAULT_HIGH_BAND,
            medium: DEFAULT_MEDIUM_BAND,
        }
    };

    if score.is_nan() {
        return ConfidenceBand::Low;
    }
    if score >= bands.high {
        ConfidenceBand::High
    } else if score >= bands.medium {
        ConfidenceBand::Medium
    } else {
        ConfidenceBand::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands(high: f64, medium: f64) -> ConfidenceBands {
        ConfidenceBands { high, medium }
    }

    #[test]
    fn just_below_high_is_medium() {
        assert_eq!(
            classify_confidence(0.74, &bands(0.75, 0.55)),
            ConfidenceBand::Medium
        );
    }

    #[test]
    fn match_scores_are_scaled_to_fractions() {
        let cutoffs = bands(0.75, 0.55);
        assert_eq!(classify_match_score(75, &cutoffs), ConfidenceBand::High);
        assert_eq!(classify_match_score(55, &cutoffs), ConfidenceBand::Medium);
        assert_eq!(classify_match_score(54, &cutoffs), ConfidenceBand::Low);
    }

    #[test]
    fn low_match_scores_are_never_read_as_fractions() {
        let cutoffs = bands(0.75, 0.55);
        assert_eq!(classify_match_score(0, &cutoffs), ConfidenceBand::Low);
        assert_eq!(classify_match_score(1, &cutoffs), ConfidenceBand::Low);
        assert_eq!(classify_match_score(2, &cutoffs), ConfidenceBand::Low);
        assert_eq!(classify_match_score(100, &cutoffs), ConfidenceBand::High);
    }

    #[test]
    fn misordered_bands_use_defaults() {
        let inverted = bands(0.4, 0.9);
        assert_eq!(classify_confidence(0.8, &inverted), ConfidenceBand::High);
        assert_eq!(classify_confidence(0.6, &inverted), ConfidenceBand::Medium);
        assert_eq!(classify_confidence(0.2, &inverted), ConfidenceBand::Low);
    }

    #[test]
    fn every_input_maps_to_a_band() {
        let cutoffs = bands(0.75, 0.55);
        assert_eq!(classify_confidence(f64::NAN, &cutoffs), ConfidenceBand::Low);
        assert_eq!(classify_confidence(-3.0, &cutoffs), ConfidenceBand::Low);
        assert_eq!(classify_confidence(f64::INFINITY, &cutoffs), ConfidenceBand::High);
    }
}
