use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{CandidateSkill, SkillRequirement};
use super::round_score;

/// Matched/total counts feeding the explanation summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub required_matched: usize,
    pub required_total: usize,
    pub preferred_matched: usize,
    pub preferred_total: usize,
}

impl SkillSummary {
    pub fn missing_required(&self) -> bool {
        self.required_matched < self.required_total
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillOverlap {
    pub score: u8,
    pub reasons: Vec<String>,
    pub risk_areas: Vec<String>,
    pub summary: SkillSummary,
}

/// Weighted overlap between a job's skills and a candidate's, 0-100.
///
/// Requirements are visited by normalized name so reasons come out in the same
/// order regardless of how the caller listed them.
pub fn score_skill_overlap(
    requirements: &[SkillRequirement],
    candidate_skills: &[CandidateSkill],
) -> SkillOverlap {
    let held: HashSet<&str> = candidate_skills
        .iter()
        .map(|skill| skill.normalized_name.as_str())
        .collect();

    let mut ordered: Vec<&SkillRequirement> = requirements.iter().collect();
    ordered.sort_by(|a, b| {
        a.normalized_name
            .cmp(&b.normalized_name)
            .then_with(|| b.required.cmp(&a.required))
    });

    let mut total_weight = 0.0;
    let mut matched_weight = 0.0;
    let mut reasons = Vec::new();
    let mut risk_areas = Vec::new();
    let mut summary = SkillSummary::default();

    for requirement in ordered {
        if requirement.weight <= 0.0 || !requirement.weight.is_finite() {
            continue;
        }
        total_weight += requirement.weight;

        let matched = held.contains(requirement.normalized_name.as_str());
        if requirement.required {
            summary.required_total += 1;
        } else {
            summary.preferred_total += 1;
        }

        if matched {
            matched_weight += requirement.weight;
            if requirement.required {
                summary.required_matched += 1;
            } else {
                summary.preferred_matched += 1;
            }
            reasons.push(format!("Matched skill: {}", requirement.name));
        } else if requirement.required {
            let reason = format!("Missing required skill: {}", requirement.name);
            risk_areas.push(reason.clone());
            reasons.push(reason);
        } else {
            reasons.push(format!("Missing preferred skill: {}", requirement.name));
        }
    }

    let score = if total_weight > 0.0 {
        round_score(matched_weight / total_weight * 100.0)
    } else {
        0
    };

    SkillOverlap {
        score,
        reasons,
        risk_areas,
        summary,
    }
}
