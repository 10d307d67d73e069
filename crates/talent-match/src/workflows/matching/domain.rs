use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for candidates. Ordering is the shortlist tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for job requisitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case and whitespace insensitive key used for skill matching.
pub fn normalize_skill_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Skill a job asks for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    pub normalized_name: String,
    pub required: bool,
    pub weight: f64,
}

impl SkillRequirement {
    /// Required skills default to weight 2, preferred skills to 1.
    pub fn new(name: impl Into<String>, required: bool, weight: Option<f64>) -> Self {
        let name = name.into();
        let default_weight = if required { 2.0 } else { 1.0 };
        let weight = match weight {
            Some(value) if value.is_finite() && value >= 0.0 => value,
            _ => default_weight,
        };

        Self {
            normalized_name: normalize_skill_name(&name),
            name: name.trim().to_string(),
            required,
            weight,
        }
    }

    pub fn required(name: impl Into<String>) -> Self {
        Self::new(name, true, None)
    }

    pub fn preferred(name: impl Into<String>) -> Self {
        Self::new(name, false, None)
    }
}

/// Keep one requirement per normalized name. The first occurrence wins, and a
/// duplicate marked required upgrades the kept entry.
pub fn dedupe_requirements(requirements: &[SkillRequirement]) -> Vec<SkillRequirement> {
    let mut unique: BTreeMap<String, SkillRequirement> = BTreeMap::new();
    for requirement in requirements {
        if requirement.normalized_name.is_empty() {
            continue;
        }
        match unique.get_mut(&requirement.normalized_name) {
            Some(existing) => {
                if requirement.required && !existing.required {
                    existing.required = true;
                    existing.weight = existing.weight.max(requirement.weight);
                }
            }
            None => {
                unique.insert(requirement.normalized_name.clone(), requirement.clone());
            }
        }
    }
    unique.into_values().collect()
}

/// Skill claimed on a candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSkill {
    pub name: String,
    pub normalized_name: String,
}

impl CandidateSkill {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            normalized_name: normalize_skill_name(&name),
            name: name.trim().to_string(),
        }
    }
}

/// Candidate attributes the scorer compares against the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: CandidateId,
    pub display_name: String,
    pub seniority: Option<String>,
    pub location: Option<String>,
}

/// Requisition attributes the scorer compares against each candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: JobId,
    pub title: String,
    pub seniority: Option<String>,
    pub location: Option<String>,
    pub posted_on: Option<NaiveDate>,
}

/// Engagement score produced by the external signal collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSignal {
    pub score: f64,
    pub reasons: Vec<String>,
}

/// Coarse classification of a score against the tenant's band cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub const fn label(self) -> &'static str {
        match self {
            ConfidenceBand::High => "High",
            ConfidenceBand::Medium => "Medium",
            ConfidenceBand::Low => "Low",
        }
    }

    /// Lower rank sorts first.
    pub(crate) const fn rank(self) -> u8 {
        match self {
            ConfidenceBand::High => 0,
            ConfidenceBand::Medium => 1,
            ConfidenceBand::Low => 2,
        }
    }
}
