#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Seniority,
    Location,
}

impl AttributeKind {
    pub const fn label(self) -> &'static str {
        match self {
            AttributeKind::Seniority => "Seniority",
            AttributeKind::Location => "Location",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeScore {
    pub score: u8,
    pub reasons: Vec<String>,
    pub risk_areas: Vec<String>,
}

/// Compare one candidate attribute with the job's value.
///
/// Missing data scores a neutral 50 rather than a penalty so incomplete profiles
/// are not silently excluded.
pub fn score_attribute(
    kind: AttributeKind,
    candidate: Option<&str>,
    job: Option<&str>,
) -> AttributeScore {
    let label = kind.label();
    let candidate = candidate.map(str::trim).filter(|value| !value.is_empty());
    let job = job.map(str::trim).filter(|value| !value.is_empty());

    match (candidate, job) {
        (Some(candidate), Some(job)) if candidate.to_lowercase() == job.to_lowercase() => {
            AttributeScore {
                score: 100,
                reasons: vec![format!("{label} aligns: {job}")],
                risk_areas: Vec::new(),
            }
        }
        (Some(candidate), Some(job)) => {
            let mismatch = format!("{label} mismatch: candidate {candidate}, job {job}");
            AttributeScore {
                score: 0,
                reasons: vec![mismatch.clone()],
                risk_areas: vec![mismatch],
            }
        }
        _ => AttributeScore {
            score: 50,
            reasons: vec![format!(
                "{label} comparison limited due to missing data"
            )],
            risk_areas: vec![format!("{label} data missing")],
        },
    }
}
