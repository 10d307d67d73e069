use super::scoring::SkillSummary;

pub const NO_RISKS_DETECTED: &str = "No major risks detected";

/// Inputs rendered into the exportable explanation block.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationInput<'a> {
    pub top_reasons: &'a [String],
    pub risk_areas: &'a [String],
    pub skill_summary: &'a SkillSummary,
    pub score: u8,
}

/// Render reasons, skill coverage, risks, and the score as plain text.
///
/// Output depends only on the input values, so repeated calls are byte-identical
/// and safe to store for audit export.
pub fn format_explanation(input: &ExplanationInput<'_>) -> String {
    let reasons = if input.top_reasons.is_empty() {
        "none recorded".to_string()
    } else {
        input.top_reasons.join("; ")
    };

    let summary = input.skill_summary;
    let skills = format!(
        "{}/{} required skills matched; {}/{} preferred skills matched",
        summary.required_matched,
        summary.required_total,
        summary.preferred_matched,
        summary.preferred_total
    );

    let risks = if input.risk_areas.is_empty() {
        NO_RISKS_DETECTED.to_string()
    } else {
        input.risk_areas.join("; ")
    };

    format!(
        "Top reasons: {reasons}\nSkills: {skills}\nRisks: {risks}\nMatch score: {}/100",
        input.score
    )
}
