use serde_json::{Map, Value};

use super::domain::{GuardrailOverrides, ShortlistStrategy, StoredGuardrails};

/// Parse a tenant's loosely typed guardrail document field by field.
///
/// Parsing never fails: a field that cannot be read is dropped and recorded in
/// `dropped_fields` so the resolver can fall back to lower precedence values.
pub fn parse_stored_guardrails(configured: bool, raw: Option<&Value>) -> StoredGuardrails {
    let mut stored = StoredGuardrails {
        configured,
        ..StoredGuardrails::default()
    };

    let Some(raw) = raw else {
        return stored;
    };
    if raw.is_null() {
        return stored;
    }

    let Some(root) = raw.as_object() else {
        stored
            .dropped_fields
            .push("dropped field <root>: expected an object".to_string());
        return stored;
    };

    let mut parser = FieldParser {
        dropped: &mut stored.dropped_fields,
    };
    stored.overrides = parser.overrides(root);
    stored
}

struct FieldParser<'a> {
    dropped: &'a mut Vec<String>,
}

impl FieldParser<'_> {
    fn overrides(&mut self, root: &Map<String, Value>) -> GuardrailOverrides {
        let mut overrides = GuardrailOverrides::default();

        if let Some(section) = self.section(root, "scoringWeights", "scoring_weights") {
            let weights = &mut overrides.scoring_weights;
            weights.skills = self.number(section, "scoringWeights", "skills", "skills");
            weights.seniority = self.number(section, "scoringWeights", "seniority", "seniority");
            weights.location = self.number(section, "scoringWeights", "location", "location");
            weights.candidate_signals = self.number(
                section,
                "scoringWeights",
                "candidateSignals",
                "candidate_signals",
            );
        }

        if let Some(section) = self.section(root, "thresholds", "thresholds") {
            let thresholds = &mut overrides.thresholds;
            thresholds.min_match_score =
                self.number(section, "thresholds", "minMatchScore", "min_match_score");
            thresholds.shortlist_min_score = self.number(
                section,
                "thresholds",
                "shortlistMinScore",
                "shortlist_min_score",
            );
            thresholds.shortlist_max_candidates = self.count(
                section,
                "thresholds",
                "shortlistMaxCandidates",
                "shortlist_max_candidates",
            );
        }

        if let Some(value) = lookup(root, "shortlistStrategy", "shortlist_strategy") {
            overrides.shortlist_strategy = self.strategy(value);
        }

        if let Some(section) = self.section(root, "confidenceBands", "confidence_bands") {
            overrides.confidence_bands.high =
                self.number(section, "confidenceBands", "high", "high");
            overrides.confidence_bands.medium =
                self.number(section, "confidenceBands", "medium", "medium");
        }

        if let Some(section) = self.section(root, "safety", "safety") {
            overrides.safety.require_must_haves =
                self.flag(section, "safety", "requireMustHaves", "require_must_haves");
        }

        overrides
    }

    fn drop_field(&mut self, path: &str, why: &str) {
        self.dropped.push(format!("dropped field {path}: {why}"));
    }

    fn section<'v>(
        &mut self,
        root: &'v Map<String, Value>,
        camel: &str,
        snake: &str,
    ) -> Option<&'v Map<String, Value>> {
        match lookup(root, camel, snake)? {
            Value::Object(section) => Some(section),
            Value::Null => None,
            _ => {
                self.drop_field(camel, "expected an object");
                None
            }
        }
    }

    fn number(
        &mut self,
        section: &Map<String, Value>,
        parent: &str,
        camel: &str,
        snake: &str,
    ) -> Option<f64> {
        let value = lookup(section, camel, snake)?;
        let parsed = match value {
            Value::Null => return None,
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(number) if number.is_finite() => Some(number),
            _ => {
                self.drop_field(&format!("{parent}.{camel}"), "expected a finite number");
                None
            }
        }
    }

    fn count(
        &mut self,
        section: &Map<String, Value>,
        parent: &str,
        camel: &str,
        snake: &str,
    ) -> Option<usize> {
        let value = lookup(section, camel, snake)?;
        let parsed = match value {
            Value::Null => return None,
            Value::Number(number) => number.as_u64().or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0 && *float >= 0.0)
                    .map(|float| float as u64)
            }),
            Value::String(text) => text.trim().parse::<u64>().ok(),
            _ => None,
        };

        match parsed.and_then(|count| usize::try_from(count).ok()) {
            Some(count) => Some(count),
            None => {
                self.drop_field(
                    &format!("{parent}.{camel}"),
                    "expected a non-negative integer",
                );
                None
            }
        }
    }

    fn flag(
        &mut self,
        section: &Map<String, Value>,
        parent: &str,
        camel: &str,
        snake: &str,
    ) -> Option<bool> {
        let value = lookup(section, camel, snake)?;
        let parsed = match value {
            Value::Null => return None,
            Value::Bool(flag) => Some(*flag),
            Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        };

        if parsed.is_none() {
            self.drop_field(&format!("{parent}.{camel}"), "expected a boolean");
        }
        parsed
    }

    fn strategy(&mut self, value: &Value) -> Option<ShortlistStrategy> {
        match value {
            Value::Null => None,
            Value::String(label) => {
                if !ShortlistStrategy::is_known_label(label) {
                    self.dropped.push(format!(
                        "unknown shortlistStrategy '{label}' resolved to quality"
                    ));
                }
                Some(ShortlistStrategy::from_label(label))
            }
            _ => {
                self.drop_field("shortlistStrategy", "expected a string");
                None
            }
        }
    }
}

fn lookup<'v>(map: &'v Map<String, Value>, camel: &str, snake: &str) -> Option<&'v Value> {
    map.get(camel).or_else(|| map.get(snake))
}
