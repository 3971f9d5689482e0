//! Unit classification: raw unit string to canonical unit.

use regex::{Regex, RegexBuilder};

use meas_model::{PatternKind, RuleBundle, UnitRule};

use crate::error::TransformError;

#[derive(Debug)]
enum CompiledPattern {
    /// Lowercased needle for case-insensitive containment.
    Substring(String),
    Regex(Regex),
}

#[derive(Debug)]
struct CompiledRule {
    ordinal: u32,
    pattern: CompiledPattern,
    canonical_unit: String,
}

/// Ordered decision list over a definition's unit rules.
///
/// Patterns are compiled once; classification is then a pure function of the
/// input string. Rules are evaluated ordinal-ascending and the first match
/// wins. Ordering is the only disambiguation mechanism for overlapping
/// patterns; the engine performs no specificity resolution of its own.
#[derive(Debug)]
pub struct UnitClassifier {
    rules: Vec<CompiledRule>,
}

impl UnitClassifier {
    pub fn from_rules(rules: &[UnitRule]) -> Result<Self, TransformError> {
        let mut compiled: Vec<CompiledRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            let pattern = match rule.kind {
                PatternKind::Substring => {
                    CompiledPattern::Substring(rule.pattern.to_lowercase())
                }
                PatternKind::Regex => {
                    let regex = RegexBuilder::new(&rule.pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|err| TransformError::InvalidPattern {
                            pattern: rule.pattern.clone(),
                            message: err.to_string(),
                        })?;
                    CompiledPattern::Regex(regex)
                }
            };
            compiled.push(CompiledRule {
                ordinal: rule.ordinal,
                pattern,
                canonical_unit: rule.canonical_unit.clone(),
            });
        }
        compiled.sort_by_key(|rule| rule.ordinal);
        tracing::debug!(rules = compiled.len(), "compiled unit decision list");
        Ok(Self { rules: compiled })
    }

    pub fn from_bundle(bundle: &RuleBundle) -> Result<Self, TransformError> {
        Self::from_rules(&bundle.unit_rules)
    }

    /// Classify a raw unit string.
    ///
    /// Returns `None` when no rule matches. Unmatched input is a normal,
    /// expected outcome counted for QA feedback, not an error.
    pub fn classify(&self, raw_unit: &str) -> Option<&str> {
        let trimmed = raw_unit.trim();
        let lowered = trimmed.to_lowercase();
        for rule in &self.rules {
            let matched = match &rule.pattern {
                CompiledPattern::Substring(needle) => lowered.contains(needle.as_str()),
                CompiledPattern::Regex(regex) => regex.is_match(trimmed),
            };
            if matched {
                return Some(&rule.canonical_unit);
            }
        }
        None
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins_over_later_rules() {
        // "mmol/mol" contains both patterns; ordinal order decides.
        let classifier = UnitClassifier::from_rules(&[
            UnitRule::substring(1, "mmol", "mmol/mol"),
            UnitRule::substring(2, "mol", "mol"),
        ])
        .unwrap();
        assert_eq!(classifier.classify("mmol/mol"), Some("mmol/mol"));
    }

    #[test]
    fn storage_order_does_not_leak_into_evaluation() {
        let classifier = UnitClassifier::from_rules(&[
            UnitRule::substring(2, "mol", "mol"),
            UnitRule::substring(1, "mmol", "mmol/mol"),
        ])
        .unwrap();
        assert_eq!(classifier.classify("mmol/mol"), Some("mmol/mol"));
    }

    #[test]
    fn regex_rules_match_case_insensitively() {
        let classifier = UnitClassifier::from_rules(&[UnitRule::regex(
            1,
            "%|per[ -]?cent|DCCT",
            "%",
        )])
        .unwrap();
        assert_eq!(classifier.classify("Per Cent"), Some("%"));
        assert_eq!(classifier.classify("dcct"), Some("%"));
        assert_eq!(classifier.classify("percent"), Some("%"));
    }

    #[test]
    fn invalid_regex_is_rejected_at_compile() {
        let err = UnitClassifier::from_rules(&[UnitRule::regex(1, "(mmol", "mmol/mol")])
            .unwrap_err();
        assert!(matches!(err, TransformError::InvalidPattern { .. }));
    }
}
