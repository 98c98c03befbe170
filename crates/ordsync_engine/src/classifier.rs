//! Shipping-method classification over the configured rule list.

use regex::RegexBuilder;

use ordsync_protocol::{RuleField, RuleOperator, ShippingRule};

use crate::error::{SyncError, SyncResult};

/// One shipping line of an inbound order.
///
/// Storefront orders carry a single line (method code plus description);
/// the classifier accepts a list so multi-line sources plug in unchanged.
#[derive(Debug, Clone, Default)]
pub struct ShippingLine {
    /// Carrier/method code, e.g. `flatrate_flatrate`.
    pub method: Option<String>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl ShippingLine {
    /// The value of the field a rule inspects; absent fields compare as
    /// the empty string.
    fn field_value(&self, field: RuleField) -> &str {
        let value = match field {
            RuleField::ShippingMethod => &self.method,
            RuleField::ShippingDescription => &self.description,
        };
        value.as_deref().unwrap_or_default()
    }
}

/// Selects the warehouse shipping method for an order.
///
/// Rules are evaluated in their persisted order against every shipping
/// line; the first matching (line, rule) pair wins and terminates the
/// scan — rule order decides, not specificity. When nothing matches, the
/// first line's raw method code is the fallback; with no fallback either
/// the order cannot be classified.
pub fn classify(rules: &[ShippingRule], lines: &[ShippingLine]) -> SyncResult<String> {
    let fallback = lines
        .first()
        .and_then(|line| line.method.clone())
        .filter(|method| !method.is_empty());

    for line in lines {
        for rule in rules {
            if rule_matches(rule, line)? {
                return Ok(rule.shipping_method.clone());
            }
        }
    }

    fallback.ok_or_else(|| {
        SyncError::Classification("no rule matched and the order carries no method code".into())
    })
}

fn rule_matches(rule: &ShippingRule, line: &ShippingLine) -> SyncResult<bool> {
    let value = line.field_value(rule.field);
    match rule.operator {
        RuleOperator::Matches => {
            // Anchored and case-insensitive, as the rules were authored
            let regex = RegexBuilder::new(&format!("^(?:{})$", rule.pattern))
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    SyncError::Configuration(format!(
                        "invalid shipping rule pattern '{}': {e}",
                        rule.pattern
                    ))
                })?;
            Ok(regex.is_match(value))
        }
        RuleOperator::Equals => Ok(value == rule.literal_pattern()),
        RuleOperator::NotEquals => Ok(value != rule.literal_pattern()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(method: &str, field: RuleField, operator: RuleOperator, pattern: &str) -> ShippingRule {
        ShippingRule {
            shipping_method: method.into(),
            field,
            operator,
            pattern: pattern.into(),
        }
    }

    fn line(method: Option<&str>, description: Option<&str>) -> ShippingLine {
        ShippingLine {
            method: method.map(Into::into),
            description: description.map(Into::into),
        }
    }

    #[test]
    fn first_matching_rule_wins_over_specificity() {
        let rules = vec![
            rule(
                "M1",
                RuleField::ShippingDescription,
                RuleOperator::Equals,
                "Ground",
            ),
            rule(
                "M2",
                RuleField::ShippingDescription,
                RuleOperator::Matches,
                "Ground|Express",
            ),
        ];
        let lines = vec![line(None, Some("Ground"))];
        assert_eq!(classify(&rules, &lines).unwrap(), "M1");
    }

    #[test]
    fn regex_match_is_anchored_and_case_insensitive() {
        let rules = vec![rule(
            "expedited",
            RuleField::ShippingDescription,
            RuleOperator::Matches,
            "next.?day.*",
        )];
        assert_eq!(
            classify(&rules, &[line(None, Some("NEXT DAY air"))]).unwrap(),
            "expedited"
        );
        // Anchoring: a mid-string hit is not a match
        assert!(classify(&rules, &[line(None, Some("not next day"))]).is_err());
    }

    #[test]
    fn equals_strips_quotes_from_the_pattern() {
        let rules = vec![rule(
            "ground",
            RuleField::ShippingMethod,
            RuleOperator::Equals,
            "\"flatrate_flatrate\"",
        )];
        assert_eq!(
            classify(&rules, &[line(Some("flatrate_flatrate"), None)]).unwrap(),
            "ground"
        );
    }

    #[test]
    fn not_equals_matches_any_other_value() {
        let rules = vec![rule(
            "fallback_method",
            RuleField::ShippingMethod,
            RuleOperator::NotEquals,
            "pickup_pickup",
        )];
        assert_eq!(
            classify(&rules, &[line(Some("ups_ground"), None)]).unwrap(),
            "fallback_method"
        );
        // Equal value does not match; falls back to the raw method code
        assert_eq!(
            classify(&rules, &[line(Some("pickup_pickup"), None)]).unwrap(),
            "pickup_pickup"
        );
    }

    #[test]
    fn absent_field_compares_as_empty_string() {
        let rules = vec![rule(
            "unrouted",
            RuleField::ShippingDescription,
            RuleOperator::Equals,
            "",
        )];
        assert_eq!(
            classify(&rules, &[line(Some("x"), None)]).unwrap(),
            "unrouted"
        );
    }

    #[test]
    fn no_rules_falls_back_to_raw_method() {
        assert_eq!(
            classify(&[], &[line(Some("ups_ground"), Some("Ground"))]).unwrap(),
            "ups_ground"
        );
    }

    #[test]
    fn no_match_and_no_fallback_is_an_error() {
        let err = classify(&[], &[line(None, Some("Ground"))]).unwrap_err();
        assert!(matches!(err, SyncError::Classification(_)));

        let err = classify(&[], &[]).unwrap_err();
        assert!(matches!(err, SyncError::Classification(_)));
    }

    #[test]
    fn invalid_pattern_is_a_configuration_error() {
        let rules = vec![rule(
            "m",
            RuleField::ShippingDescription,
            RuleOperator::Matches,
            "(unclosed",
        )];
        let err = classify(&rules, &[line(None, Some("x"))]).unwrap_err();
        assert!(matches!(err, SyncError::Configuration(_)));
    }

    #[test]
    fn first_line_beats_later_lines() {
        let rules = vec![
            rule("a", RuleField::ShippingDescription, RuleOperator::Equals, "second"),
            rule("b", RuleField::ShippingDescription, RuleOperator::Equals, "first"),
        ];
        let lines = vec![line(None, Some("first")), line(None, Some("second"))];
        // Line order is the outer loop: the first line is scanned against
        // every rule before the second line is considered
        assert_eq!(classify(&rules, &lines).unwrap(), "b");
    }
}
