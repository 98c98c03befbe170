//! The ordered shipping-method rule list.
//!
//! Rules are persisted as a JSON array and evaluated in array order;
//! the first matching rule decides the shipping method.

use serde::{Deserialize, Serialize};

/// The order field a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleField {
    /// The carrier/method code, e.g. `flatrate_flatrate`.
    #[serde(rename = "shipping_method")]
    ShippingMethod,
    /// The human-readable shipping description.
    #[serde(rename = "shipping_description")]
    ShippingDescription,
}

/// The comparison a rule applies to the field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOperator {
    /// Literal equality (quote characters stripped from the pattern).
    #[serde(rename = "=")]
    Equals,
    /// Literal inequality (quote characters stripped from the pattern).
    #[serde(rename = "!=")]
    NotEquals,
    /// Anchored, case-insensitive regular-expression match.
    #[serde(rename = "=~")]
    Matches,
}

/// One shipping-method translation rule.
///
/// All four fields are required; a persisted rule missing any of them is a
/// configuration error, not a rule to be skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRule {
    /// The warehouse shipping method to use when this rule matches.
    pub shipping_method: String,
    /// The order field to inspect.
    pub field: RuleField,
    /// The comparison operator.
    pub operator: RuleOperator,
    /// The pattern or literal value to compare against.
    pub pattern: String,
}

impl ShippingRule {
    /// The pattern with surrounding quote characters stripped, as used by
    /// the literal operators.
    pub fn literal_pattern(&self) -> String {
        self.pattern.replace(['"', '\''], "")
    }
}

/// Parses the persisted rule list, preserving its order.
pub fn parse_rules(json: &str) -> Result<Vec<ShippingRule>, serde_json::Error> {
    serde_json::from_str(json)
}
