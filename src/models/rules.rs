use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Job-level auto-rejection configuration, stored as JSONB. Two shapes are
/// accepted: the current rule-list form and the legacy
/// `{minExperience, maxExperience}` object, which normalizes to experience
/// threshold rules joined by OR.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRejectionRules {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rules: RuleSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSet {
    List(Vec<AutoRejectionRule>),
    Legacy(LegacyRules),
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::List(Vec::new())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRules {
    pub min_experience: Option<f64>,
    pub max_experience: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRejectionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub field: RuleField,
    pub operator: RuleOperator,
    pub value: JsonValue,
    /// Connector between this rule's result and the NEXT rule's result when
    /// folding left to right. Absent on the last rule; OR when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic_connector: Option<LogicConnector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleField {
    Experience,
    Location,
    Skills,
    Education,
    SalaryExpectation,
}

impl RuleField {
    pub fn label(&self) -> &'static str {
        match self {
            RuleField::Experience => "Experience",
            RuleField::Location => "Location",
            RuleField::Skills => "Skills",
            RuleField::Education => "Education",
            RuleField::SalaryExpectation => "Salary expectation",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, RuleField::Experience | RuleField::SalaryExpectation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    LessThan,
    GreaterThan,
    Equals,
    NotEquals,
    Between,
    Contains,
    NotContains,
    ContainsAny,
    ContainsAll,
}

impl RuleOperator {
    pub fn label(&self) -> &'static str {
        match self {
            RuleOperator::LessThan => "is less than",
            RuleOperator::GreaterThan => "is greater than",
            RuleOperator::Equals => "equals",
            RuleOperator::NotEquals => "does not equal",
            RuleOperator::Between => "is between",
            RuleOperator::Contains => "contains",
            RuleOperator::NotContains => "does not contain",
            RuleOperator::ContainsAny => "contains any of",
            RuleOperator::ContainsAll => "contains all of",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicConnector {
    And,
    Or,
}

impl AutoRejectionRules {
    /// Flattens either shape into the rule-list form. Legacy thresholds become
    /// experience comparisons with an implicit OR between them.
    pub fn normalized(&self) -> Vec<AutoRejectionRule> {
        match &self.rules {
            RuleSet::List(rules) => rules.clone(),
            RuleSet::Legacy(legacy) => {
                let mut rules = Vec::new();
                if let Some(min) = legacy.min_experience {
                    rules.push(AutoRejectionRule {
                        id: None,
                        field: RuleField::Experience,
                        operator: RuleOperator::LessThan,
                        value: JsonValue::from(min),
                        logic_connector: Some(LogicConnector::Or),
                    });
                }
                if let Some(max) = legacy.max_experience {
                    rules.push(AutoRejectionRule {
                        id: None,
                        field: RuleField::Experience,
                        operator: RuleOperator::GreaterThan,
                        value: JsonValue::from(max),
                        logic_connector: Some(LogicConnector::Or),
                    });
                }
                rules
            }
        }
    }
}
