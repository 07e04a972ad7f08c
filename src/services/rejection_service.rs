use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::Result;
use crate::models::activity::ACTIVITY_STAGE_CHANGE;
use crate::models::candidate::Candidate;
use crate::models::job::{PipelineStage, StageRole};
use crate::models::rules::{
    AutoRejectionRule, AutoRejectionRules, LogicConnector, RuleField, RuleOperator,
};
use crate::services::activity_service::ActivityService;
use crate::services::stage_history_service::StageHistoryService;

/// Candidate attributes the rule engine evaluates against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub experience: Option<f64>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education: Option<String>,
    pub salary_expectation: Option<f64>,
}

impl From<&Candidate> for CandidateProfile {
    fn from(candidate: &Candidate) -> Self {
        Self {
            experience: candidate.experience_years,
            location: candidate.location.clone(),
            skills: candidate.skills.clone(),
            education: candidate.education.clone(),
            salary_expectation: candidate.salary_expectation.and_then(|d| d.to_f64()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionDecision {
    pub should_reject: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_rule: Option<AutoRejectionRule>,
}

impl RejectionDecision {
    fn no_reject() -> Self {
        Self::default()
    }
}

/// Evaluates a job's configured auto-rejection rules against a candidate and
/// applies the rejection side effect. Evaluation is pure; best-effort
/// processing never blocks application intake.
pub struct RejectionService;

/// Folds the rule list left to right. The connector stored on rule *i-1*
/// combines results *i-1* and *i*; OR is the default when unset. The first
/// individually-matching rule is reported as triggered, independent of the
/// fold outcome.
pub fn evaluate_auto_rejection(
    profile: &CandidateProfile,
    rules: Option<&AutoRejectionRules>,
) -> RejectionDecision {
    let Some(rules) = rules else {
        return RejectionDecision::no_reject();
    };
    if !rules.enabled {
        return RejectionDecision::no_reject();
    }
    let list = rules.normalized();
    if list.is_empty() {
        return RejectionDecision::no_reject();
    }

    let matches: Vec<bool> = list.iter().map(|r| evaluate_single_rule(profile, r)).collect();
    let triggered = matches.iter().position(|m| *m).map(|i| list[i].clone());

    let mut current = matches[0];
    for i in 1..list.len() {
        let connector = list[i - 1].logic_connector.unwrap_or(LogicConnector::Or);
        current = match connector {
            LogicConnector::And => current && matches[i],
            LogicConnector::Or => current || matches[i],
        };
    }

    if current {
        let reason = triggered.as_ref().map(|r| rejection_reason(profile, r));
        RejectionDecision {
            should_reject: true,
            reason,
            triggered_rule: triggered,
        }
    } else {
        RejectionDecision::no_reject()
    }
}

/// One rule against one candidate. Missing candidate values never match.
pub fn evaluate_single_rule(profile: &CandidateProfile, rule: &AutoRejectionRule) -> bool {
    match rule.field {
        RuleField::Experience => match_numeric(profile.experience, rule),
        RuleField::SalaryExpectation => match_numeric(profile.salary_expectation, rule),
        RuleField::Location => match_text(profile.location.as_deref(), rule),
        RuleField::Education => match_text(profile.education.as_deref(), rule),
        RuleField::Skills => match_skills(profile.skills.as_deref(), rule),
    }
}

fn match_numeric(actual: Option<f64>, rule: &AutoRejectionRule) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    match rule.operator {
        RuleOperator::LessThan => numeric_value(&rule.value).is_some_and(|v| actual < v),
        RuleOperator::GreaterThan => numeric_value(&rule.value).is_some_and(|v| actual > v),
        RuleOperator::Equals => numeric_value(&rule.value).is_some_and(|v| actual == v),
        RuleOperator::NotEquals => numeric_value(&rule.value).is_some_and(|v| actual != v),
        // Inclusive on both ends.
        RuleOperator::Between => {
            numeric_range(&rule.value).is_some_and(|(min, max)| actual >= min && actual <= max)
        }
        _ => false,
    }
}

fn match_text(actual: Option<&str>, rule: &AutoRejectionRule) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let actual = actual.trim().to_lowercase();
    let Some(expected) = text_value(&rule.value) else {
        return false;
    };
    match rule.operator {
        RuleOperator::Equals => actual == expected,
        RuleOperator::NotEquals => actual != expected,
        RuleOperator::Contains => actual.contains(&expected),
        RuleOperator::NotContains => !actual.contains(&expected),
        _ => false,
    }
}

fn match_skills(actual: Option<&[String]>, rule: &AutoRejectionRule) -> bool {
    let Some(actual) = actual else {
        return false;
    };
    let actual: Vec<String> = actual.iter().map(|s| s.trim().to_lowercase()).collect();
    let wanted = text_set(&rule.value);
    if wanted.is_empty() {
        return false;
    }
    match rule.operator {
        RuleOperator::Contains | RuleOperator::ContainsAny => {
            wanted.iter().any(|w| actual.contains(w))
        }
        RuleOperator::NotContains => !wanted.iter().any(|w| actual.contains(w)),
        RuleOperator::ContainsAll => wanted.iter().all(|w| actual.contains(w)),
        _ => false,
    }
}

fn numeric_value(value: &JsonValue) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn numeric_range(value: &JsonValue) -> Option<(f64, f64)> {
    let array = value.as_array()?;
    if array.len() != 2 {
        return None;
    }
    Some((numeric_value(&array[0])?, numeric_value(&array[1])?))
}

fn text_value(value: &JsonValue) -> Option<String> {
    value.as_str().map(|s| s.trim().to_lowercase())
}

fn text_set(value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_lowercase())
            .collect(),
        JsonValue::String(s) => vec![s.trim().to_lowercase()],
        _ => Vec::new(),
    }
}

/// Human-readable rejection sentence. The " years" unit applies only to the
/// experience field.
pub fn rejection_reason(profile: &CandidateProfile, rule: &AutoRejectionRule) -> String {
    let unit = if rule.field == RuleField::Experience {
        " years"
    } else {
        ""
    };
    let threshold = display_value(&rule.value);
    let actual = display_actual(profile, rule.field);
    format!(
        "{} {} {}{} (candidate: {}{})",
        rule.field.label(),
        rule.operator.label(),
        threshold,
        unit,
        actual,
        unit
    )
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(" and "),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_actual(profile: &CandidateProfile, field: RuleField) -> String {
    let value = match field {
        RuleField::Experience => profile.experience.map(|v| v.to_string()),
        RuleField::SalaryExpectation => profile.salary_expectation.map(|v| v.to_string()),
        RuleField::Location => profile.location.clone(),
        RuleField::Education => profile.education.clone(),
        RuleField::Skills => profile.skills.as_ref().map(|s| s.join(", ")),
    };
    value.unwrap_or_else(|| "not provided".to_string())
}

impl RejectionService {
    /// Applies auto-rejection to one application inside the caller's
    /// transaction. A vanished job or a missing rejected-role stage logs a
    /// warning and returns `false` instead of failing the intake flow that
    /// invoked it.
    pub async fn process_auto_rejection_on(
        conn: &mut PgConnection,
        job_candidate_id: Uuid,
        candidate_id: Uuid,
        profile: &CandidateProfile,
        job_id: Uuid,
    ) -> Result<bool> {
        let job_rules: Option<(Option<JsonValue>,)> =
            sqlx::query_as("SELECT auto_rejection_rules FROM jobs WHERE id = $1")
                .bind(job_id)
                .fetch_optional(&mut *conn)
                .await?;
        let Some((rules_json,)) = job_rules else {
            return Ok(false);
        };
        // Malformed stored JSON is an internal error and propagates.
        let rules: Option<AutoRejectionRules> = rules_json
            .map(serde_json::from_value)
            .transpose()?;

        let decision = evaluate_auto_rejection(profile, rules.as_ref());
        if !decision.should_reject {
            return Ok(false);
        }

        let rejected_stage = sqlx::query_as::<_, PipelineStage>(
            "SELECT id, job_id, name, position, stage_role FROM pipeline_stages \
             WHERE job_id = $1 AND stage_role = $2 ORDER BY position LIMIT 1",
        )
        .bind(job_id)
        .bind(StageRole::Rejected)
        .fetch_optional(&mut *conn)
        .await?;
        let Some(rejected_stage) = rejected_stage else {
            tracing::warn!(
                %job_id,
                "auto-rejection triggered but job has no rejected stage; skipping"
            );
            return Ok(false);
        };

        let current_stage: Option<(Uuid,)> =
            sqlx::query_as("SELECT current_stage_id FROM job_candidates WHERE id = $1")
                .bind(job_candidate_id)
                .fetch_optional(&mut *conn)
                .await?;
        let Some((current_stage_id,)) = current_stage else {
            return Ok(false);
        };

        StageHistoryService::close_stage_entry_on(conn, job_candidate_id, current_stage_id, None)
            .await?;
        StageHistoryService::create_stage_entry_on(
            conn,
            job_candidate_id,
            rejected_stage.id,
            &rejected_stage.name,
            decision.reason.as_deref(),
            None,
        )
        .await?;

        sqlx::query("UPDATE job_candidates SET current_stage_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(rejected_stage.id)
            .bind(job_candidate_id)
            .execute(&mut *conn)
            .await?;

        let reason = decision
            .reason
            .clone()
            .unwrap_or_else(|| "Auto-rejection rules matched".to_string());
        ActivityService::log_on(
            conn,
            candidate_id,
            Some(job_candidate_id),
            ACTIVITY_STAGE_CHANGE,
            &format!("Automatically rejected: {}", reason),
            Some(json!({
                "fromStageName": "Applied",
                "toStageName": "Rejected",
                "autoRejected": true,
                "reason": reason,
                "triggeredRule": decision.triggered_rule,
            })),
        )
        .await?;

        Ok(true)
    }
}
