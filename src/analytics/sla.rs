use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ScopeView;
use crate::models::job::JobStatus;
use crate::models::sla::{SlaConfig, DEFAULT_SLA_THRESHOLD_DAYS, SLA_AT_RISK_WINDOW_DAYS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaState {
    OnTrack,
    AtRisk,
    Breached,
}

impl SlaState {
    /// Sort tier: breached first, on-track last.
    fn tier(self) -> u8 {
        match self {
            SlaState::Breached => 0,
            SlaState::AtRisk => 1,
            SlaState::OnTrack => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaRole {
    pub job_id: Uuid,
    pub job_title: String,
    pub department: Option<String>,
    pub days_open: i64,
    /// Display simplification: the minimum configured threshold, not a
    /// per-candidate figure.
    pub threshold_days: i64,
    pub status: SlaState,
    pub candidates_breaching: i64,
    pub candidates_at_risk: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaSummary {
    pub on_track: i64,
    pub at_risk: i64,
    pub breached: i64,
    pub total_roles: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaStatusReport {
    pub summary: SlaSummary,
    pub roles: Vec<SlaRole>,
}

/// Classifies every active job in scope from its candidates' days-in-stage
/// against per-stage thresholds. A single breaching candidate breaches the
/// job; a single at-risk candidate (within 3 days of the threshold) puts an
/// otherwise clean job at risk.
pub fn sla_status(view: &ScopeView<'_>, now: DateTime<Utc>) -> SlaStatusReport {
    let configs = &view.snapshot.sla_configs;
    let display_threshold = configs
        .iter()
        .map(|c| c.threshold_days as i64)
        .min()
        .unwrap_or(DEFAULT_SLA_THRESHOLD_DAYS);

    let mut roles: Vec<SlaRole> = Vec::new();
    for job in &view.jobs {
        if job.status != JobStatus::Active {
            continue;
        }
        let days_open = (now - job.created_at).num_days().max(0);

        let mut breaching = 0i64;
        let mut at_risk = 0i64;
        for app in view.applications.iter().filter(|a| a.job_id == job.id) {
            let entered_at = view
                .history_by_application
                .get(&app.id)
                .and_then(|entries| entries.iter().find(|e| e.is_open()))
                .map(|e| e.entered_at)
                .unwrap_or(app.applied_at);
            let days_in_stage = (now - entered_at).num_milliseconds() / 86_400_000;

            let threshold = view
                .current_stage(app)
                .and_then(|stage| threshold_for(configs, &stage.name))
                .unwrap_or(DEFAULT_SLA_THRESHOLD_DAYS);

            if days_in_stage > threshold {
                breaching += 1;
            } else if days_in_stage > threshold - SLA_AT_RISK_WINDOW_DAYS {
                at_risk += 1;
            }
        }

        let status = if breaching > 0 {
            SlaState::Breached
        } else if at_risk > 0 {
            SlaState::AtRisk
        } else {
            SlaState::OnTrack
        };

        roles.push(SlaRole {
            job_id: job.id,
            job_title: job.title.clone(),
            department: job.department.clone(),
            days_open,
            threshold_days: display_threshold,
            status,
            candidates_breaching: breaching,
            candidates_at_risk: at_risk,
        });
    }

    roles.sort_by(|a, b| {
        a.status
            .tier()
            .cmp(&b.status.tier())
            .then_with(|| b.days_open.cmp(&a.days_open))
    });

    let summary = SlaSummary {
        on_track: roles.iter().filter(|r| r.status == SlaState::OnTrack).count() as i64,
        at_risk: roles.iter().filter(|r| r.status == SlaState::AtRisk).count() as i64,
        breached: roles.iter().filter(|r| r.status == SlaState::Breached).count() as i64,
        total_roles: roles.len() as i64,
    };

    SlaStatusReport { summary, roles }
}

fn threshold_for(configs: &[SlaConfig], stage_name: &str) -> Option<i64> {
    configs
        .iter()
        .find(|c| c.stage_name.eq_ignore_ascii_case(stage_name.trim()))
        .map(|c| c.threshold_days as i64)
}
