use chrono::{DateTime, Datelike, Duration, Local, Utc};
use serde::Serialize;

use super::offer::offer_acceptance;
use super::scope::ReportFilters;
use super::sla::{sla_status, SlaSummary};
use super::time_to_fill::time_to_fill;
use super::ScopeView;
use crate::models::interview::InterviewStatus;
use crate::models::job::{JobStatus, StageRole};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiMetrics {
    pub active_roles: i64,
    /// Applications not yet in a terminal (hired/rejected) stage.
    pub active_candidates: i64,
    pub interviews_today: i64,
    pub interviews_this_week: i64,
    pub candidates_in_offer: i64,
    /// Hires within the date filter (by stage-change timestamp).
    pub hired_candidates: i64,
    pub avg_time_to_fill: f64,
    pub offer_acceptance_rate: f64,
    pub sla_summary: SlaSummary,
}

/// Dashboard headline numbers. Today/this-week windows use calendar
/// boundaries in server-local time, with the week starting on Sunday.
pub fn kpi_metrics(view: &ScopeView<'_>, filters: &ReportFilters, now: DateTime<Utc>) -> KpiMetrics {
    let active_roles = view
        .jobs
        .iter()
        .filter(|j| j.status == JobStatus::Active)
        .count();

    let mut active_candidates = 0usize;
    let mut candidates_in_offer = 0usize;
    let mut hired_candidates = 0usize;
    for app in &view.applications {
        match view.current_role(app) {
            Some(StageRole::Hired) => {
                if filters.within_window(app.updated_at) {
                    hired_candidates += 1;
                }
            }
            Some(StageRole::Rejected) => {}
            Some(StageRole::Offer) => {
                candidates_in_offer += 1;
                active_candidates += 1;
            }
            _ => active_candidates += 1,
        }
    }

    let today = now.with_timezone(&Local).date_naive();
    let week_start = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
    let week_end = week_start + Duration::days(7);

    let mut interviews_today = 0usize;
    let mut interviews_this_week = 0usize;
    for interview in view.scoped_interviews() {
        if interview.status == InterviewStatus::Cancelled {
            continue;
        }
        let local_date = interview.scheduled_at.with_timezone(&Local).date_naive();
        if local_date == today {
            interviews_today += 1;
        }
        if local_date >= week_start && local_date < week_end {
            interviews_this_week += 1;
        }
    }

    KpiMetrics {
        active_roles: active_roles as i64,
        active_candidates: active_candidates as i64,
        interviews_today: interviews_today as i64,
        interviews_this_week: interviews_this_week as i64,
        candidates_in_offer: candidates_in_offer as i64,
        hired_candidates: hired_candidates as i64,
        avg_time_to_fill: time_to_fill(view, filters).average_days,
        offer_acceptance_rate: offer_acceptance(view, filters).overall_rate,
        sla_summary: sla_status(view, now).summary,
    }
}
