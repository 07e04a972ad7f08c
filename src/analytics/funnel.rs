use serde::Serialize;

use super::scope::ReportFilters;
use super::{percentage, round1, stage_groups, ScopeView};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStageBreakdown {
    pub stage_name: String,
    pub count: i64,
    /// Share of total applicants currently sitting in this named bucket.
    pub percentage: f64,
    /// Current occupants of the next bucket relative to this one, capped at
    /// 100. `None` on the last stage.
    pub conversion_to_next: Option<f64>,
    /// Mean days spent in this stage, from closed history rows.
    pub avg_days_in_stage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelAnalytics {
    pub stages: Vec<FunnelStageBreakdown>,
    pub total_applicants: i64,
    pub total_hired: i64,
    pub overall_conversion_rate: f64,
}

pub fn funnel_analytics(view: &ScopeView<'_>, filters: &ReportFilters) -> FunnelAnalytics {
    let groups = stage_groups(&view.stages);

    let applications: Vec<_> = view
        .applications
        .iter()
        .filter(|a| filters.within_window(a.applied_at))
        .collect();
    let total_applicants = applications.len();

    // Current occupants per named bucket. Each application lands in exactly
    // one bucket, so the counts sum to total_applicants.
    let counts: Vec<usize> = groups
        .iter()
        .map(|g| {
            applications
                .iter()
                .filter(|a| g.stage_ids.contains(&a.current_stage_id))
                .count()
        })
        .collect();

    // Mean residency per stage name from closed ledger rows.
    let avg_days: Vec<f64> = groups
        .iter()
        .map(|g| {
            let durations: Vec<f64> = view
                .scoped_history()
                .filter(|e| {
                    e.exited_at.is_some()
                        && e.stage_name.trim().eq_ignore_ascii_case(&g.name)
                        && filters.within_window(e.entered_at)
                })
                .filter_map(|e| e.duration_hours)
                .map(|h| h / 24.0)
                .collect();
            round1(super::mean(&durations))
        })
        .collect();

    let stages = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let conversion_to_next = if i + 1 < groups.len() {
                Some(if counts[i] == 0 {
                    0.0
                } else {
                    round1((counts[i + 1] as f64 / counts[i] as f64 * 100.0).min(100.0))
                })
            } else {
                None
            };
            FunnelStageBreakdown {
                stage_name: g.name.clone(),
                count: counts[i] as i64,
                percentage: percentage(counts[i], total_applicants),
                conversion_to_next,
                avg_days_in_stage: avg_days[i],
            }
        })
        .collect();

    let total_hired = groups
        .iter()
        .zip(&counts)
        .find(|(g, _)| g.key == "hired")
        .map(|(_, c)| *c)
        .unwrap_or(0);

    FunnelAnalytics {
        stages,
        total_applicants: total_applicants as i64,
        total_hired: total_hired as i64,
        overall_conversion_rate: percentage(total_hired, total_applicants),
    }
}
