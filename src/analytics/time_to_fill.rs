use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::scope::ReportFilters;
use super::{days_between_clamped, mean, median, round1, ScopeView};
use crate::models::job::StageRole;

pub const TIME_TO_FILL_TARGET_DAYS: f64 = 30.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentTimeToFill {
    pub department: String,
    pub average_days: f64,
    pub hires: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTimeToFill {
    pub job_id: Uuid,
    pub job_title: String,
    pub average_days: f64,
    pub hires: i64,
    pub is_over_target: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeToFill {
    pub average_days: f64,
    pub median_days: f64,
    pub target_days: f64,
    pub by_department: Vec<DepartmentTimeToFill>,
    pub by_job: Vec<JobTimeToFill>,
}

/// Days from pipeline open (job.created_at) to the hire's last stage change
/// (updated_at), clamped non-negative against data anomalies. Zero hires
/// yields a zero-filled report, not an error.
pub fn time_to_fill(view: &ScopeView<'_>, filters: &ReportFilters) -> TimeToFill {
    // (days, department, job) per hired application in scope.
    let mut samples: Vec<(f64, String, Uuid)> = Vec::new();
    for app in &view.applications {
        if view.current_role(app) != Some(StageRole::Hired) {
            continue;
        }
        if !filters.within_window(app.updated_at) {
            continue;
        }
        let Some(job) = view.job_by_id.get(&app.job_id) else {
            continue;
        };
        let days = days_between_clamped(job.created_at, app.updated_at);
        let department = job
            .department
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        samples.push((days, department, job.id));
    }

    if samples.is_empty() {
        return TimeToFill {
            average_days: 0.0,
            median_days: 0.0,
            target_days: TIME_TO_FILL_TARGET_DAYS,
            by_department: Vec::new(),
            by_job: Vec::new(),
        };
    }

    let all_days: Vec<f64> = samples.iter().map(|(d, _, _)| *d).collect();

    let mut per_department: HashMap<String, Vec<f64>> = HashMap::new();
    let mut per_job: HashMap<Uuid, Vec<f64>> = HashMap::new();
    for (days, department, job_id) in &samples {
        per_department
            .entry(department.clone())
            .or_default()
            .push(*days);
        per_job.entry(*job_id).or_default().push(*days);
    }

    let mut by_department: Vec<DepartmentTimeToFill> = per_department
        .into_iter()
        .map(|(department, days)| DepartmentTimeToFill {
            department,
            average_days: round1(mean(&days)),
            hires: days.len() as i64,
        })
        .collect();
    by_department.sort_by(|a, b| a.department.cmp(&b.department));

    let mut by_job: Vec<JobTimeToFill> = per_job
        .into_iter()
        .filter_map(|(job_id, days)| {
            let job = view.job_by_id.get(&job_id)?;
            let average_days = round1(mean(&days));
            Some(JobTimeToFill {
                job_id,
                job_title: job.title.clone(),
                average_days,
                hires: days.len() as i64,
                is_over_target: average_days > TIME_TO_FILL_TARGET_DAYS,
            })
        })
        .collect();
    by_job.sort_by(|a, b| {
        b.average_days
            .partial_cmp(&a.average_days)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    TimeToFill {
        average_days: round1(mean(&all_days)),
        median_days: round1(median(&all_days)),
        target_days: TIME_TO_FILL_TARGET_DAYS,
        by_department,
        by_job,
    }
}
