use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::scope::{Actor, ReportFilters};
use super::{days_between_clamped, mean, round1, ScopeView};
use crate::models::interview::InterviewStatus;
use crate::models::job::{JobStatus, StageRole};
use crate::models::user::UserRole;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProductivity {
    pub recruiter_id: Uuid,
    pub name: String,
    pub active_roles: i64,
    pub cvs_added: i64,
    pub interviews_scheduled: i64,
    pub offers_made: i64,
    pub hires: i64,
    pub avg_time_to_fill: f64,
    /// Composite of hires (cap 40), interview efficiency (cap 30) and
    /// time-to-fill speed (30 at target, scaled by deviation).
    pub productivity_score: f64,
    pub specialty: String,
}

/// Per-recruiter throughput scoring. Recruiter callers only ever see their
/// own row.
pub fn recruiter_productivity(
    view: &ScopeView<'_>,
    actor: &Actor,
    filters: &ReportFilters,
) -> Vec<RecruiterProductivity> {
    let recruiters = view
        .snapshot
        .users
        .iter()
        .filter(|u| u.company_id == actor.company_id && u.role == UserRole::Recruiter)
        .filter(|u| actor.role != UserRole::Recruiter || u.id == actor.user_id);

    let mut rows: Vec<RecruiterProductivity> = Vec::new();
    for recruiter in recruiters {
        let jobs: Vec<_> = view
            .jobs
            .iter()
            .filter(|j| j.assigned_recruiter_id == Some(recruiter.id))
            .collect();
        let job_ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();

        let applications: Vec<_> = view
            .applications
            .iter()
            .filter(|a| job_ids.contains(&a.job_id) && filters.within_window(a.applied_at))
            .collect();
        let application_ids: Vec<Uuid> = applications.iter().map(|a| a.id).collect();

        let interviews_scheduled = view
            .scoped_interviews()
            .filter(|i| {
                application_ids.contains(&i.job_candidate_id)
                    && matches!(
                        i.status,
                        InterviewStatus::Scheduled | InterviewStatus::Completed
                    )
                    && filters.within_window(i.scheduled_at)
            })
            .count();

        let offers_made = applications
            .iter()
            .filter(|a| {
                matches!(
                    view.current_role(a),
                    Some(StageRole::Offer) | Some(StageRole::Hired)
                )
            })
            .count();

        let hire_days: Vec<f64> = applications
            .iter()
            .filter(|a| view.current_role(a) == Some(StageRole::Hired))
            .filter_map(|a| {
                let job = view.job_by_id.get(&a.job_id)?;
                Some(days_between_clamped(job.created_at, a.updated_at))
            })
            .collect();
        let hires = hire_days.len();
        let avg_time_to_fill = mean(&hire_days);

        let specialty = modal_department(&jobs);
        let score = productivity_score(
            hires,
            interviews_scheduled,
            applications.len(),
            avg_time_to_fill,
        );

        rows.push(RecruiterProductivity {
            recruiter_id: recruiter.id,
            name: recruiter.name.clone(),
            active_roles: jobs.iter().filter(|j| j.status == JobStatus::Active).count() as i64,
            cvs_added: applications.len() as i64,
            interviews_scheduled: interviews_scheduled as i64,
            offers_made: offers_made as i64,
            hires: hires as i64,
            avg_time_to_fill: round1(avg_time_to_fill),
            productivity_score: score,
            specialty,
        });
    }

    rows.sort_by(|a, b| {
        b.productivity_score
            .partial_cmp(&a.productivity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows
}

/// Hires worth up to 40, interviews-per-CV efficiency up to 30, and a time
/// component worth 30 at the 30-day target, shrinking half a point per day
/// over and growing half a point per day under. Plain (integer) rounding,
/// unlike the one-decimal rates elsewhere.
pub fn productivity_score(
    hires: usize,
    interviews_scheduled: usize,
    cvs_added: usize,
    avg_time_to_fill: f64,
) -> f64 {
    let hire_component = ((hires * 10) as f64).min(40.0);
    let interview_component = if cvs_added > 0 {
        (interviews_scheduled as f64 / cvs_added as f64 * 30.0).min(30.0)
    } else {
        0.0
    };
    let time_component = if hires > 0 {
        (30.0 - (avg_time_to_fill - 30.0) * 0.5).max(0.0)
    } else {
        0.0
    };
    (hire_component + interview_component + time_component).round()
}

fn modal_department(jobs: &[&&crate::models::job::Job]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut best: Option<(&str, usize)> = None;
    for job in jobs {
        let Some(department) = job.department.as_deref() else {
            continue;
        };
        let count = counts.entry(department).or_insert(0);
        *count += 1;
        // Ties keep the first-encountered department.
        match best {
            Some((_, n)) if *count <= n => {}
            _ => best = Some((department, *count)),
        }
    }
    best.map(|(d, _)| d.to_string())
        .unwrap_or_else(|| "General".to_string())
}
