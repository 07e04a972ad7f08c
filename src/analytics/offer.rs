use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::scope::ReportFilters;
use super::{percentage, ScopeView};
use crate::models::job::StageRole;

/// Acceptance rates below this are flagged per role.
pub const OFFER_ACCEPTANCE_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentOfferAcceptance {
    pub department: String,
    pub offers: i64,
    pub accepted: i64,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleOfferAcceptance {
    pub job_id: Uuid,
    pub job_title: String,
    pub offers: i64,
    pub accepted: i64,
    pub rate: f64,
    pub is_under_threshold: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferAcceptance {
    pub offers: i64,
    pub accepted: i64,
    pub overall_rate: f64,
    pub by_department: Vec<DepartmentOfferAcceptance>,
    pub by_role: Vec<RoleOfferAcceptance>,
}

/// The offer population is everyone currently in an offer- or hired-role
/// stage; accepted means currently hired.
pub fn offer_acceptance(view: &ScopeView<'_>, filters: &ReportFilters) -> OfferAcceptance {
    // (offers, accepted) keyed by department and by job.
    let mut offers = 0usize;
    let mut accepted = 0usize;
    let mut per_department: HashMap<String, (usize, usize)> = HashMap::new();
    let mut per_job: HashMap<Uuid, (usize, usize)> = HashMap::new();

    for app in &view.applications {
        let role = view.current_role(app);
        let in_population = matches!(role, Some(StageRole::Offer) | Some(StageRole::Hired));
        if !in_population || !filters.within_window(app.updated_at) {
            continue;
        }
        let Some(job) = view.job_by_id.get(&app.job_id) else {
            continue;
        };
        let is_accepted = role == Some(StageRole::Hired);

        offers += 1;
        accepted += usize::from(is_accepted);

        let department = job
            .department
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());
        let dept_entry = per_department.entry(department).or_insert((0, 0));
        dept_entry.0 += 1;
        dept_entry.1 += usize::from(is_accepted);

        let job_entry = per_job.entry(job.id).or_insert((0, 0));
        job_entry.0 += 1;
        job_entry.1 += usize::from(is_accepted);
    }

    let mut by_department: Vec<DepartmentOfferAcceptance> = per_department
        .into_iter()
        .map(|(department, (offers, accepted))| DepartmentOfferAcceptance {
            department,
            offers: offers as i64,
            accepted: accepted as i64,
            rate: percentage(accepted, offers),
        })
        .collect();
    by_department.sort_by(|a, b| a.department.cmp(&b.department));

    let mut by_role: Vec<RoleOfferAcceptance> = per_job
        .into_iter()
        .filter_map(|(job_id, (offers, accepted))| {
            let job = view.job_by_id.get(&job_id)?;
            let rate = percentage(accepted, offers);
            Some(RoleOfferAcceptance {
                job_id,
                job_title: job.title.clone(),
                offers: offers as i64,
                accepted: accepted as i64,
                rate,
                is_under_threshold: rate < OFFER_ACCEPTANCE_THRESHOLD,
            })
        })
        .collect();
    by_role.sort_by(|a, b| {
        a.rate
            .partial_cmp(&b.rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    OfferAcceptance {
        offers: offers as i64,
        accepted: accepted as i64,
        overall_rate: percentage(accepted, offers),
        by_department,
        by_role,
    }
}
