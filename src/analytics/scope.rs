use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::user::UserRole;

/// Identity of the caller, resolved by the auth layer.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Optional narrowing filters shared by every report.
#[derive(Debug, Clone, Default)]
pub struct ReportFilters {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub department_id: Option<String>,
    pub location_id: Option<String>,
    pub job_id: Option<Uuid>,
    pub recruiter_id: Option<Uuid>,
}

impl ReportFilters {
    /// Inclusive date-window check, applied to whichever timestamp is
    /// semantically relevant per query.
    pub fn within_window(&self, ts: DateTime<Utc>) -> bool {
        if let Some(start) = self.start_date {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if ts > end {
                return false;
            }
        }
        true
    }

    pub fn has_window(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

/// The shared job-scope predicate. Company always applies; recruiters only
/// ever see their own jobs, and their `recruiter_id` filter is ignored so the
/// filter parameter cannot widen their scope.
pub fn job_in_scope(job: &Job, actor: &Actor, filters: &ReportFilters) -> bool {
    if job.company_id != actor.company_id {
        return false;
    }
    if actor.role == UserRole::Recruiter {
        if job.assigned_recruiter_id != Some(actor.user_id) {
            return false;
        }
    } else if let Some(recruiter_id) = filters.recruiter_id {
        if job.assigned_recruiter_id != Some(recruiter_id) {
            return false;
        }
    }
    if let Some(job_id) = filters.job_id {
        if job.id != job_id {
            return false;
        }
    }
    if let Some(ref department) = filters.department_id {
        if job.department.as_deref() != Some(department.as_str()) {
            return false;
        }
    }
    if let Some(ref location) = filters.location_id {
        if !job.matches_location(location) {
            return false;
        }
    }
    true
}
