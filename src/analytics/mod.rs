//! Pure pipeline analytics over fetched row sets.
//!
//! Every report here is a deterministic function of a [`CompanySnapshot`]
//! (the company's rows, as loaded by the data-access layer), the calling
//! [`scope::Actor`] and [`scope::ReportFilters`], and an explicit `now`
//! instant. Keeping the aggregation in memory over filtered scans keeps the
//! semantics independent of the storage engine and directly testable.

pub mod conversion;
pub mod dropoff;
pub mod funnel;
pub mod kpi;
pub mod offer;
pub mod panel;
pub mod recruiter;
pub mod rejection_reasons;
pub mod scope;
pub mod sla;
pub mod source;
pub mod time_in_stage;
pub mod time_to_fill;

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::models::candidate::{Candidate, JobCandidate};
use crate::models::interview::{Interview, InterviewFeedback};
use crate::models::job::{Job, PipelineStage, StageRole};
use crate::models::sla::SlaConfig;
use crate::models::stage_history::StageHistoryEntry;
use crate::models::user::User;

use scope::{job_in_scope, Actor, ReportFilters};

/// All rows of one company, fetched in one pass by the analytics service.
#[derive(Debug, Clone, Default)]
pub struct CompanySnapshot {
    pub jobs: Vec<Job>,
    pub stages: Vec<PipelineStage>,
    pub applications: Vec<JobCandidate>,
    pub candidates: Vec<Candidate>,
    pub history: Vec<StageHistoryEntry>,
    pub interviews: Vec<Interview>,
    pub feedback: Vec<InterviewFeedback>,
    pub users: Vec<User>,
    pub sla_configs: Vec<SlaConfig>,
}

/// Snapshot narrowed to the caller's job scope, with the lookup maps the
/// individual reports share.
pub struct ScopeView<'a> {
    pub snapshot: &'a CompanySnapshot,
    pub jobs: Vec<&'a Job>,
    pub job_by_id: HashMap<Uuid, &'a Job>,
    pub stages: Vec<&'a PipelineStage>,
    pub stage_by_id: HashMap<Uuid, &'a PipelineStage>,
    pub applications: Vec<&'a JobCandidate>,
    pub application_ids: HashSet<Uuid>,
    pub candidate_by_id: HashMap<Uuid, &'a Candidate>,
    pub user_by_id: HashMap<Uuid, &'a User>,
    /// Per-application stage history, ascending by entered_at.
    pub history_by_application: HashMap<Uuid, Vec<&'a StageHistoryEntry>>,
}

impl<'a> ScopeView<'a> {
    pub fn build(snapshot: &'a CompanySnapshot, actor: &Actor, filters: &ReportFilters) -> Self {
        let jobs: Vec<&Job> = snapshot
            .jobs
            .iter()
            .filter(|j| job_in_scope(j, actor, filters))
            .collect();
        let job_ids: HashSet<Uuid> = jobs.iter().map(|j| j.id).collect();
        let job_by_id = jobs.iter().map(|j| (j.id, *j)).collect();

        let mut stages: Vec<&PipelineStage> = snapshot
            .stages
            .iter()
            .filter(|s| job_ids.contains(&s.job_id))
            .collect();
        stages.sort_by_key(|s| s.position);
        // Lookup covers every stage, not only scoped ones, so history rows
        // pointing at stages of out-of-scope jobs still resolve.
        let stage_by_id = snapshot.stages.iter().map(|s| (s.id, s)).collect();

        let applications: Vec<&JobCandidate> = snapshot
            .applications
            .iter()
            .filter(|a| job_ids.contains(&a.job_id))
            .collect();
        let application_ids: HashSet<Uuid> = applications.iter().map(|a| a.id).collect();

        let candidate_by_id = snapshot.candidates.iter().map(|c| (c.id, c)).collect();
        let user_by_id = snapshot.users.iter().map(|u| (u.id, u)).collect();

        let mut history_by_application: HashMap<Uuid, Vec<&StageHistoryEntry>> = HashMap::new();
        for entry in &snapshot.history {
            if application_ids.contains(&entry.job_candidate_id) {
                history_by_application
                    .entry(entry.job_candidate_id)
                    .or_default()
                    .push(entry);
            }
        }
        for entries in history_by_application.values_mut() {
            entries.sort_by_key(|e| e.entered_at);
        }

        Self {
            snapshot,
            jobs,
            job_by_id,
            stages,
            stage_by_id,
            applications,
            application_ids,
            candidate_by_id,
            user_by_id,
            history_by_application,
        }
    }

    pub fn current_stage(&self, app: &JobCandidate) -> Option<&'a PipelineStage> {
        self.stage_by_id.get(&app.current_stage_id).copied()
    }

    pub fn current_role(&self, app: &JobCandidate) -> Option<StageRole> {
        self.current_stage(app).map(|s| s.stage_role)
    }

    /// History rows of in-scope applications, in arbitrary application order.
    pub fn scoped_history(&self) -> impl Iterator<Item = &'a StageHistoryEntry> + '_ {
        self.history_by_application
            .values()
            .flat_map(|entries| entries.iter().copied())
    }

    /// Interviews whose application is in scope.
    pub fn scoped_interviews(&self) -> impl Iterator<Item = &'a Interview> + '_ {
        self.snapshot
            .interviews
            .iter()
            .filter(|i| self.application_ids.contains(&i.job_candidate_id))
    }

    pub fn application(&self, id: Uuid) -> Option<&'a JobCandidate> {
        self.applications.iter().find(|a| a.id == id).copied()
    }
}

/// Pipeline stages grouped by display name (case-insensitive) across all jobs
/// in scope, ordered by their minimum `position`. Multiple jobs contribute to
/// one named bucket on purpose.
#[derive(Debug, Clone)]
pub struct StageGroup {
    /// First-encountered display spelling.
    pub name: String,
    /// Lowercased grouping key.
    pub key: String,
    pub position: i32,
    pub stage_ids: HashSet<Uuid>,
}

pub fn stage_groups(stages: &[&PipelineStage]) -> Vec<StageGroup> {
    let mut groups: Vec<StageGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for stage in stages {
        let key = stage.name.trim().to_lowercase();
        match index.get(&key) {
            Some(&i) => {
                let group = &mut groups[i];
                group.stage_ids.insert(stage.id);
                group.position = group.position.min(stage.position);
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(StageGroup {
                    name: stage.name.trim().to_string(),
                    key,
                    position: stage.position,
                    stage_ids: HashSet::from([stage.id]),
                });
            }
        }
    }
    groups.sort_by_key(|g| g.position);
    groups
}

/// One-decimal rounding used by every percentage/rate output.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(part as f64 / whole as f64 * 100.0)
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Standard even/odd-averaging median over an unsorted slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Non-negative day count between two instants, as a fraction.
pub fn days_between_clamped(
    from: chrono::DateTime<chrono::Utc>,
    to: chrono::DateTime<chrono::Utc>,
) -> f64 {
    ((to - from).num_milliseconds() as f64 / 86_400_000.0).max(0.0)
}
