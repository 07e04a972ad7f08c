#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use ats_backend::analytics::scope::Actor;
use ats_backend::analytics::CompanySnapshot;
use ats_backend::models::candidate::{Candidate, JobCandidate};
use ats_backend::models::interview::{
    Interview, InterviewFeedback, InterviewStatus, Recommendation,
};
use ats_backend::models::job::{Job, JobStatus, PipelineStage, StageRole};
use ats_backend::models::sla::SlaConfig;
use ats_backend::models::stage_history::{duration_hours_between, StageHistoryEntry};
use ats_backend::models::user::{User, UserRole};

/// Fixed, deterministic instant inside March 2026.
pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

/// In-memory company data for exercising the pure analytics layer.
pub struct Fixture {
    pub company_id: Uuid,
    pub snapshot: CompanySnapshot,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            company_id: Uuid::new_v4(),
            snapshot: CompanySnapshot::default(),
        }
    }

    pub fn actor(&self, role: UserRole) -> Actor {
        Actor {
            company_id: self.company_id,
            user_id: Uuid::new_v4(),
            role,
        }
    }

    pub fn actor_as(&self, user_id: Uuid, role: UserRole) -> Actor {
        Actor {
            company_id: self.company_id,
            user_id,
            role,
        }
    }

    pub fn add_user(&mut self, name: &str, role: UserRole) -> Uuid {
        let id = Uuid::new_v4();
        self.snapshot.users.push(User {
            id,
            company_id: self.company_id,
            name: name.to_string(),
            email: format!("{}@example.com", id),
            role,
            is_active: true,
            created_at: at(1, 0),
        });
        id
    }

    pub fn add_job(
        &mut self,
        title: &str,
        department: Option<&str>,
        recruiter_id: Option<Uuid>,
        created_at: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.snapshot.jobs.push(Job {
            id,
            company_id: self.company_id,
            title: title.to_string(),
            department: department.map(str::to_string),
            location: None,
            locations: None,
            status: JobStatus::Active,
            openings: 1,
            assigned_recruiter_id: recruiter_id,
            auto_rejection_rules: None,
            created_at,
            updated_at: created_at,
        });
        id
    }

    pub fn set_job_status(&mut self, job_id: Uuid, status: JobStatus) {
        if let Some(job) = self.snapshot.jobs.iter_mut().find(|j| j.id == job_id) {
            job.status = status;
        }
    }

    pub fn set_job_location(&mut self, job_id: Uuid, location: &str) {
        if let Some(job) = self.snapshot.jobs.iter_mut().find(|j| j.id == job_id) {
            job.location = Some(location.to_string());
        }
    }

    pub fn add_stage(&mut self, job_id: Uuid, name: &str, position: i32, role: StageRole) -> Uuid {
        let id = Uuid::new_v4();
        self.snapshot.stages.push(PipelineStage {
            id,
            job_id,
            name: name.to_string(),
            position,
            stage_role: role,
        });
        id
    }

    /// The standard five-stage pipeline used by most scenarios:
    /// Applied, Screening, Offer, Hired, Rejected.
    pub fn standard_pipeline(&mut self, job_id: Uuid) -> [Uuid; 5] {
        [
            self.add_stage(job_id, "Applied", 0, StageRole::Queue),
            self.add_stage(job_id, "Screening", 1, StageRole::Intermediate),
            self.add_stage(job_id, "Offer", 2, StageRole::Offer),
            self.add_stage(job_id, "Hired", 3, StageRole::Hired),
            self.add_stage(job_id, "Rejected", 4, StageRole::Rejected),
        ]
    }

    pub fn add_candidate(&mut self, name: &str, source: Option<&str>) -> Uuid {
        let id = Uuid::new_v4();
        self.snapshot.candidates.push(Candidate {
            id,
            company_id: self.company_id,
            name: name.to_string(),
            email: format!("{}@example.com", id),
            phone: None,
            experience_years: None,
            location: None,
            education: None,
            skills: None,
            salary_expectation: None,
            source: source.map(str::to_string),
            created_at: at(1, 0),
            updated_at: at(1, 0),
        });
        id
    }

    pub fn add_application(
        &mut self,
        job_id: Uuid,
        candidate_id: Uuid,
        current_stage_id: Uuid,
        applied_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.snapshot.applications.push(JobCandidate {
            id,
            job_id,
            candidate_id,
            current_stage_id,
            applied_at,
            updated_at,
        });
        id
    }

    pub fn closed_entry(
        &mut self,
        job_candidate_id: Uuid,
        stage_id: Uuid,
        stage_name: &str,
        entered_at: DateTime<Utc>,
        exited_at: DateTime<Utc>,
        comment: Option<&str>,
    ) {
        self.snapshot.history.push(StageHistoryEntry {
            id: Uuid::new_v4(),
            job_candidate_id,
            stage_id,
            stage_name: stage_name.to_string(),
            entered_at,
            exited_at: Some(exited_at),
            duration_hours: Some(duration_hours_between(entered_at, exited_at)),
            comment: comment.map(str::to_string),
            moved_by: None,
        });
    }

    pub fn open_entry(
        &mut self,
        job_candidate_id: Uuid,
        stage_id: Uuid,
        stage_name: &str,
        entered_at: DateTime<Utc>,
    ) {
        self.snapshot.history.push(StageHistoryEntry {
            id: Uuid::new_v4(),
            job_candidate_id,
            stage_id,
            stage_name: stage_name.to_string(),
            entered_at,
            exited_at: None,
            duration_hours: None,
            comment: None,
            moved_by: None,
        });
    }

    pub fn add_interview(
        &mut self,
        job_candidate_id: Uuid,
        scheduled_at: DateTime<Utc>,
        status: InterviewStatus,
        interviewer_ids: Vec<Uuid>,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.snapshot.interviews.push(Interview {
            id,
            job_candidate_id,
            scheduled_at,
            status,
            interviewer_ids,
            created_at: at(1, 0),
        });
        id
    }

    pub fn add_feedback(
        &mut self,
        interview_id: Uuid,
        panelist_id: Uuid,
        recommendation: Recommendation,
        submitted_at: DateTime<Utc>,
    ) {
        self.snapshot.feedback.push(InterviewFeedback {
            id: Uuid::new_v4(),
            interview_id,
            panelist_id,
            recommendation,
            comment: None,
            submitted_at,
        });
    }

    pub fn add_sla_config(&mut self, stage_name: &str, threshold_days: i32) {
        self.snapshot.sla_configs.push(SlaConfig {
            id: Uuid::new_v4(),
            company_id: self.company_id,
            stage_name: stage_name.to_string(),
            threshold_days,
        });
    }
}
