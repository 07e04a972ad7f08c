mod common;

use ats_backend::analytics::dropoff::drop_off_analysis;
use ats_backend::analytics::kpi::kpi_metrics;
use ats_backend::analytics::offer::offer_acceptance;
use ats_backend::analytics::panel::panel_performance;
use ats_backend::analytics::recruiter::{productivity_score, recruiter_productivity};
use ats_backend::analytics::rejection_reasons::rejection_reasons;
use ats_backend::analytics::scope::ReportFilters;
use ats_backend::analytics::source::source_performance;
use ats_backend::analytics::ScopeView;
use ats_backend::models::interview::{InterviewStatus, Recommendation};
use ats_backend::models::job::JobStatus;
use ats_backend::models::user::UserRole;

use common::{at, Fixture};

#[test]
fn source_performance_buckets_and_ranks_by_hire_rate() {
    let mut fx = Fixture::new();
    let job = fx.add_job("Engineer", None, None, at(1, 0));
    let [applied, _, _, hired, _] = fx.standard_pipeline(job);

    // Referral: one candidate, hired after 4 days.
    let ref_cand = fx.add_candidate("R", Some("Referral"));
    fx.add_application(job, ref_cand, hired, at(1, 0), at(5, 0));

    // LinkedIn: two candidates, none hired.
    for name in ["L1", "L2"] {
        let c = fx.add_candidate(name, Some("LinkedIn"));
        fx.add_application(job, c, applied, at(2, 0), at(2, 0));
    }

    // No source recorded.
    let anon = fx.add_candidate("A", None);
    fx.add_application(job, anon, applied, at(3, 0), at(3, 0));

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let rows = source_performance(&view, &filters);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].source, "Referral");
    assert_eq!(rows[0].hires, 1);
    assert_eq!(rows[0].hire_rate, 100.0);
    assert_eq!(rows[0].avg_days_to_hire, 4.0);

    // Tied at zero hires, LinkedIn outranks Unknown on volume.
    assert_eq!(rows[1].source, "LinkedIn");
    assert_eq!(rows[1].count, 2);
    assert_eq!(rows[2].source, "Unknown");

    let pct_sum: f64 = rows.iter().map(|r| r.percentage).sum();
    assert!((pct_sum - 100.0).abs() < 0.2);
}

#[test]
fn offer_acceptance_counts_offer_and_hired_population() {
    let mut fx = Fixture::new();
    let job = fx.add_job("Engineer", Some("Engineering"), None, at(1, 0));
    let [applied, _, offer, hired, _] = fx.standard_pipeline(job);

    let accepted = fx.add_candidate("Accepted", None);
    fx.add_application(job, accepted, hired, at(1, 0), at(6, 0));
    let pending = fx.add_candidate("Pending", None);
    fx.add_application(job, pending, offer, at(2, 0), at(7, 0));
    let early = fx.add_candidate("Early", None);
    fx.add_application(job, early, applied, at(3, 0), at(3, 0));

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let report = offer_acceptance(&view, &filters);
    assert_eq!(report.offers, 2);
    assert_eq!(report.accepted, 1);
    assert_eq!(report.overall_rate, 50.0);

    assert_eq!(report.by_role.len(), 1);
    assert_eq!(report.by_role[0].rate, 50.0);
    // 50% sits under the 70% threshold.
    assert!(report.by_role[0].is_under_threshold);
    assert_eq!(report.by_department[0].department, "Engineering");
}

#[test]
fn drop_off_counts_departures_against_everyone_who_reached_the_stage() {
    let mut fx = Fixture::new();
    let job = fx.add_job("Engineer", None, None, at(1, 0));
    let [applied, screening, _, _, rejected] = fx.standard_pipeline(job);

    // Two candidates leave Applied; one of them is then rejected out of
    // Screening, the other still sits there. A third never left Applied.
    let c1 = fx.add_candidate("C1", None);
    let a1 = fx.add_application(job, c1, rejected, at(1, 0), at(5, 0));
    fx.closed_entry(a1, applied, "Applied", at(1, 0), at(2, 0), None);
    fx.closed_entry(a1, screening, "Screening", at(2, 0), at(5, 0), Some("skill gap"));
    fx.open_entry(a1, rejected, "Rejected", at(5, 0));

    let c2 = fx.add_candidate("C2", None);
    let a2 = fx.add_application(job, c2, screening, at(1, 0), at(3, 0));
    fx.closed_entry(a2, applied, "Applied", at(1, 0), at(3, 0), None);
    fx.open_entry(a2, screening, "Screening", at(3, 0));

    let c3 = fx.add_candidate("C3", None);
    let a3 = fx.add_application(job, c3, applied, at(4, 0), at(4, 0));
    fx.open_entry(a3, applied, "Applied", at(4, 0));

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let report = drop_off_analysis(&view, &filters);
    let by_name = |name: &str| {
        report
            .stages
            .iter()
            .find(|s| s.stage_name == name)
            .unwrap_or_else(|| panic!("stage {} missing", name))
    };

    // Applied: 2 departures over 3 who reached it.
    assert_eq!(by_name("Applied").drop_off_count, 2);
    assert_eq!(by_name("Applied").drop_off_percentage, 66.7);
    // Screening: 1 departure over 2 who reached it.
    assert_eq!(by_name("Screening").drop_off_count, 1);
    assert_eq!(by_name("Screening").drop_off_percentage, 50.0);

    assert_eq!(report.highest_drop_off_stage.as_deref(), Some("Applied"));
    for stage in &report.stages {
        assert!((0.0..=100.0).contains(&stage.drop_off_percentage));
    }
}

#[test]
fn rejection_reasons_mine_ledger_comments_of_rejected_candidates() {
    let mut fx = Fixture::new();
    let job = fx.add_job("Engineer", None, None, at(1, 0));
    let [applied, screening, _, _, rejected] = fx.standard_pipeline(job);

    let make_rejected = |fx: &mut Fixture, name: &str, comment: &str| {
        let c = fx.add_candidate(name, None);
        let app = fx.add_application(job, c, rejected, at(1, 0), at(4, 0));
        fx.closed_entry(app, applied, "Applied", at(1, 0), at(2, 0), None);
        fx.closed_entry(app, screening, "Screening", at(2, 0), at(4, 0), Some(comment));
        fx.open_entry(app, rejected, "Rejected", at(4, 0));
    };
    make_rejected(&mut fx, "R1", "lacking technical depth");
    make_rejected(&mut fx, "R2", "salary expectations above budget");
    make_rejected(&mut fx, "R3", "too long a notice period");

    // A non-rejected candidate's comments never count.
    let c = fx.add_candidate("Active", None);
    let app = fx.add_application(job, c, screening, at(1, 0), at(2, 0));
    fx.closed_entry(app, applied, "Applied", at(1, 0), at(2, 0), Some("skill note"));
    fx.open_entry(app, screening, "Screening", at(2, 0));

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let report = rejection_reasons(&view, &filters);
    assert_eq!(report.total_rejections, 3);
    assert_eq!(report.categories.len(), 4);

    let by_cat = |name: &str| {
        report
            .categories
            .iter()
            .find(|c| c.category == name)
            .unwrap_or_else(|| panic!("category {} missing", name))
    };
    assert_eq!(by_cat("Skill mismatch").count, 1);
    assert_eq!(by_cat("Compensation mismatch").count, 1);
    assert_eq!(by_cat("Location/notice/other").count, 1);
    assert_eq!(report.most_rejections_stage.as_deref(), Some("Screening"));

    // Colors are stable per category position.
    assert_eq!(by_cat("Skill mismatch").color, "#3B82F6");
}

#[test]
fn productivity_score_components_are_capped() {
    // Hires cap at 40 regardless of volume; beating the 30-day target earns
    // extra time credit (30 + 20 * 0.5 here).
    assert_eq!(productivity_score(10, 0, 0, 10.0), 40.0 + 40.0);
    // Interview efficiency caps at 30.
    assert_eq!(productivity_score(0, 50, 10, 0.0), 30.0);
    // Slow filling erodes the time component down to zero.
    assert_eq!(productivity_score(1, 0, 0, 100.0), 10.0);
    // On-target filling earns the full 30.
    assert_eq!(productivity_score(1, 0, 0, 30.0), 40.0);
    // No hires, no activity.
    assert_eq!(productivity_score(0, 0, 0, 0.0), 0.0);
}

#[test]
fn recruiter_report_restricts_recruiters_to_their_own_row() {
    let mut fx = Fixture::new();
    let alice = fx.add_user("Alice", UserRole::Recruiter);
    let bjorn = fx.add_user("Bjorn", UserRole::Recruiter);

    let job_a = fx.add_job("Role A", Some("Engineering"), Some(alice), at(1, 0));
    let [applied_a, _, _, hired_a, _] = fx.standard_pipeline(job_a);
    let job_b = fx.add_job("Role B", Some("Sales"), Some(bjorn), at(1, 0));
    let [applied_b, ..] = fx.standard_pipeline(job_b);

    let c1 = fx.add_candidate("C1", None);
    let app1 = fx.add_application(job_a, c1, hired_a, at(1, 0), at(11, 0));
    fx.add_interview(app1, at(5, 0), InterviewStatus::Completed, vec![alice]);
    let c2 = fx.add_candidate("C2", None);
    fx.add_application(job_a, c2, applied_a, at(2, 0), at(2, 0));
    let c3 = fx.add_candidate("C3", None);
    fx.add_application(job_b, c3, applied_b, at(2, 0), at(2, 0));

    let filters = ReportFilters::default();

    // HR sees both recruiters, ranked by score.
    let hr = fx.actor(UserRole::Hr);
    let view = ScopeView::build(&fx.snapshot, &hr, &filters);
    let rows = recruiter_productivity(&view, &hr, &filters);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Alice");
    assert_eq!(rows[0].hires, 1);
    assert_eq!(rows[0].cvs_added, 2);
    assert_eq!(rows[0].specialty, "Engineering");
    assert!(rows[0].productivity_score > rows[1].productivity_score);

    // A recruiter sees only themselves.
    let as_alice = fx.actor_as(alice, UserRole::Recruiter);
    let view = ScopeView::build(&fx.snapshot, &as_alice, &filters);
    let rows = recruiter_productivity(&view, &as_alice, &filters);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].recruiter_id, alice);
}

#[test]
fn panel_performance_tracks_rounds_offers_and_feedback_latency() {
    let mut fx = Fixture::new();
    let lena = fx.add_user("Lena", UserRole::Interviewer);
    let marc = fx.add_user("Marc", UserRole::Interviewer);

    let job = fx.add_job("Engineer", None, None, at(1, 0));
    let [applied, _, offer, _, _] = fx.standard_pipeline(job);

    // Lena interviews a candidate who reaches offer; feedback lands 6 hours
    // after the slot.
    let c1 = fx.add_candidate("C1", None);
    let app1 = fx.add_application(job, c1, offer, at(1, 0), at(8, 0));
    let iv1 = fx.add_interview(app1, at(5, 9), InterviewStatus::Completed, vec![lena, marc]);
    fx.add_feedback(iv1, lena, Recommendation::Hire, at(5, 15));

    // Marc also interviews a candidate who stays early-stage and files a
    // strong-no-hire.
    let c2 = fx.add_candidate("C2", None);
    let app2 = fx.add_application(job, c2, applied, at(2, 0), at(2, 0));
    let iv2 = fx.add_interview(app2, at(6, 10), InterviewStatus::Completed, vec![marc]);
    fx.add_feedback(iv2, marc, Recommendation::StrongNoHire, at(6, 12));

    // Cancelled interviews count for nobody.
    fx.add_interview(app2, at(7, 10), InterviewStatus::Cancelled, vec![lena]);

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let rows = panel_performance(&view, &filters);
    assert_eq!(rows.len(), 2);

    // Lena: 1 completed round, 1 reached offer.
    assert_eq!(rows[0].name, "Lena");
    assert_eq!(rows[0].interview_rounds, 1);
    assert_eq!(rows[0].offers, 1);
    assert_eq!(rows[0].offer_percentage, 100.0);
    assert_eq!(rows[0].avg_feedback_hours, 6.0);
    assert!(rows[0].top_rejection_reason.is_none());

    // Marc: 2 rounds, 1 reached offer, one strong-no-hire on record.
    assert_eq!(rows[1].name, "Marc");
    assert_eq!(rows[1].interview_rounds, 2);
    assert_eq!(rows[1].offers, 1);
    assert_eq!(rows[1].offer_percentage, 50.0);
    assert_eq!(
        rows[1].top_rejection_reason.as_deref(),
        Some("Fundamental skill mismatch")
    );
}

#[test]
fn kpi_metrics_compose_the_headline_numbers() {
    let mut fx = Fixture::new();
    let job_active = fx.add_job("Engineer", None, None, at(1, 0));
    let [applied, _, offer, hired, rejected] = fx.standard_pipeline(job_active);
    let job_closed = fx.add_job("Old Role", None, None, at(1, 0));
    fx.set_job_status(job_closed, JobStatus::Closed);
    fx.standard_pipeline(job_closed);

    let c1 = fx.add_candidate("Hired", None);
    fx.add_application(job_active, c1, hired, at(1, 0), at(11, 0));
    let c2 = fx.add_candidate("InOffer", None);
    fx.add_application(job_active, c2, offer, at(2, 0), at(9, 0));
    let c3 = fx.add_candidate("Active", None);
    fx.add_application(job_active, c3, applied, at(3, 0), at(3, 0));
    let c4 = fx.add_candidate("Gone", None);
    fx.add_application(job_active, c4, rejected, at(3, 0), at(6, 0));

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let kpi = kpi_metrics(&view, &filters, at(15, 12));
    assert_eq!(kpi.active_roles, 1);
    // In-offer and applied count as active; hired and rejected do not.
    assert_eq!(kpi.active_candidates, 2);
    assert_eq!(kpi.candidates_in_offer, 1);
    assert_eq!(kpi.hired_candidates, 1);
    assert_eq!(kpi.avg_time_to_fill, 10.0);
    // Offer population: hired + in-offer.
    assert_eq!(kpi.offer_acceptance_rate, 50.0);
    assert_eq!(kpi.sla_summary.total_roles, 1);
}
