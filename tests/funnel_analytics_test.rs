mod common;

use ats_backend::analytics::conversion::conversion_rates;
use ats_backend::analytics::funnel::funnel_analytics;
use ats_backend::analytics::scope::ReportFilters;
use ats_backend::analytics::time_in_stage::time_in_stage;
use ats_backend::analytics::time_to_fill::time_to_fill;
use ats_backend::analytics::ScopeView;
use ats_backend::models::user::UserRole;

use common::{at, Fixture};

/// One job, three candidates:
/// - Ada: Applied (2 days) -> Screening (8 days) -> Hired on day 11.
/// - Bob: Applied (1 day) -> Screening, still there.
/// - Cleo: Applied, still there.
fn scenario() -> Fixture {
    let mut fx = Fixture::new();
    let job = fx.add_job("Backend Engineer", Some("Engineering"), None, at(1, 0));
    let [applied, screening, _offer, hired, _rejected] = fx.standard_pipeline(job);

    let ada = fx.add_candidate("Ada", Some("Referral"));
    let app_ada = fx.add_application(job, ada, hired, at(1, 0), at(11, 0));
    fx.closed_entry(app_ada, applied, "Applied", at(1, 0), at(3, 0), None);
    fx.closed_entry(app_ada, screening, "Screening", at(3, 0), at(11, 0), None);
    fx.open_entry(app_ada, hired, "Hired", at(11, 0));

    let bob = fx.add_candidate("Bob", Some("LinkedIn"));
    let app_bob = fx.add_application(job, bob, screening, at(2, 0), at(3, 0));
    fx.closed_entry(app_bob, applied, "Applied", at(2, 0), at(3, 0), None);
    fx.open_entry(app_bob, screening, "Screening", at(3, 0));

    let cleo = fx.add_candidate("Cleo", Some("LinkedIn"));
    let app_cleo = fx.add_application(job, cleo, applied, at(4, 0), at(4, 0));
    fx.open_entry(app_cleo, applied, "Applied", at(4, 0));

    fx
}

#[test]
fn funnel_counts_current_occupants_and_conserves_totals() {
    let fx = scenario();
    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let funnel = funnel_analytics(&view, &filters);
    assert_eq!(funnel.total_applicants, 3);
    assert_eq!(funnel.total_hired, 1);

    let count_sum: i64 = funnel.stages.iter().map(|s| s.count).sum();
    assert_eq!(count_sum, funnel.total_applicants);

    let by_name = |name: &str| {
        funnel
            .stages
            .iter()
            .find(|s| s.stage_name == name)
            .unwrap_or_else(|| panic!("stage {} missing", name))
    };
    assert_eq!(by_name("Applied").count, 1);
    assert_eq!(by_name("Screening").count, 1);
    assert_eq!(by_name("Hired").count, 1);
    assert_eq!(by_name("Rejected").count, 0);

    // 1 of 3 applicants hired.
    assert_eq!(funnel.overall_conversion_rate, 33.3);

    // Mean residency in Applied: Ada 2 days, Bob 1 day.
    assert_eq!(by_name("Applied").avg_days_in_stage, 1.5);
    assert_eq!(by_name("Screening").avg_days_in_stage, 8.0);
}

#[test]
fn funnel_percentages_stay_within_bounds() {
    let fx = scenario();
    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let funnel = funnel_analytics(&view, &filters);
    for stage in &funnel.stages {
        assert!((0.0..=100.0).contains(&stage.percentage), "{:?}", stage);
        if let Some(conv) = stage.conversion_to_next {
            assert!((0.0..=100.0).contains(&conv), "{:?}", stage);
        }
    }
    assert!(funnel.stages.last().expect("stages").conversion_to_next.is_none());
}

#[test]
fn conversion_follows_per_candidate_history_order() {
    let fx = scenario();
    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let rates = conversion_rates(&view, &filters);
    // Four consecutive pairs over five stages.
    assert_eq!(rates.len(), 4);

    let applied_to_screening = &rates[0];
    assert_eq!(applied_to_screening.from_stage, "Applied");
    assert_eq!(applied_to_screening.to_stage, "Screening");
    // All three entered Applied; Ada and Bob reached Screening afterwards.
    assert_eq!(applied_to_screening.candidates_entered, 3);
    assert_eq!(applied_to_screening.candidates_converted, 2);
    assert_eq!(applied_to_screening.conversion_rate, 66.7);

    for pair in &rates {
        assert!((0.0..=100.0).contains(&pair.conversion_rate));
        assert!(pair.candidates_converted <= pair.candidates_entered);
    }
}

#[test]
fn time_to_fill_uses_job_open_to_hire_timestamps() {
    let fx = scenario();
    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let report = time_to_fill(&view, &filters);
    // Job opened day 1, Ada hired day 11.
    assert_eq!(report.average_days, 10.0);
    assert_eq!(report.median_days, 10.0);
    assert_eq!(report.target_days, 30.0);

    assert_eq!(report.by_department.len(), 1);
    assert_eq!(report.by_department[0].department, "Engineering");
    assert_eq!(report.by_department[0].hires, 1);

    assert_eq!(report.by_job.len(), 1);
    assert!(!report.by_job[0].is_over_target);
}

#[test]
fn time_to_fill_is_zero_filled_without_hires() {
    let mut fx = Fixture::new();
    let job = fx.add_job("Designer", None, None, at(1, 0));
    let [applied, ..] = fx.standard_pipeline(job);
    let cand = fx.add_candidate("Solo", None);
    let app = fx.add_application(job, cand, applied, at(2, 0), at(2, 0));
    fx.open_entry(app, applied, "Applied", at(2, 0));

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let report = time_to_fill(&view, &filters);
    assert_eq!(report.average_days, 0.0);
    assert_eq!(report.median_days, 0.0);
    assert!(report.by_department.is_empty());
    assert!(report.by_job.is_empty());
}

#[test]
fn time_in_stage_ranks_stages_and_names_the_bottleneck() {
    let fx = scenario();
    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let report = time_in_stage(&view, &filters);
    // Only closed rows count: Screening 8 days beats Applied 1.5.
    assert_eq!(report.stages.len(), 2);
    assert_eq!(report.stages[0].stage_name, "Screening");
    assert_eq!(report.stages[0].average_days, 8.0);
    assert_eq!(report.stages[0].samples, 1);
    assert_eq!(report.stages[1].stage_name, "Applied");
    assert_eq!(report.stages[1].average_days, 1.5);
    assert_eq!(report.stages[1].samples, 2);

    assert_eq!(report.bottleneck_stage.as_deref(), Some("Screening"));
    // 7 < 8 <= 14 lands in the "could be optimized" tier.
    assert!(report.suggestion.contains("could be optimized"));
}

#[test]
fn bottleneck_suggestion_tiers_follow_severity() {
    let build = |days_in_screening: i64| {
        let mut fx = Fixture::new();
        let job = fx.add_job("Role", None, None, at(1, 0));
        let [applied, screening, ..] = fx.standard_pipeline(job);
        let cand = fx.add_candidate("C", None);
        let app = fx.add_application(job, cand, screening, at(1, 0), at(1, 0));
        fx.closed_entry(
            app,
            applied,
            "Screening",
            at(1, 0),
            at(1 + days_in_screening as u32, 0),
            None,
        );
        let actor = fx.actor(UserRole::Hr);
        let filters = ReportFilters::default();
        let snapshot = fx.snapshot.clone();
        let view = ScopeView::build(&snapshot, &actor, &filters);
        time_in_stage(&view, &filters).suggestion
    };

    assert!(build(2).contains("moving efficiently"));
    assert!(build(5).contains("Consider whether"));
    assert!(build(10).contains("could be optimized"));
    assert!(build(20).contains("significantly longer"));
}

#[test]
fn stage_names_group_case_insensitively_across_jobs() {
    let mut fx = Fixture::new();
    let job_a = fx.add_job("Role A", None, None, at(1, 0));
    let job_b = fx.add_job("Role B", None, None, at(1, 0));
    let applied_a = fx.add_stage(job_a, "Applied", 0, ats_backend::models::job::StageRole::Queue);
    let applied_b = fx.add_stage(job_b, "APPLIED", 0, ats_backend::models::job::StageRole::Queue);

    let c1 = fx.add_candidate("One", None);
    let c2 = fx.add_candidate("Two", None);
    let a1 = fx.add_application(job_a, c1, applied_a, at(2, 0), at(2, 0));
    let a2 = fx.add_application(job_b, c2, applied_b, at(2, 0), at(2, 0));
    fx.open_entry(a1, applied_a, "Applied", at(2, 0));
    fx.open_entry(a2, applied_b, "APPLIED", at(2, 0));

    let actor = fx.actor(UserRole::Hr);
    let filters = ReportFilters::default();
    let view = ScopeView::build(&fx.snapshot, &actor, &filters);

    let funnel = funnel_analytics(&view, &filters);
    assert_eq!(funnel.stages.len(), 1);
    // First-seen spelling wins.
    assert_eq!(funnel.stages[0].stage_name, "Applied");
    assert_eq!(funnel.stages[0].count, 2);
}
