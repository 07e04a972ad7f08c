use std::collections::HashMap;

use serde::Serialize;

use super::scope::ReportFilters;
use super::{days_between_clamped, mean, percentage, round1, ScopeView};
use crate::models::job::StageRole;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePerformance {
    pub source: String,
    pub count: i64,
    pub percentage: f64,
    pub hires: i64,
    pub hire_rate: f64,
    pub avg_days_to_hire: f64,
}

/// Candidate counts, hire rates and mean days-to-hire per acquisition source,
/// ranked by hire rate. Candidates without a recorded source land in the
/// "Unknown" bucket; sources with no candidates in scope never appear.
pub fn source_performance(view: &ScopeView<'_>, filters: &ReportFilters) -> Vec<SourcePerformance> {
    // source -> (count, hire day samples)
    let mut buckets: HashMap<String, (usize, Vec<f64>)> = HashMap::new();
    let mut total = 0usize;

    for app in &view.applications {
        if !filters.within_window(app.applied_at) {
            continue;
        }
        total += 1;
        let source = view
            .candidate_by_id
            .get(&app.candidate_id)
            .and_then(|c| c.source.clone())
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Unknown".to_string());
        let bucket = buckets.entry(source).or_insert((0, Vec::new()));
        bucket.0 += 1;
        if view.current_role(app) == Some(StageRole::Hired) {
            bucket
                .1
                .push(days_between_clamped(app.applied_at, app.updated_at));
        }
    }

    let mut rows: Vec<SourcePerformance> = buckets
        .into_iter()
        .map(|(source, (count, hire_days))| SourcePerformance {
            source,
            count: count as i64,
            percentage: percentage(count, total),
            hires: hire_days.len() as i64,
            hire_rate: percentage(hire_days.len(), count),
            avg_days_to_hire: round1(mean(&hire_days)),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.hire_rate
            .partial_cmp(&a.hire_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
    });
    rows
}
