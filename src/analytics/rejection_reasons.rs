use std::collections::HashMap;

use serde::Serialize;

use super::scope::ReportFilters;
use super::{percentage, ScopeView};
use crate::models::job::StageRole;

/// Fixed category order; the palette is assigned by index.
const CATEGORIES: [(&str, &[&str]); 3] = [
    (
        "Skill mismatch",
        &["skill", "experience", "technical", "qualif"],
    ),
    (
        "Compensation mismatch",
        &["salary", "compensation", "pay", "budget"],
    ),
    ("Culture fit", &["culture", "fit", "team", "attitude"]),
];

const DEFAULT_CATEGORY: &str = "Location/notice/other";

const PALETTE: [&str; 4] = ["#3B82F6", "#F59E0B", "#8B5CF6", "#EF4444"];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionCategory {
    pub category: String,
    pub count: i64,
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReasonReport {
    pub categories: Vec<RejectionCategory>,
    pub total_rejections: i64,
    /// Stage name that produced the most rejection comments.
    pub most_rejections_stage: Option<String>,
}

/// Keyword-bucketing of free-text close comments on the ledger rows of
/// currently-rejected candidates. Unmatched text falls into the
/// location/notice/other bucket.
pub fn rejection_reasons(view: &ScopeView<'_>, filters: &ReportFilters) -> RejectionReasonReport {
    let mut counts = [0usize; 4];
    let mut per_stage: HashMap<String, usize> = HashMap::new();
    let mut total = 0usize;

    for app in &view.applications {
        if view.current_role(app) != Some(StageRole::Rejected) {
            continue;
        }
        let Some(entries) = view.history_by_application.get(&app.id) else {
            continue;
        };
        for entry in entries {
            if entry.exited_at.is_none() || !filters.within_window(entry.entered_at) {
                continue;
            }
            let Some(comment) = entry.comment.as_deref().map(str::trim) else {
                continue;
            };
            if comment.is_empty() {
                continue;
            }
            counts[categorize(comment)] += 1;
            total += 1;
            *per_stage
                .entry(entry.stage_name.trim().to_string())
                .or_insert(0) += 1;
        }
    }

    let categories = CATEGORIES
        .iter()
        .map(|(name, _)| *name)
        .chain(std::iter::once(DEFAULT_CATEGORY))
        .enumerate()
        .map(|(i, category)| RejectionCategory {
            category: category.to_string(),
            count: counts[i] as i64,
            percentage: percentage(counts[i], total),
            color: PALETTE[i].to_string(),
        })
        .collect();

    let most_rejections_stage = per_stage
        .into_iter()
        .max_by_key(|(_, n)| *n)
        .map(|(stage, _)| stage);

    RejectionReasonReport {
        categories,
        total_rejections: total as i64,
        most_rejections_stage,
    }
}

fn categorize(comment: &str) -> usize {
    let lowered = comment.to_lowercase();
    for (i, (_, keywords)) in CATEGORIES.iter().enumerate() {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return i;
        }
    }
    CATEGORIES.len()
}
