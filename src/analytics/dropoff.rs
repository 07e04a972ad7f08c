use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use super::scope::ReportFilters;
use super::{percentage, stage_groups, ScopeView};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDropOff {
    pub stage_name: String,
    /// Ledger rows closed while in this stage, i.e. departures.
    pub drop_off_count: i64,
    /// Departures over distinct candidates who ever reached the stage.
    pub drop_off_percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOffAnalysis {
    pub stages: Vec<StageDropOff>,
    pub highest_drop_off_stage: Option<String>,
}

pub fn drop_off_analysis(view: &ScopeView<'_>, filters: &ReportFilters) -> DropOffAnalysis {
    let groups = stage_groups(&view.stages);

    let stages: Vec<StageDropOff> = groups
        .iter()
        .map(|group| {
            let drop_offs = view
                .scoped_history()
                .filter(|e| {
                    e.exited_at.is_some()
                        && e.stage_name.trim().to_lowercase() == group.key
                        && filters.within_window(e.entered_at)
                })
                .count();

            // Everyone who ever reached the stage: history union current
            // residency.
            let mut reached: HashSet<Uuid> = view
                .scoped_history()
                .filter(|e| e.stage_name.trim().to_lowercase() == group.key)
                .map(|e| e.job_candidate_id)
                .collect();
            for app in &view.applications {
                if group.stage_ids.contains(&app.current_stage_id) {
                    reached.insert(app.id);
                }
            }

            StageDropOff {
                stage_name: group.name.clone(),
                drop_off_count: drop_offs as i64,
                drop_off_percentage: percentage(drop_offs, reached.len()).min(100.0),
            }
        })
        .collect();

    let highest_drop_off_stage = stages
        .iter()
        .max_by(|a, b| {
            a.drop_off_percentage
                .partial_cmp(&b.drop_off_percentage)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|s| s.stage_name.clone());

    DropOffAnalysis {
        stages,
        highest_drop_off_stage,
    }
}
