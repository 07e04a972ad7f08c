use serde::Serialize;

use super::scope::ReportFilters;
use super::{percentage, stage_groups, ScopeView};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConversion {
    pub from_stage: String,
    pub to_stage: String,
    pub candidates_entered: i64,
    pub candidates_converted: i64,
    pub conversion_rate: f64,
}

/// Per-candidate funnel traversal between consecutive named stages: a
/// candidate converts from A to B when B first appears *later than* A in
/// their own history sequence, not merely when both are present. Manual
/// backward moves can therefore make this disagree with current-stage counts;
/// that mirrors the agreed product semantics and is left as is.
pub fn conversion_rates(view: &ScopeView<'_>, filters: &ReportFilters) -> Vec<StageConversion> {
    let groups = stage_groups(&view.stages);

    // Stage-name sequence per application, ascending by entered_at.
    let sequences: Vec<Vec<String>> = view
        .applications
        .iter()
        .map(|a| {
            view.history_by_application
                .get(&a.id)
                .map(|entries| {
                    entries
                        .iter()
                        .filter(|e| filters.within_window(e.entered_at))
                        .map(|e| e.stage_name.trim().to_lowercase())
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();

    groups
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let mut entered = 0usize;
            let mut converted = 0usize;
            for seq in &sequences {
                let Some(from_idx) = seq.iter().position(|name| *name == from.key) else {
                    continue;
                };
                entered += 1;
                if let Some(to_idx) = seq.iter().position(|name| *name == to.key) {
                    if to_idx > from_idx {
                        converted += 1;
                    }
                }
            }
            StageConversion {
                from_stage: from.name.clone(),
                to_stage: to.name.clone(),
                candidates_entered: entered as i64,
                candidates_converted: converted as i64,
                conversion_rate: percentage(converted, entered),
            }
        })
        .collect()
}
