use std::collections::HashMap;

use serde::Serialize;

use super::scope::ReportFilters;
use super::{mean, round1, ScopeView};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTime {
    pub stage_name: String,
    pub average_days: f64,
    pub samples: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInStageReport {
    /// Sorted descending by mean residency.
    pub stages: Vec<StageTime>,
    pub bottleneck_stage: Option<String>,
    pub suggestion: String,
}

/// Mean residency per stage name from closed ledger rows; the bottleneck is
/// the name with the largest mean.
pub fn time_in_stage(view: &ScopeView<'_>, filters: &ReportFilters) -> TimeInStageReport {
    // key -> (display name, day samples)
    let mut buckets: HashMap<String, (String, Vec<f64>)> = HashMap::new();
    for entry in view.scoped_history() {
        if entry.exited_at.is_none() || !filters.within_window(entry.entered_at) {
            continue;
        }
        let Some(hours) = entry.duration_hours else {
            continue;
        };
        let key = entry.stage_name.trim().to_lowercase();
        buckets
            .entry(key)
            .or_insert_with(|| (entry.stage_name.trim().to_string(), Vec::new()))
            .1
            .push(hours / 24.0);
    }

    let mut stages: Vec<StageTime> = buckets
        .into_values()
        .map(|(stage_name, days)| StageTime {
            samples: days.len() as i64,
            average_days: round1(mean(&days)),
            stage_name,
        })
        .collect();
    stages.sort_by(|a, b| {
        b.average_days
            .partial_cmp(&a.average_days)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let bottleneck = stages.first().cloned();
    let suggestion = match &bottleneck {
        Some(stage) => bottleneck_suggestion(&stage.stage_name, stage.average_days),
        None => "Candidates are moving efficiently through the pipeline.".to_string(),
    };

    TimeInStageReport {
        stages,
        bottleneck_stage: bottleneck.map(|s| s.stage_name),
        suggestion,
    }
}

fn bottleneck_suggestion(stage_name: &str, days: f64) -> String {
    if days > 14.0 {
        format!(
            "Candidates spend significantly longer in {} ({} days on average) than in other stages. Streamline this step to speed up the pipeline.",
            stage_name, days
        )
    } else if days > 7.0 {
        format!(
            "The {} stage averages {} days and could be optimized to shorten time to hire.",
            stage_name, days
        )
    } else if days > 3.0 {
        format!(
            "Consider whether the {} timeline ({} days on average) can be reduced.",
            stage_name, days
        )
    } else {
        "Candidates are moving efficiently through the pipeline.".to_string()
    }
}
