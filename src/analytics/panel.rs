use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use super::scope::ReportFilters;
use super::{mean, percentage, round1, ScopeView};
use crate::models::interview::{Interview, InterviewStatus, Recommendation};
use crate::models::job::StageRole;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelMemberPerformance {
    pub user_id: Uuid,
    pub name: String,
    pub interview_rounds: i64,
    /// Distinct interviewed candidates currently in an offer- or hired-role
    /// stage.
    pub offers: i64,
    pub offer_percentage: f64,
    pub top_rejection_reason: Option<String>,
    /// Mean hours between the interview slot and feedback submission.
    pub avg_feedback_hours: f64,
}

/// Interview outcomes per panel member, ranked by how often their candidates
/// reach offer.
pub fn panel_performance(
    view: &ScopeView<'_>,
    filters: &ReportFilters,
) -> Vec<PanelMemberPerformance> {
    let interviews: Vec<&Interview> = view
        .scoped_interviews()
        .filter(|i| filters.within_window(i.scheduled_at))
        .collect();
    let interview_by_id: HashMap<Uuid, &Interview> =
        interviews.iter().map(|i| (i.id, *i)).collect();

    let mut members: Vec<Uuid> = Vec::new();
    for interview in &interviews {
        for id in &interview.interviewer_ids {
            if !members.contains(id) {
                members.push(*id);
            }
        }
    }

    let mut rows: Vec<PanelMemberPerformance> = members
        .into_iter()
        .map(|member| {
            let completed: Vec<&&Interview> = interviews
                .iter()
                .filter(|i| {
                    i.status == InterviewStatus::Completed && i.interviewer_ids.contains(&member)
                })
                .collect();

            let reached_offer: HashSet<Uuid> = completed
                .iter()
                .filter_map(|i| view.application(i.job_candidate_id))
                .filter(|a| {
                    matches!(
                        view.current_role(a),
                        Some(StageRole::Offer) | Some(StageRole::Hired)
                    )
                })
                .map(|a| a.id)
                .collect();

            let feedback: Vec<_> = view
                .snapshot
                .feedback
                .iter()
                .filter(|f| f.panelist_id == member && interview_by_id.contains_key(&f.interview_id))
                .collect();

            let latencies: Vec<f64> = feedback
                .iter()
                .filter_map(|f| {
                    let interview = interview_by_id.get(&f.interview_id)?;
                    Some((f.submitted_at - interview.scheduled_at).num_milliseconds() as f64
                        / 3_600_000.0)
                })
                .collect();

            let mut reason_counts: HashMap<&'static str, usize> = HashMap::new();
            for f in &feedback {
                if let Some(label) = rejection_label(f.recommendation) {
                    *reason_counts.entry(label).or_insert(0) += 1;
                }
            }
            let top_rejection_reason = reason_counts
                .into_iter()
                .max_by_key(|(_, n)| *n)
                .map(|(label, _)| label.to_string());

            PanelMemberPerformance {
                user_id: member,
                name: view
                    .user_by_id
                    .get(&member)
                    .map(|u| u.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                interview_rounds: completed.len() as i64,
                offers: reached_offer.len() as i64,
                offer_percentage: percentage(reached_offer.len(), completed.len()),
                top_rejection_reason,
                avg_feedback_hours: round1(mean(&latencies)),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.offer_percentage
            .partial_cmp(&a.offer_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.interview_rounds.cmp(&a.interview_rounds))
    });
    rows
}

/// Coarse label for negative recommendations, used for the "top rejection
/// reason" column.
fn rejection_label(recommendation: Recommendation) -> Option<&'static str> {
    match recommendation {
        Recommendation::StrongNoHire => Some("Fundamental skill mismatch"),
        Recommendation::NoHire => Some("Not a fit for the role"),
        _ => None,
    }
}
