use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::rules::AutoRejectionRules;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveStagePayload {
    pub to_stage_id: Uuid,
    #[validate(length(max = 2000, message = "Comment is too long"))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationPayload {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkSubmitPayload {
    #[validate(length(min = 1, max = 500, message = "Batch must hold 1 to 500 rows"))]
    pub applications: Vec<BulkSubmitRow>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSubmitRow {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRulesPayload {
    pub auto_rejection_rules: AutoRejectionRules,
}
