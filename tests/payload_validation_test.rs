use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use ats_backend::dto::pipeline_dto::{BulkSubmitPayload, BulkSubmitRow, MoveStagePayload};

fn row() -> BulkSubmitRow {
    BulkSubmitRow {
        job_id: Uuid::new_v4(),
        candidate_id: Uuid::new_v4(),
    }
}

#[test]
fn bulk_payload_validates_batch_bounds() {
    let empty = BulkSubmitPayload {
        applications: vec![],
    };
    assert!(empty.validate().is_err());

    let single = BulkSubmitPayload {
        applications: vec![row()],
    };
    assert!(single.validate().is_ok());

    let oversized = BulkSubmitPayload {
        applications: (0..501).map(|_| row()).collect(),
    };
    assert!(oversized.validate().is_err());
}

#[test]
fn bulk_payload_accepts_camel_case_rows() {
    let job_id = Uuid::new_v4();
    let candidate_id = Uuid::new_v4();
    let body = json!({
        "applications": [{ "jobId": job_id, "candidateId": candidate_id }]
    });

    let payload: BulkSubmitPayload = serde_json::from_value(body).unwrap();
    assert_eq!(payload.applications.len(), 1);
    assert_eq!(payload.applications[0].job_id, job_id);
    assert_eq!(payload.applications[0].candidate_id, candidate_id);
    assert!(payload.validate().is_ok());
}

#[test]
fn move_payload_rejects_oversized_comment() {
    let payload = MoveStagePayload {
        to_stage_id: Uuid::new_v4(),
        comment: Some("x".repeat(2001)),
    };
    assert!(payload.validate().is_err());

    let payload = MoveStagePayload {
        to_stage_id: Uuid::new_v4(),
        comment: Some("Looked strong in the screen".to_string()),
    };
    assert!(payload.validate().is_ok());
}
