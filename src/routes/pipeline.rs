use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::pipeline_dto::{
        BulkSubmitPayload, MoveStagePayload, SubmitApplicationPayload, UpdateRulesPayload,
    },
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/pipeline/applications",
    request_body = SubmitApplicationPayload,
    responses(
        (status = 201, description = "Application created"),
        (status = 400, description = "Duplicate application or job has no queue stage"),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Json(payload): Json<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let outcome = state
        .pipeline_service
        .submit_application(payload.job_id, payload.candidate_id)
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[utoipa::path(
    post,
    path = "/api/pipeline/applications/bulk",
    request_body = BulkSubmitPayload,
    responses(
        (status = 200, description = "Per-row outcome of the batch"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn bulk_submit(
    State(state): State<AppState>,
    Json(payload): Json<BulkSubmitPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let rows: Vec<(Uuid, Uuid)> = payload
        .applications
        .iter()
        .map(|row| (row.job_id, row.candidate_id))
        .collect();
    let outcome = state.pipeline_service.bulk_submit(&rows).await;
    Ok(Json(outcome))
}

#[utoipa::path(
    post,
    path = "/api/pipeline/applications/{id}/move",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = MoveStagePayload,
    responses(
        (status = 200, description = "Application moved"),
        (status = 400, description = "Stage belongs to a different job"),
        (status = 404, description = "Application or stage not found")
    )
)]
#[axum::debug_handler]
pub async fn move_candidate_stage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MoveStagePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let updated = state
        .pipeline_service
        .move_candidate_stage(id, payload.to_stage_id, payload.comment.as_deref(), Some(claims.sub))
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/api/pipeline/applications/{id}/history",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Ledger entries, oldest first"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_stage_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let entries = state.stage_history_service.get_stage_history(id).await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/pipeline/applications/{id}/current-stage",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Open ledger entry, if any")
    )
)]
#[axum::debug_handler]
pub async fn get_current_stage_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let entry = state.stage_history_service.get_current_stage_entry(id).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    get,
    path = "/api/pipeline/candidates/{id}/history",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Ledger entries across the candidate's applications")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate_stage_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let entries = state
        .stage_history_service
        .get_stage_history_by_candidate_id(id)
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/pipeline/candidates/{id}/timeline",
    params(
        ("id" = Uuid, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Activity records, newest first")
    )
)]
#[axum::debug_handler]
pub async fn get_candidate_timeline(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let activities = state.activity_service.timeline(id).await?;
    Ok(Json(activities))
}

#[utoipa::path(
    get,
    path = "/api/pipeline/jobs/{id}/rules",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Auto-rejection rule set, null when unset"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn get_rejection_rules(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let rules = state.pipeline_service.get_rules(id).await?;
    Ok(Json(json!({ "autoRejectionRules": rules })))
}

#[utoipa::path(
    put,
    path = "/api/pipeline/jobs/{id}/rules",
    params(
        ("id" = Uuid, Path, description = "Job ID")
    ),
    request_body = UpdateRulesPayload,
    responses(
        (status = 204, description = "Rules replaced"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn update_rejection_rules(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRulesPayload>,
) -> Result<impl IntoResponse> {
    state
        .pipeline_service
        .update_rules(id, &payload.auto_rejection_rules)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
