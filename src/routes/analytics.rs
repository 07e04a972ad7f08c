use axum::{
    extract::{Extension, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use crate::{
    analytics::{
        funnel::funnel_analytics, kpi::kpi_metrics, source::source_performance,
        time_to_fill::time_to_fill, ScopeView,
    },
    dto::analytics_dto::AnalyticsQuery,
    error::Result,
    middleware::auth::Claims,
    services::analytics_service::load_company_snapshot,
    services::export_service::ExportService,
    utils::time,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/analytics/kpi",
    responses(
        (status = 200, description = "Dashboard KPI metrics"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_kpi_metrics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_kpi_metrics(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/funnel",
    responses(
        (status = 200, description = "Per-stage funnel breakdown"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_funnel_analytics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_funnel_analytics(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/conversion-rates",
    responses(
        (status = 200, description = "Stage-to-stage conversion rates"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_conversion_rates(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_conversion_rates(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/time-to-fill",
    responses(
        (status = 200, description = "Time-to-fill aggregates"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_time_to_fill(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_time_to_fill(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/time-in-stage",
    responses(
        (status = 200, description = "Average dwell time per stage"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_time_in_stage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_time_in_stage(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/sources",
    responses(
        (status = 200, description = "Candidate source performance"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_source_performance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_source_performance(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/recruiters",
    responses(
        (status = 200, description = "Recruiter productivity scores"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_recruiter_productivity(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_recruiter_productivity(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/panel",
    responses(
        (status = 200, description = "Interview panel performance"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_panel_performance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_panel_performance(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/drop-off",
    responses(
        (status = 200, description = "Per-stage drop-off analysis"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_drop_off_analysis(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_drop_off_analysis(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/rejection-reasons",
    responses(
        (status = 200, description = "Categorised rejection reasons"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_rejection_reasons(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_rejection_reasons(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/offer-acceptance",
    responses(
        (status = 200, description = "Offer acceptance rates"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_offer_acceptance_rate(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .analytics_service
        .get_offer_acceptance_rate(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

#[utoipa::path(
    get,
    path = "/api/analytics/sla",
    responses(
        (status = 200, description = "Per-job SLA status rows"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn get_sla_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let report = state
        .sla_service
        .get_sla_status_summary(claims.actor(), filters)
        .await?;
    Ok(Json(report))
}

/// Export the dashboard as XLSX. The snapshot is loaded once and the four
/// sheet sources are computed over the same scoped view.
#[utoipa::path(
    get,
    path = "/api/analytics/export",
    responses(
        (status = 200, description = "XLSX workbook"),
        (status = 400, description = "Invalid filter")
    )
)]
#[axum::debug_handler]
pub async fn export_pipeline_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    let filters = query.into_filters()?;
    let actor = claims.actor();
    let snapshot = load_company_snapshot(&state.pool, actor.company_id).await?;
    let view = ScopeView::build(&snapshot, &actor, &filters);

    let generated_at = time::now();
    let kpi = kpi_metrics(&view, &filters, generated_at);
    let funnel = funnel_analytics(&view, &filters);
    let ttf = time_to_fill(&view, &filters);
    let sources = source_performance(&view, &filters);

    let buffer = ExportService::generate_pipeline_report_xlsx(&kpi, &funnel, &ttf, &sources)?;
    let filename = format!("pipeline_report_{}.xlsx", time::day_stamp(generated_at));
    let disposition = format!("attachment; filename=\"{}\"", filename);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}
