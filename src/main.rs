use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use ats_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let analytics_api = Router::new()
        .route("/api/analytics/kpi", get(routes::analytics::get_kpi_metrics))
        .route(
            "/api/analytics/funnel",
            get(routes::analytics::get_funnel_analytics),
        )
        .route(
            "/api/analytics/conversion-rates",
            get(routes::analytics::get_conversion_rates),
        )
        .route(
            "/api/analytics/time-to-fill",
            get(routes::analytics::get_time_to_fill),
        )
        .route(
            "/api/analytics/time-in-stage",
            get(routes::analytics::get_time_in_stage),
        )
        .route(
            "/api/analytics/sources",
            get(routes::analytics::get_source_performance),
        )
        .route(
            "/api/analytics/recruiters",
            get(routes::analytics::get_recruiter_productivity),
        )
        .route(
            "/api/analytics/panel",
            get(routes::analytics::get_panel_performance),
        )
        .route(
            "/api/analytics/drop-off",
            get(routes::analytics::get_drop_off_analysis),
        )
        .route(
            "/api/analytics/rejection-reasons",
            get(routes::analytics::get_rejection_reasons),
        )
        .route(
            "/api/analytics/offer-acceptance",
            get(routes::analytics::get_offer_acceptance_rate),
        )
        .route("/api/analytics/sla", get(routes::analytics::get_sla_status))
        .route(
            "/api/analytics/export",
            get(routes::analytics::export_pipeline_report),
        );

    let pipeline_api = Router::new()
        .route(
            "/api/pipeline/applications",
            post(routes::pipeline::submit_application),
        )
        .route(
            "/api/pipeline/applications/bulk",
            post(routes::pipeline::bulk_submit),
        )
        .route(
            "/api/pipeline/applications/:id/move",
            post(routes::pipeline::move_candidate_stage),
        )
        .route(
            "/api/pipeline/applications/:id/history",
            get(routes::pipeline::get_stage_history),
        )
        .route(
            "/api/pipeline/applications/:id/current-stage",
            get(routes::pipeline::get_current_stage_entry),
        )
        .route(
            "/api/pipeline/candidates/:id/history",
            get(routes::pipeline::get_candidate_stage_history),
        )
        .route(
            "/api/pipeline/candidates/:id/timeline",
            get(routes::pipeline::get_candidate_timeline),
        )
        .route(
            "/api/pipeline/jobs/:id/rules",
            get(routes::pipeline::get_rejection_rules)
                .put(routes::pipeline::update_rejection_rules),
        );

    let authed_api = analytics_api
        .merge(pipeline_api)
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            ats_backend::middleware::auth::require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            ats_backend::middleware::rate_limit::RequestBudget::new(config.api_rps),
            ats_backend::middleware::rate_limit::throttle_middleware,
        ));

    let app = base_routes
        .merge(authed_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
