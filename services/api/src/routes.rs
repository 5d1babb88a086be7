use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use staffing_pipeline::workflows::applications::{
    application_router, available_actions, status_table, ActorRole, ApplicationStatus,
    ApplicationStore, BackendState, StatusCategory, StatusTransitionAction,
};
use std::sync::Arc;

/// Canonical metadata row served to front ends so no view re-derives labels or colours.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusMetadataEntry {
    pub(crate) status: ApplicationStatus,
    pub(crate) label: &'static str,
    pub(crate) color_class: &'static str,
    pub(crate) category: StatusCategory,
    pub(crate) terminal: bool,
    pub(crate) vendor_actions: Vec<StatusTransitionAction>,
    pub(crate) client_actions: Vec<StatusTransitionAction>,
}

pub(crate) fn with_application_routes<St>(state: Arc<BackendState<St>>) -> axum::Router
where
    St: ApplicationStore + 'static,
{
    let api = application_router(state)
        .route("/status-metadata", axum::routing::get(status_metadata));

    axum::Router::new()
        .nest("/api", api)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn status_metadata() -> Json<serde_json::Value> {
    let entries: Vec<StatusMetadataEntry> = status_table()
        .iter()
        .map(|meta| StatusMetadataEntry {
            status: meta.status,
            label: meta.label,
            color_class: meta.color_class,
            category: meta.category,
            terminal: meta.terminal,
            vendor_actions: available_actions(meta.status, ActorRole::Vendor),
            client_actions: available_actions(meta.status, ActorRole::Client),
        })
        .collect();

    Json(json!({ "success": true, "data": entries }))
}
