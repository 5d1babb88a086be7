use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde_json::json;
use tracing::info;

use super::actions::ApplicationActionData;
use super::domain::{ActorRole, ApplicationId, Pagination};
use super::filters::ApplicationListQuery;
use super::http::ACTOR_ROLE_HEADER;
use super::mapping::StatusMapping;
use super::repository::{ApplicationStore, StoreError};
use super::transitions::is_transition_allowed;

/// Shared state of the reference backend.
pub struct BackendState<St> {
    pub store: Arc<St>,
    pub mapping: StatusMapping,
}

/// Reference implementation of the marketplace application endpoints.
///
/// Status updates are checked against the transition table for the caller's
/// role, taken from the `x-actor-role` header (client when absent).
pub fn application_router<St>(state: Arc<BackendState<St>>) -> Router
where
    St: ApplicationStore + 'static,
{
    Router::new()
        .route("/applications/status-mapping", get(mapping_handler::<St>))
        .route("/applications/vendor", get(vendor_list_handler::<St>))
        .route("/applications/client", get(client_list_handler::<St>))
        .route(
            "/applications/:application_id/status",
            put(update_status_handler::<St>),
        )
        .with_state(state)
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({
        "success": false,
        "message": message.into(),
    });
    (status, axum::Json(payload)).into_response()
}

fn caller_role(headers: &HeaderMap) -> Result<ActorRole, Response> {
    match headers.get(ACTOR_ROLE_HEADER) {
        None => Ok(ActorRole::Client),
        Some(value) => value
            .to_str()
            .map_err(|_| "actor role header is not valid text".to_string())
            .and_then(|raw| raw.parse())
            .map_err(|message| failure(StatusCode::BAD_REQUEST, message)),
    }
}

pub(crate) async fn mapping_handler<St>(State(state): State<Arc<BackendState<St>>>) -> Response
where
    St: ApplicationStore + 'static,
{
    let payload = json!({
        "success": true,
        "data": state.mapping.to_payload(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn vendor_list_handler<St>(
    State(state): State<Arc<BackendState<St>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    St: ApplicationStore + 'static,
{
    list(&state, ActorRole::Vendor, pairs)
}

pub(crate) async fn client_list_handler<St>(
    State(state): State<Arc<BackendState<St>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response
where
    St: ApplicationStore + 'static,
{
    list(&state, ActorRole::Client, pairs)
}

fn list<St>(state: &BackendState<St>, role: ActorRole, pairs: Vec<(String, String)>) -> Response
where
    St: ApplicationStore + 'static,
{
    let query = ApplicationListQuery::from_pairs(pairs);
    match state.store.list(&query) {
        Ok((items, total)) => {
            info!(role = role.label(), total, page = query.page, "applications listed");
            let payload = json!({
                "success": true,
                "data": items,
                "pagination": Pagination::new(query.page, query.limit, total),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

pub(crate) async fn update_status_handler<St>(
    State(state): State<Arc<BackendState<St>>>,
    Path(application_id): Path<String>,
    headers: HeaderMap,
    axum::Json(action): axum::Json<ApplicationActionData>,
) -> Response
where
    St: ApplicationStore + 'static,
{
    let role = match caller_role(&headers) {
        Ok(role) => role,
        Err(response) => return response,
    };
    if let Err(err) = action.validate() {
        return failure(StatusCode::UNPROCESSABLE_ENTITY, err.to_string());
    }

    let id = ApplicationId(application_id);
    let current = match state.store.fetch(&id) {
        Ok(Some(application)) => application.status,
        Ok(None) => {
            return failure(StatusCode::NOT_FOUND, format!("application {id} not found"));
        }
        Err(err) => return failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };

    let allowed = current
        .known()
        .is_some_and(|from| is_transition_allowed(from, action.status, role));
    if !allowed {
        return failure(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!(
                "{} cannot move application from '{}' to '{}'",
                role.label(),
                current,
                action.status
            ),
        );
    }

    match state
        .store
        .update_status(&id, &current, action.status, action.notes)
    {
        Ok(application) => {
            info!(application_id = %id, role = role.label(), from = %current, to = %action.status, "application status updated");
            let payload = json!({
                "success": true,
                "data": application,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(StoreError::NotFound) => {
            failure(StatusCode::NOT_FOUND, format!("application {id} not found"))
        }
        Err(err @ StoreError::Conflict { .. }) => failure(StatusCode::CONFLICT, err.to_string()),
        Err(err) => failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}
