use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::workflows::applications::actions::ApplicationActionData;
use crate::workflows::applications::domain::{
    ActorRole, Application, ApplicationId, ApplicationPage, ApplicationStatus, EntityRef,
    Pagination, RequirementSummary, ResourceSummary,
};
use crate::workflows::applications::filters::ApplicationListQuery;
use crate::workflows::applications::gateway::{
    ApplicationGateway, GatewayError, StatusMappingSource,
};
use crate::workflows::applications::mapping::{StatusMapping, StatusMappingPayload};
use crate::workflows::applications::repository::InMemoryApplicationStore;
use crate::workflows::applications::router::BackendState;
use crate::workflows::applications::{application_router, ApplicationPipelineService};

/// Mapping source that counts fetches and can be told to fail.
pub(super) struct CountingSource {
    fetches: AtomicUsize,
    outcome: Mutex<Result<StatusMappingPayload, String>>,
    delay: Option<Duration>,
}

impl CountingSource {
    pub(super) fn serving(payload: StatusMappingPayload) -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            outcome: Mutex::new(Ok(payload)),
            delay: None,
        }
    }

    pub(super) fn failing() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
            outcome: Mutex::new(Err("connection refused".to_string())),
            delay: None,
        }
    }

    pub(super) fn slow(payload: StatusMappingPayload, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::serving(payload)
        }
    }

    pub(super) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(super) fn serve(&self, payload: StatusMappingPayload) {
        *self.outcome.lock().expect("outcome mutex poisoned") = Ok(payload);
    }
}

#[async_trait]
impl StatusMappingSource for CountingSource {
    async fn fetch_status_mapping(&self) -> Result<StatusMappingPayload, GatewayError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome
            .lock()
            .expect("outcome mutex poisoned")
            .clone()
            .map_err(GatewayError::Transport)
    }
}

/// Gateway that records every call and answers from canned data.
#[derive(Default)]
pub(super) struct RecordingGateway {
    pub(super) updates: Mutex<Vec<(ActorRole, ApplicationId, ApplicationActionData)>>,
    pub(super) queries: Mutex<Vec<(ActorRole, ApplicationListQuery)>>,
    pub(super) fail_updates: bool,
}

impl RecordingGateway {
    pub(super) fn failing_updates() -> Self {
        Self {
            fail_updates: true,
            ..Self::default()
        }
    }

    pub(super) fn update_count(&self) -> usize {
        self.updates.lock().expect("updates mutex poisoned").len()
    }

    pub(super) fn last_query(&self) -> Option<(ActorRole, ApplicationListQuery)> {
        self.queries
            .lock()
            .expect("queries mutex poisoned")
            .last()
            .cloned()
    }
}

#[async_trait]
impl ApplicationGateway for RecordingGateway {
    async fn update_status(
        &self,
        role: ActorRole,
        application_id: &ApplicationId,
        action: &ApplicationActionData,
    ) -> Result<serde_json::Value, GatewayError> {
        self.updates.lock().expect("updates mutex poisoned").push((
            role,
            application_id.clone(),
            action.clone(),
        ));
        if self.fail_updates {
            return Err(GatewayError::Status {
                code: 422,
                message: "transition not allowed".to_string(),
            });
        }
        Ok(serde_json::json!({ "status": action.status }))
    }

    async fn list_applications(
        &self,
        role: ActorRole,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, GatewayError> {
        self.queries
            .lock()
            .expect("queries mutex poisoned")
            .push((role, query.clone()));
        Ok(ApplicationPage {
            items: Vec::new(),
            pagination: Pagination::new(query.page, query.limit, 0),
        })
    }
}

pub(super) fn payload(active: &[ApplicationStatus], inactive: &[ApplicationStatus]) -> StatusMappingPayload {
    StatusMapping::new(active.iter().copied(), inactive.iter().copied())
        .expect("valid mapping")
        .to_payload()
}

/// Backend mapping that differs from the fallback so tests can tell them apart.
pub(super) fn backend_payload() -> StatusMappingPayload {
    payload(
        &[
            ApplicationStatus::Applied,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::Interview,
        ],
        &[ApplicationStatus::Rejected, ApplicationStatus::Withdrawn],
    )
}

pub(super) fn build_service(
    source: CountingSource,
    gateway: RecordingGateway,
) -> (
    ApplicationPipelineService<CountingSource, RecordingGateway>,
    Arc<CountingSource>,
    Arc<RecordingGateway>,
) {
    let source = Arc::new(source);
    let gateway = Arc::new(gateway);
    let service = ApplicationPipelineService::new(source.clone(), gateway.clone());
    (service, source, gateway)
}

pub(super) fn application(id: &str, status: &str, resource: &str, requirement: &str) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        status: status.into(),
        resource: Some(EntityRef::Populated(ResourceSummary {
            id: format!("res-{id}"),
            name: Some(resource.to_string()),
            skills: vec!["rust".to_string()],
            experience: Some(4.0),
        })),
        requirement: Some(EntityRef::Populated(RequirementSummary {
            id: format!("req-{id}"),
            title: Some(requirement.to_string()),
            client_name: Some("Northwind".to_string()),
        })),
        created_at: Some(Utc.with_ymd_and_hms(2025, 2, 3, 9, 0, 0).unwrap()),
        updated_at: None,
        proposed_rate: Some(85.0),
        availability: Some("2 weeks".to_string()),
        notes: None,
    }
}

pub(super) fn seeded_store() -> InMemoryApplicationStore {
    InMemoryApplicationStore::with_applications([
        application("app-001", "applied", "Ada Lovelace", "Backend Engineer"),
        application("app-002", "interview", "Grace Hopper", "Compiler Engineer"),
        application("app-003", "offer_created", "Alan Turing", "Backend Engineer"),
        application("app-004", "rejected", "Edsger Dijkstra", "Platform Engineer"),
        application("app-005", "offer_accepted", "Barbara Liskov", "Platform Engineer"),
    ])
}

pub(super) fn router_with_store(store: InMemoryApplicationStore) -> axum::Router {
    application_router(Arc::new(BackendState {
        store: Arc::new(store),
        mapping: StatusMapping::fallback(),
    }))
}
