use chrono::{NaiveDate, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use staffing_pipeline::config::BackendConfig;
use staffing_pipeline::error::AppError;
use staffing_pipeline::workflows::applications::{
    Application, ApplicationId, ApplicationPipelineService, EntityRef, HttpBackend,
    RequirementSummary, ResourceSummary, StatusValue,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type HttpPipelineService = ApplicationPipelineService<HttpBackend, HttpBackend>;

/// Service talking to the configured marketplace backend.
pub(crate) fn pipeline_service(config: &BackendConfig) -> Result<HttpPipelineService, AppError> {
    let backend = Arc::new(HttpBackend::new(config)?);
    Ok(ApplicationPipelineService::new(backend.clone(), backend))
}

fn sample(
    id: &str,
    status: &str,
    candidate: &str,
    requirement: &str,
    client: &str,
    day: u32,
) -> Application {
    Application {
        id: ApplicationId(id.to_string()),
        status: StatusValue::from(status),
        resource: Some(EntityRef::Populated(ResourceSummary {
            id: format!("res-{id}"),
            name: Some(candidate.to_string()),
            skills: vec!["rust".to_string(), "postgres".to_string()],
            experience: Some(5.0),
        })),
        requirement: Some(EntityRef::Populated(RequirementSummary {
            id: format!("req-{}", requirement.to_ascii_lowercase().replace(' ', "-")),
            title: Some(requirement.to_string()),
            client_name: Some(client.to_string()),
        })),
        created_at: Utc.with_ymd_and_hms(2025, 1, day, 9, 30, 0).single(),
        updated_at: None,
        proposed_rate: Some(80.0 + f64::from(day)),
        availability: Some("immediate".to_string()),
        notes: None,
    }
}

/// Sample applications covering every stage of the pipeline.
pub(crate) fn sample_applications() -> Vec<Application> {
    vec![
        sample("app-1001", "applied", "Priya Raman", "Backend Engineer", "Northwind", 2),
        sample("app-1002", "pending", "Tomas Novak", "Backend Engineer", "Northwind", 3),
        sample("app-1003", "shortlisted", "Amara Okafor", "Data Engineer", "Contoso", 4),
        sample("app-1004", "interview", "Lin Wei", "Data Engineer", "Contoso", 6),
        sample("app-1005", "accepted", "Diego Alvarez", "Platform Engineer", "Fabrikam", 8),
        sample("app-1006", "offer_created", "Sara Lindqvist", "Platform Engineer", "Fabrikam", 9),
        sample("app-1007", "offer_accepted", "Kenji Mori", "QA Lead", "Northwind", 11),
        sample("app-1008", "onboarded", "Fatima Zahra", "QA Lead", "Northwind", 12),
        sample("app-1009", "rejected", "Oliver Brandt", "Backend Engineer", "Contoso", 14),
        sample("app-1010", "withdrawn", "Hana Kim", "Data Engineer", "Fabrikam", 15),
        sample("app-1011", "did_not_join", "Mateo Rossi", "Platform Engineer", "Northwind", 16),
    ]
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
