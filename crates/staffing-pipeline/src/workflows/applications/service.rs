use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::actions::{ActionValidationError, ApplicationActionData};
use super::domain::{
    ActorRole, Application, ApplicationId, ApplicationPage, StatusCategory, StatusValue,
};
use super::filters::ApplicationFilters;
use super::gateway::{ApplicationGateway, GatewayError, StatusMappingSource};
use super::mapping::StatusMapping;
use super::metadata::UNKNOWN_COLOR_CLASS;
use super::resolver::StatusMappingResolver;
use super::transitions::{available_actions_for, display_label, StatusTransitionAction};

/// Facade combining the mapping resolver with the backend gateway.
pub struct ApplicationPipelineService<S, G> {
    resolver: Arc<StatusMappingResolver<S>>,
    gateway: Arc<G>,
}

impl<S, G> ApplicationPipelineService<S, G>
where
    S: StatusMappingSource + 'static,
    G: ApplicationGateway + 'static,
{
    pub fn new(source: Arc<S>, gateway: Arc<G>) -> Self {
        Self::with_resolver(Arc::new(StatusMappingResolver::new(source)), gateway)
    }

    /// Share one resolver (and therefore one cached mapping) across services.
    pub fn with_resolver(resolver: Arc<StatusMappingResolver<S>>, gateway: Arc<G>) -> Self {
        Self { resolver, gateway }
    }

    pub fn resolver(&self) -> &StatusMappingResolver<S> {
        &self.resolver
    }

    pub async fn status_mapping(&self) -> Arc<StatusMapping> {
        self.resolver.get_mapping().await
    }

    pub async fn category_of(&self, status: &StatusValue) -> StatusCategory {
        self.resolver.category_of(status).await
    }

    pub fn available_actions(
        &self,
        status: &StatusValue,
        role: ActorRole,
    ) -> Vec<StatusTransitionAction> {
        available_actions_for(status, role)
    }

    /// Validate locally, then submit the status change. Failures are not retried.
    pub async fn update_status(
        &self,
        role: ActorRole,
        application_id: &ApplicationId,
        action: ApplicationActionData,
    ) -> Result<serde_json::Value, PipelineError> {
        action.validate()?;

        info!(
            application_id = %application_id,
            role = role.label(),
            status = %action.status,
            "submitting application status update"
        );

        self.gateway
            .update_status(role, application_id, &action)
            .await
            .map_err(|err| {
                warn!(application_id = %application_id, error = %err, "status update failed");
                PipelineError::from(err)
            })
    }

    pub async fn list_applications(
        &self,
        role: ActorRole,
        filters: &ApplicationFilters,
        page: u32,
        limit: u32,
    ) -> Result<ApplicationPage, PipelineError> {
        let mapping = self.resolver.get_mapping().await;
        let query = filters.to_query(&mapping, page, limit);

        info!(
            role = role.label(),
            category = filters.category.label(),
            statuses = query.statuses.len(),
            page = query.page,
            "listing applications"
        );

        let page = self.gateway.list_applications(role, &query).await?;
        Ok(page)
    }

    /// Everything a view needs to render one application's status for `viewer`.
    pub async fn describe(&self, application: &Application, viewer: ActorRole) -> ApplicationStatusView {
        let category = self.category_of(&application.status).await;
        let color_class = application
            .status
            .known()
            .map(|status| status.color_class())
            .unwrap_or(UNKNOWN_COLOR_CLASS);

        ApplicationStatusView {
            application_id: application.id.clone(),
            status: application.status.clone(),
            label: display_label(&application.status, viewer),
            color_class,
            category,
            actions: self.available_actions(&application.status, viewer),
        }
    }
}

/// Status presentation of an application for a specific viewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStatusView {
    pub application_id: ApplicationId,
    pub status: StatusValue,
    pub label: &'static str,
    pub color_class: &'static str,
    pub category: StatusCategory,
    pub actions: Vec<StatusTransitionAction>,
}

/// Error raised by the pipeline service.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ActionValidationError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
