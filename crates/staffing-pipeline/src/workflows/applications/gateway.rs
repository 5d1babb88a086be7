use async_trait::async_trait;

use super::actions::ApplicationActionData;
use super::domain::{ActorRole, ApplicationId, ApplicationPage};
use super::filters::ApplicationListQuery;
use super::mapping::StatusMappingPayload;

/// Source of the authoritative status mapping.
#[async_trait]
pub trait StatusMappingSource: Send + Sync {
    async fn fetch_status_mapping(&self) -> Result<StatusMappingPayload, GatewayError>;
}

/// Backend operations on applications.
#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    async fn update_status(
        &self,
        role: ActorRole,
        application_id: &ApplicationId,
        action: &ApplicationActionData,
    ) -> Result<serde_json::Value, GatewayError>;

    async fn list_applications(
        &self,
        role: ActorRole,
        query: &ApplicationListQuery,
    ) -> Result<ApplicationPage, GatewayError>;
}

/// Failure talking to the marketplace backend.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend responded with status {code}: {message}")]
    Status { code: u16, message: String },
    #[error("backend rejected the request: {message}")]
    Rejected { message: String },
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::Status { code: 404, .. })
    }
}
