//! Application status lifecycle: status mapping, transitions, and list filters.
//!
//! The backend owns the authoritative data; this module mirrors its status
//! vocabulary, resolves the active/inactive mapping once per resolver, decides
//! which transitions each role is offered, and builds list queries.

pub mod actions;
pub mod domain;
pub mod filters;
pub mod gateway;
pub mod http;
pub mod mapping;
pub mod metadata;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod service;
pub mod transitions;

#[cfg(test)]
mod tests;

pub use actions::{ActionValidationError, ApplicationActionData, DecisionReason};
pub use domain::{
    ActorRole, Application, ApplicationId, ApplicationPage, ApplicationStatus, EntityRef,
    Pagination, RequirementSummary, ResourceSummary, StatusCategory, StatusValue,
};
pub use filters::{ApplicationFilters, ApplicationListQuery};
pub use gateway::{ApplicationGateway, GatewayError, StatusMappingSource};
pub use http::HttpBackend;
pub use mapping::{MappingError, StatusMapping, StatusMappingPayload};
pub use metadata::{status_table, StatusMetadata};
pub use repository::{ApplicationStore, InMemoryApplicationStore, StoreError};
pub use resolver::{MappingOrigin, StatusMappingResolver};
pub use router::{application_router, BackendState};
pub use service::{ApplicationPipelineService, ApplicationStatusView, PipelineError};
pub use transitions::{
    available_actions, available_actions_for, display_label, is_transition_allowed,
    StatusTransitionAction,
};
