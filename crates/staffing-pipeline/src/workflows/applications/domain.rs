use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::metadata::UNKNOWN_LABEL;

/// Identifier wrapper for marketplace applications (the backend `_id`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an application as understood by the marketplace backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Pending,
    Shortlisted,
    Interview,
    Accepted,
    Rejected,
    OfferCreated,
    OfferAccepted,
    Onboarded,
    DidNotJoin,
    Withdrawn,
    Cancelled,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 12] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Pending,
        ApplicationStatus::Shortlisted,
        ApplicationStatus::Interview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::OfferCreated,
        ApplicationStatus::OfferAccepted,
        ApplicationStatus::Onboarded,
        ApplicationStatus::DidNotJoin,
        ApplicationStatus::Withdrawn,
        ApplicationStatus::Cancelled,
    ];

    /// Wire value used by the backend.
    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::OfferCreated => "offer_created",
            ApplicationStatus::OfferAccepted => "offer_accepted",
            ApplicationStatus::Onboarded => "onboarded",
            ApplicationStatus::DidNotJoin => "did_not_join",
            ApplicationStatus::Withdrawn => "withdrawn",
            ApplicationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized application status '{0}'")]
pub struct UnknownStatus(pub String);

/// Matches the exact wire value, the same way the serde derive does.
impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}

/// A status exactly as it arrived over the wire.
///
/// Backends occasionally emit values this crate does not know about; those are
/// preserved verbatim instead of failing deserialization of the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StatusValue {
    Known(ApplicationStatus),
    Unrecognized(String),
}

impl StatusValue {
    pub fn known(&self) -> Option<ApplicationStatus> {
        match self {
            StatusValue::Known(status) => Some(*status),
            StatusValue::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StatusValue::Known(status) => status.as_str(),
            StatusValue::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for StatusValue {
    fn from(value: String) -> Self {
        match value.parse::<ApplicationStatus>() {
            Ok(status) => StatusValue::Known(status),
            Err(_) => StatusValue::Unrecognized(value),
        }
    }
}

impl From<&str> for StatusValue {
    fn from(value: &str) -> Self {
        StatusValue::from(value.to_string())
    }
}

impl From<ApplicationStatus> for StatusValue {
    fn from(value: ApplicationStatus) -> Self {
        StatusValue::Known(value)
    }
}

impl From<StatusValue> for String {
    fn from(value: StatusValue) -> Self {
        match value {
            StatusValue::Known(status) => status.as_str().to_string(),
            StatusValue::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for StatusValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-level bucket a status belongs to when filtering application lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    #[default]
    Active,
    Inactive,
    All,
}

impl StatusCategory {
    pub const fn label(self) -> &'static str {
        match self {
            StatusCategory::Active => "active",
            StatusCategory::Inactive => "inactive",
            StatusCategory::All => "all",
        }
    }
}

impl FromStr for StatusCategory {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(StatusCategory::Active),
            "inactive" => Ok(StatusCategory::Inactive),
            "all" => Ok(StatusCategory::All),
            other => Err(format!("unknown status category '{other}'")),
        }
    }
}

/// Who is looking at, or acting on, an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Vendor,
    Client,
    Admin,
}

impl ActorRole {
    pub const fn label(self) -> &'static str {
        match self {
            ActorRole::Vendor => "vendor",
            ActorRole::Client => "client",
            ActorRole::Admin => "admin",
        }
    }

    /// Client and admin share the decision-maker view of the hiring pipeline.
    pub const fn is_decision_maker(self) -> bool {
        matches!(self, ActorRole::Client | ActorRole::Admin)
    }

    /// Path segment of the list endpoint serving this role.
    pub const fn list_segment(self) -> &'static str {
        match self {
            ActorRole::Vendor => "vendor",
            ActorRole::Client | ActorRole::Admin => "client",
        }
    }
}

impl FromStr for ActorRole {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vendor" => Ok(ActorRole::Vendor),
            "client" => Ok(ActorRole::Client),
            "admin" => Ok(ActorRole::Admin),
            other => Err(format!("unknown actor role '{other}'")),
        }
    }
}

/// Reference that the backend either populates with the full document or leaves as an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef<T> {
    Populated(T),
    Id(String),
}

impl<T: Identified> EntityRef<T> {
    pub fn id(&self) -> &str {
        match self {
            EntityRef::Populated(entity) => entity.id(),
            EntityRef::Id(id) => id,
        }
    }

    pub fn populated(&self) -> Option<&T> {
        match self {
            EntityRef::Populated(entity) => Some(entity),
            EntityRef::Id(_) => None,
        }
    }
}

pub trait Identified {
    fn id(&self) -> &str;
}

/// Candidate offered by a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Option<f32>,
}

impl Identified for ResourceSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Requirement posted by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
}

impl Identified for RequirementSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Application record as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(rename = "_id")]
    pub id: ApplicationId,
    pub status: StatusValue,
    /// `None` when the backend sends `null` or omits the reference (e.g. a deleted document).
    #[serde(default)]
    pub resource: Option<EntityRef<ResourceSummary>>,
    #[serde(default)]
    pub requirement: Option<EntityRef<RequirementSummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Application {
    pub fn resource_name(&self) -> &str {
        match &self.resource {
            Some(resource) => resource
                .populated()
                .and_then(|resource| resource.name.as_deref())
                .unwrap_or_else(|| resource.id()),
            None => UNKNOWN_LABEL,
        }
    }

    pub fn requirement_title(&self) -> &str {
        match &self.requirement {
            Some(requirement) => requirement
                .populated()
                .and_then(|requirement| requirement.title.as_deref())
                .unwrap_or_else(|| requirement.id()),
            None => UNKNOWN_LABEL,
        }
    }
}

/// Page cursor returned alongside list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

/// One page of applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationPage {
    pub items: Vec<Application>,
    pub pagination: Pagination,
}
