use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::ApplicationStatus;

/// Structured reason recorded with a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionReason {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// 1 to 5; range checking is left to the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub criteria: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /applications/{id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationActionData {
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_reason: Option<DecisionReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_candidate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_client: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_notes: Option<String>,
}

impl ApplicationActionData {
    pub fn new(status: ApplicationStatus) -> Self {
        Self {
            status,
            notes: None,
            decision_reason: None,
            notify_candidate: None,
            notify_client: None,
            follow_up_required: None,
            follow_up_date: None,
            follow_up_notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_reason(mut self, reason: DecisionReason) -> Self {
        self.decision_reason = Some(reason);
        self
    }

    pub fn with_notifications(mut self, candidate: bool, client: bool) -> Self {
        self.notify_candidate = Some(candidate);
        self.notify_client = Some(client);
        self
    }

    pub fn with_follow_up(mut self, date: Option<NaiveDate>, notes: Option<String>) -> Self {
        self.follow_up_required = Some(true);
        self.follow_up_date = date;
        self.follow_up_notes = notes;
        self
    }

    pub fn follow_up_required(&self) -> bool {
        self.follow_up_required.unwrap_or(false)
    }

    /// Local checks run before the request leaves the process.
    pub fn validate(&self) -> Result<(), ActionValidationError> {
        if !self.follow_up_required() {
            return Ok(());
        }

        let has_category = self
            .decision_reason
            .as_ref()
            .is_some_and(|reason| !reason.category.trim().is_empty());
        if !has_category {
            return Err(ActionValidationError::MissingDecisionCategory);
        }
        if self.follow_up_date.is_none() {
            return Err(ActionValidationError::MissingFollowUpDate);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionValidationError {
    #[error("a decision reason category is required when a follow-up is requested")]
    MissingDecisionCategory,
    #[error("a follow-up date is required when a follow-up is requested")]
    MissingFollowUpDate,
}
