use serde::Serialize;

use super::domain::{ApplicationStatus, StatusCategory};

/// Presentation and classification facts for a status, shared by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusMetadata {
    pub status: ApplicationStatus,
    pub label: &'static str,
    pub color_class: &'static str,
    pub category: StatusCategory,
    pub terminal: bool,
}

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const UNKNOWN_COLOR_CLASS: &str = "bg-secondary";
pub const IN_PROCESS_LABEL: &str = "In Process";

const fn entry(
    status: ApplicationStatus,
    label: &'static str,
    color_class: &'static str,
    category: StatusCategory,
    terminal: bool,
) -> StatusMetadata {
    StatusMetadata {
        status,
        label,
        color_class,
        category,
        terminal,
    }
}

static TABLE: [StatusMetadata; 12] = [
    entry(ApplicationStatus::Applied, "Applied", "bg-info", StatusCategory::Active, false),
    entry(ApplicationStatus::Pending, "Pending", "bg-warning", StatusCategory::Active, false),
    entry(
        ApplicationStatus::Shortlisted,
        "Shortlisted",
        "bg-primary",
        StatusCategory::Active,
        false,
    ),
    entry(ApplicationStatus::Interview, "Interview", "bg-primary", StatusCategory::Active, false),
    entry(ApplicationStatus::Accepted, "Accepted", "bg-success", StatusCategory::Active, false),
    entry(ApplicationStatus::Rejected, "Rejected", "bg-danger", StatusCategory::Inactive, true),
    entry(
        ApplicationStatus::OfferCreated,
        "Offer Created",
        "bg-info",
        StatusCategory::Active,
        false,
    ),
    entry(
        ApplicationStatus::OfferAccepted,
        "Offer Accepted",
        "bg-success",
        StatusCategory::Active,
        false,
    ),
    entry(ApplicationStatus::Onboarded, "Onboarded", "bg-success", StatusCategory::Active, true),
    entry(
        ApplicationStatus::DidNotJoin,
        "Did Not Join",
        "bg-dark",
        StatusCategory::Inactive,
        true,
    ),
    entry(ApplicationStatus::Withdrawn, "Withdrawn", "bg-secondary", StatusCategory::Inactive, true),
    entry(ApplicationStatus::Cancelled, "Cancelled", "bg-secondary", StatusCategory::Inactive, true),
];

impl ApplicationStatus {
    pub fn metadata(self) -> &'static StatusMetadata {
        // TABLE is declared in the same order as the enum variants.
        &TABLE[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.metadata().label
    }

    pub fn color_class(self) -> &'static str {
        self.metadata().color_class
    }

    pub fn is_terminal(self) -> bool {
        self.metadata().terminal
    }
}

/// Full metadata table in lifecycle order.
pub fn status_table() -> &'static [StatusMetadata] {
    &TABLE
}
