use serde::Serialize;

use super::domain::{ActorRole, ApplicationStatus, StatusValue};
use super::metadata::{IN_PROCESS_LABEL, UNKNOWN_LABEL};

/// A legal next status offered to the acting role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusTransitionAction {
    pub value: ApplicationStatus,
    pub label: &'static str,
}

/// Which side of the marketplace may take a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Actor {
    DecisionMaker,
    Vendor,
}

struct Transition {
    from: ApplicationStatus,
    to: ApplicationStatus,
    actor: Actor,
    label: &'static str,
}

const fn decision(
    from: ApplicationStatus,
    to: ApplicationStatus,
    label: &'static str,
) -> Transition {
    Transition {
        from,
        to,
        actor: Actor::DecisionMaker,
        label,
    }
}

const fn vendor(from: ApplicationStatus, to: ApplicationStatus, label: &'static str) -> Transition {
    Transition {
        from,
        to,
        actor: Actor::Vendor,
        label,
    }
}

use ApplicationStatus::{
    Accepted, Applied, DidNotJoin, Interview, OfferAccepted, OfferCreated, Onboarded, Pending,
    Rejected, Shortlisted, Withdrawn,
};

const REVOKE: &str = "Revoke";

// Ordered: the order here is the order actions are offered.
const TRANSITIONS: &[Transition] = &[
    decision(Applied, Shortlisted, "Shortlist"),
    decision(Applied, Rejected, "Reject"),
    decision(Pending, Shortlisted, "Shortlist"),
    decision(Pending, Rejected, "Reject"),
    decision(Shortlisted, Interview, "Schedule Interview"),
    decision(Shortlisted, Rejected, "Reject"),
    decision(Interview, Accepted, "Accept"),
    decision(Interview, Rejected, "Reject"),
    decision(Accepted, OfferCreated, "Create Offer"),
    decision(OfferCreated, Withdrawn, "Remove Offer"),
    decision(OfferAccepted, Onboarded, "Onboard"),
    decision(OfferAccepted, DidNotJoin, "Did Not Join"),
    vendor(OfferCreated, OfferAccepted, "Accept Offer"),
    vendor(OfferCreated, Rejected, "Reject Offer"),
    vendor(Applied, Withdrawn, REVOKE),
    vendor(Pending, Withdrawn, REVOKE),
    vendor(Shortlisted, Withdrawn, REVOKE),
    vendor(Interview, Withdrawn, REVOKE),
    vendor(Accepted, Withdrawn, REVOKE),
    vendor(OfferCreated, Withdrawn, REVOKE),
    vendor(OfferAccepted, Withdrawn, REVOKE),
];

fn actor_for(role: ActorRole) -> Actor {
    if role.is_decision_maker() {
        Actor::DecisionMaker
    } else {
        Actor::Vendor
    }
}

/// Next statuses the given role may move an application to.
pub fn available_actions(
    status: ApplicationStatus,
    role: ActorRole,
) -> Vec<StatusTransitionAction> {
    let actor = actor_for(role);
    TRANSITIONS
        .iter()
        .filter(|transition| transition.from == status && transition.actor == actor)
        .map(|transition| StatusTransitionAction {
            value: transition.to,
            label: transition.label,
        })
        .collect()
}

/// Like [`available_actions`] but tolerant of statuses this crate does not know.
pub fn available_actions_for(status: &StatusValue, role: ActorRole) -> Vec<StatusTransitionAction> {
    status
        .known()
        .map(|status| available_actions(status, role))
        .unwrap_or_default()
}

pub fn is_transition_allowed(
    from: ApplicationStatus,
    to: ApplicationStatus,
    role: ActorRole,
) -> bool {
    let actor = actor_for(role);
    TRANSITIONS
        .iter()
        .any(|transition| transition.from == from && transition.to == to && transition.actor == actor)
}

/// Label shown to `viewer` for an application in `status`.
///
/// Vendors see a single "In Process" label for every open stage; the client
/// pipeline detail is only shown to clients and admins.
pub fn display_label(status: &StatusValue, viewer: ActorRole) -> &'static str {
    match status.known() {
        None => UNKNOWN_LABEL,
        Some(status) if viewer == ActorRole::Vendor && !status.is_terminal() => IN_PROCESS_LABEL,
        Some(status) => status.label(),
    }
}
