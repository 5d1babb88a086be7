use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::domain::{ApplicationStatus, StatusCategory, StatusValue};

/// Partition of statuses into the active and inactive filter buckets.
///
/// `active` and `inactive` are disjoint and their union is `all`; the only way
/// to build a mapping is through constructors that check this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMapping {
    active: BTreeSet<ApplicationStatus>,
    inactive: BTreeSet<ApplicationStatus>,
    all: BTreeSet<ApplicationStatus>,
}

/// Mapping payload as served by `GET /applications/status-mapping`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMappingPayload {
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default)]
    pub inactive: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("status '{0}' is listed as both active and inactive")]
    Overlap(ApplicationStatus),
    #[error("status '{0}' appears in 'all' but in neither active nor inactive")]
    Unclassified(ApplicationStatus),
    #[error("status '{0}' is classified but missing from 'all'")]
    MissingFromAll(ApplicationStatus),
    #[error("mapping does not classify any status")]
    Empty,
}

impl StatusMapping {
    pub fn new(
        active: impl IntoIterator<Item = ApplicationStatus>,
        inactive: impl IntoIterator<Item = ApplicationStatus>,
    ) -> Result<Self, MappingError> {
        let active: BTreeSet<_> = active.into_iter().collect();
        let inactive: BTreeSet<_> = inactive.into_iter().collect();

        if let Some(status) = active.intersection(&inactive).next() {
            return Err(MappingError::Overlap(*status));
        }
        if active.is_empty() && inactive.is_empty() {
            return Err(MappingError::Empty);
        }

        let all = active.union(&inactive).copied().collect();
        Ok(Self {
            active,
            inactive,
            all,
        })
    }

    /// Mapping used whenever the backend cannot provide one.
    pub fn fallback() -> Self {
        let active = [
            ApplicationStatus::Applied,
            ApplicationStatus::Pending,
            ApplicationStatus::Shortlisted,
            ApplicationStatus::Interview,
            ApplicationStatus::Accepted,
            ApplicationStatus::OfferCreated,
            ApplicationStatus::OfferAccepted,
            ApplicationStatus::Onboarded,
        ];
        let inactive = [
            ApplicationStatus::Rejected,
            ApplicationStatus::Withdrawn,
            ApplicationStatus::DidNotJoin,
            ApplicationStatus::Cancelled,
        ];

        Self {
            active: active.into_iter().collect(),
            inactive: inactive.into_iter().collect(),
            all: active.into_iter().chain(inactive).collect(),
        }
    }

    /// Validate a backend payload. Unrecognized status strings are dropped.
    pub fn from_payload(payload: StatusMappingPayload) -> Result<Self, MappingError> {
        let mapping = Self::new(
            known_statuses(&payload.active, "active"),
            known_statuses(&payload.inactive, "inactive"),
        )?;

        if let Some(all) = payload.all {
            let declared: BTreeSet<_> = known_statuses(&all, "all").collect();
            if let Some(status) = declared.difference(&mapping.all).next() {
                return Err(MappingError::Unclassified(*status));
            }
            if let Some(status) = mapping.all.difference(&declared).next() {
                return Err(MappingError::MissingFromAll(*status));
            }
        }

        Ok(mapping)
    }

    pub fn active(&self) -> &BTreeSet<ApplicationStatus> {
        &self.active
    }

    pub fn inactive(&self) -> &BTreeSet<ApplicationStatus> {
        &self.inactive
    }

    pub fn all(&self) -> &BTreeSet<ApplicationStatus> {
        &self.all
    }

    pub fn statuses_for(&self, category: StatusCategory) -> &BTreeSet<ApplicationStatus> {
        match category {
            StatusCategory::Active => &self.active,
            StatusCategory::Inactive => &self.inactive,
            StatusCategory::All => &self.all,
        }
    }

    /// Anything not explicitly active, including unknown values, is inactive.
    pub fn category_of(&self, status: &StatusValue) -> StatusCategory {
        match status.known() {
            Some(status) => self.category_of_status(status),
            None => StatusCategory::Inactive,
        }
    }

    pub fn category_of_status(&self, status: ApplicationStatus) -> StatusCategory {
        if self.active.contains(&status) {
            StatusCategory::Active
        } else {
            StatusCategory::Inactive
        }
    }

    pub fn to_payload(&self) -> StatusMappingPayload {
        let render = |set: &BTreeSet<ApplicationStatus>| {
            set.iter().map(|status| status.as_str().to_string()).collect()
        };
        StatusMappingPayload {
            active: render(&self.active),
            inactive: render(&self.inactive),
            all: Some(render(&self.all)),
        }
    }
}

impl Default for StatusMapping {
    fn default() -> Self {
        Self::fallback()
    }
}

fn known_statuses<'a>(
    values: &'a [String],
    bucket: &'static str,
) -> impl Iterator<Item = ApplicationStatus> + 'a {
    values.iter().filter_map(move |raw| match raw.parse() {
        Ok(status) => Some(status),
        Err(_) => {
            warn!(status = %raw, bucket, "ignoring unrecognized status in mapping payload");
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(active: &[&str], inactive: &[&str], all: Option<&[&str]>) -> StatusMappingPayload {
        let owned = |values: &[&str]| values.iter().map(|value| value.to_string()).collect();
        StatusMappingPayload {
            active: owned(active),
            inactive: owned(inactive),
            all: all.map(owned),
        }
    }

    #[test]
    fn fallback_partitions_all_statuses() {
        let mapping = StatusMapping::fallback();
        assert!(mapping.active().is_disjoint(mapping.inactive()));
        let union: BTreeSet<_> = mapping.active().union(mapping.inactive()).copied().collect();
        assert_eq!(&union, mapping.all());
        assert_eq!(mapping.all().len(), ApplicationStatus::ALL.len());
    }

    #[test]
    fn category_of_is_active_only_for_active_members() {
        let mapping = StatusMapping::fallback();
        for status in ApplicationStatus::ALL {
            let expected = if mapping.active().contains(&status) {
                StatusCategory::Active
            } else {
                StatusCategory::Inactive
            };
            assert_eq!(mapping.category_of(&status.into()), expected, "{status}");
        }
    }

    #[test]
    fn unknown_status_is_classified_inactive() {
        let mapping = StatusMapping::fallback();
        assert_eq!(
            mapping.category_of(&StatusValue::from("bogus_status")),
            StatusCategory::Inactive
        );
    }

    #[test]
    fn status_missing_from_both_sets_is_inactive() {
        let mapping =
            StatusMapping::new([ApplicationStatus::Applied], [ApplicationStatus::Rejected])
                .expect("valid mapping");
        assert_eq!(
            mapping.category_of_status(ApplicationStatus::Interview),
            StatusCategory::Inactive
        );
    }

    #[test]
    fn payload_with_overlap_is_rejected() {
        let error = StatusMapping::from_payload(payload(
            &["applied", "rejected"],
            &["rejected"],
            None,
        ))
        .expect_err("overlap rejected");
        assert_eq!(error, MappingError::Overlap(ApplicationStatus::Rejected));
    }

    #[test]
    fn payload_all_must_match_union() {
        let error = StatusMapping::from_payload(payload(
            &["applied"],
            &["rejected"],
            Some(&["applied", "rejected", "withdrawn"]),
        ))
        .expect_err("unclassified status rejected");
        assert_eq!(
            error,
            MappingError::Unclassified(ApplicationStatus::Withdrawn)
        );
    }

    #[test]
    fn payload_drops_unrecognized_values() {
        let mapping = StatusMapping::from_payload(payload(
            &["applied", "on_hold"],
            &["rejected"],
            Some(&["applied", "on_hold", "rejected"]),
        ))
        .expect("unknown values are ignored");
        assert_eq!(mapping.all().len(), 2);
    }

    #[test]
    fn payload_round_trips_through_wire_shape() {
        let mapping = StatusMapping::fallback();
        let rebuilt = StatusMapping::from_payload(mapping.to_payload()).expect("valid payload");
        assert_eq!(rebuilt, mapping);
    }
}
