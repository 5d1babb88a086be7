use super::common::*;
use std::sync::Arc;
use std::time::Duration;

use crate::workflows::applications::domain::{ApplicationStatus, StatusCategory, StatusValue};
use crate::workflows::applications::mapping::{StatusMapping, StatusMappingPayload};
use crate::workflows::applications::resolver::{MappingOrigin, StatusMappingResolver};

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let source = Arc::new(CountingSource::serving(backend_payload()));
    let resolver = StatusMappingResolver::new(source.clone());

    let first = resolver.get_mapping().await;
    let second = resolver.get_mapping().await;

    assert_eq!(source.fetches(), 1);
    assert_eq!(first, second);
    assert_eq!(resolver.origin().await, Some(MappingOrigin::Backend));
}

#[tokio::test]
async fn clear_cache_triggers_exactly_one_refetch() {
    let source = Arc::new(CountingSource::serving(backend_payload()));
    let resolver = StatusMappingResolver::new(source.clone());

    resolver.get_mapping().await;
    resolver.clear_cache().await;
    assert_eq!(resolver.origin().await, None);

    source.serve(payload(
        &[ApplicationStatus::Applied],
        &[ApplicationStatus::Rejected],
    ));
    let refreshed = resolver.get_mapping().await;
    resolver.get_mapping().await;

    assert_eq!(source.fetches(), 2);
    assert_eq!(refreshed.all().len(), 2);
}

#[tokio::test]
async fn failed_fetch_resolves_to_fallback_mapping() {
    let source = Arc::new(CountingSource::failing());
    let resolver = StatusMappingResolver::new(source.clone());

    let mapping = resolver.get_mapping().await;

    assert_eq!(*mapping, StatusMapping::fallback());
    assert_eq!(resolver.origin().await, Some(MappingOrigin::Fallback));
}

#[tokio::test]
async fn fallback_is_cached_without_automatic_retry() {
    let source = Arc::new(CountingSource::failing());
    let resolver = StatusMappingResolver::new(source.clone());

    resolver.get_mapping().await;
    resolver.get_mapping().await;
    assert_eq!(source.fetches(), 1);

    source.serve(backend_payload());
    resolver.clear_cache().await;
    let mapping = resolver.get_mapping().await;
    assert_eq!(source.fetches(), 2);
    assert_eq!(resolver.origin().await, Some(MappingOrigin::Backend));
    assert!(!mapping.all().contains(&ApplicationStatus::Cancelled));
}

#[tokio::test]
async fn invalid_backend_payload_falls_back() {
    let overlapping = StatusMappingPayload {
        active: vec!["applied".to_string(), "rejected".to_string()],
        inactive: vec!["rejected".to_string()],
        all: None,
    };
    let source = Arc::new(CountingSource::serving(overlapping));
    let resolver = StatusMappingResolver::new(source);

    assert_eq!(*resolver.get_mapping().await, StatusMapping::fallback());
    assert_eq!(resolver.origin().await, Some(MappingOrigin::Fallback));
}

#[tokio::test]
async fn concurrent_first_callers_share_one_fetch() {
    let source = Arc::new(CountingSource::slow(
        backend_payload(),
        Duration::from_millis(20),
    ));
    let resolver = Arc::new(StatusMappingResolver::new(source.clone()));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            tokio::spawn(async move { resolver.get_mapping().await })
        })
        .collect();
    for handle in handles {
        handle.await.expect("lookup task completes");
    }

    assert_eq!(source.fetches(), 1);
}

#[tokio::test]
async fn category_lookup_uses_backend_mapping() {
    let source = Arc::new(CountingSource::serving(backend_payload()));
    let resolver = StatusMappingResolver::new(source);

    assert_eq!(
        resolver.category_of(&ApplicationStatus::Interview.into()).await,
        StatusCategory::Active
    );
    // Active in the fallback, but the backend mapping does not list it.
    assert_eq!(
        resolver.category_of(&ApplicationStatus::Onboarded.into()).await,
        StatusCategory::Inactive
    );
    assert_eq!(
        resolver.category_of(&StatusValue::from("bogus_status")).await,
        StatusCategory::Inactive
    );
    assert_eq!(resolver.statuses_for(StatusCategory::All).await.len(), 5);
}
