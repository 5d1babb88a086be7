use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::domain::{ApplicationStatus, StatusCategory, StatusValue};
use super::gateway::StatusMappingSource;
use super::mapping::StatusMapping;

/// Where the cached mapping came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingOrigin {
    Backend,
    Fallback,
}

#[derive(Debug, Clone)]
struct CachedMapping {
    mapping: Arc<StatusMapping>,
    origin: MappingOrigin,
}

/// Resolves and caches the status mapping for the lifetime of the resolver.
///
/// The first caller fetches; everyone else reads the cache until
/// [`clear_cache`](Self::clear_cache). Fetch failures never reach callers: the
/// fallback mapping is cached in place of the backend one and is not retried.
pub struct StatusMappingResolver<S> {
    source: Arc<S>,
    cache: Mutex<Option<CachedMapping>>,
}

impl<S> StatusMappingResolver<S>
where
    S: StatusMappingSource + 'static,
{
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            cache: Mutex::new(None),
        }
    }

    pub async fn get_mapping(&self) -> Arc<StatusMapping> {
        self.resolve().await.mapping
    }

    /// `None` until the first [`get_mapping`](Self::get_mapping) completes.
    pub async fn origin(&self) -> Option<MappingOrigin> {
        self.cache.lock().await.as_ref().map(|cached| cached.origin)
    }

    pub async fn clear_cache(&self) {
        debug!("status mapping cache cleared");
        self.cache.lock().await.take();
    }

    pub async fn category_of(&self, status: &StatusValue) -> StatusCategory {
        self.get_mapping().await.category_of(status)
    }

    pub async fn statuses_for(&self, category: StatusCategory) -> BTreeSet<ApplicationStatus> {
        self.get_mapping().await.statuses_for(category).clone()
    }

    async fn resolve(&self) -> CachedMapping {
        // Held across the fetch so concurrent first callers share one request.
        let mut cache = self.cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            return cached.clone();
        }

        let resolved = self.fetch().await;
        *cache = Some(resolved.clone());
        resolved
    }

    async fn fetch(&self) -> CachedMapping {
        let outcome = match self.source.fetch_status_mapping().await {
            Ok(payload) => StatusMapping::from_payload(payload).map_err(|err| err.to_string()),
            Err(err) => Err(err.to_string()),
        };

        match outcome {
            Ok(mapping) => {
                info!(
                    active = mapping.active().len(),
                    inactive = mapping.inactive().len(),
                    "status mapping loaded from backend"
                );
                CachedMapping {
                    mapping: Arc::new(mapping),
                    origin: MappingOrigin::Backend,
                }
            }
            Err(reason) => {
                warn!(%reason, "status mapping unavailable, using built-in fallback");
                CachedMapping {
                    mapping: Arc::new(StatusMapping::fallback()),
                    origin: MappingOrigin::Fallback,
                }
            }
        }
    }
}
