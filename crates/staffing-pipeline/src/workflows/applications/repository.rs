use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{Application, ApplicationId, ApplicationStatus, StatusValue};
use super::filters::ApplicationListQuery;

/// Storage behind the reference backend router.
pub trait ApplicationStore: Send + Sync {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError>;
    /// Compare-and-set: moves the application to `status` only while it is still at `expected`.
    fn update_status(
        &self,
        id: &ApplicationId,
        expected: &StatusValue,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application, StoreError>;
    /// Matching applications for the requested page, plus the total match count.
    fn list(&self, query: &ApplicationListQuery) -> Result<(Vec<Application>, u64), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("application status changed concurrently to '{current}'")]
    Conflict { current: StatusValue },
    #[error("application not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryApplicationStore {
    records: Arc<Mutex<BTreeMap<ApplicationId, Application>>>,
}

impl InMemoryApplicationStore {
    pub fn with_applications(applications: impl IntoIterator<Item = Application>) -> Self {
        let records = applications
            .into_iter()
            .map(|application| (application.id.clone(), application))
            .collect();
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, BTreeMap<ApplicationId, Application>>, StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Unavailable("application store mutex poisoned".to_string()))
    }
}

impl ApplicationStore for InMemoryApplicationStore {
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(self.guard()?.get(id).cloned())
    }

    fn update_status(
        &self,
        id: &ApplicationId,
        expected: &StatusValue,
        status: ApplicationStatus,
        notes: Option<String>,
    ) -> Result<Application, StoreError> {
        let mut records = self.guard()?;
        let application = records.get_mut(id).ok_or(StoreError::NotFound)?;
        if &application.status != expected {
            return Err(StoreError::Conflict {
                current: application.status.clone(),
            });
        }
        application.status = StatusValue::Known(status);
        application.updated_at = Some(Utc::now());
        if notes.is_some() {
            application.notes = notes;
        }
        Ok(application.clone())
    }

    fn list(&self, query: &ApplicationListQuery) -> Result<(Vec<Application>, u64), StoreError> {
        let records = self.guard()?;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let matching: Vec<&Application> = records
            .values()
            .filter(|application| match application.status.known() {
                Some(status) => query.matches_status(status),
                None => query.statuses.is_empty(),
            })
            .filter(|application| match &needle {
                Some(needle) => matches_search(application, needle),
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let offset = (query.page.saturating_sub(1) as usize).saturating_mul(query.limit as usize);
        let page = matching
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}

fn matches_search(application: &Application, needle: &str) -> bool {
    [
        Some(application.resource_name()),
        Some(application.requirement_title()),
        application.notes.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|haystack| haystack.to_lowercase().contains(needle))
}
