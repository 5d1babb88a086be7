use serde::{Deserialize, Serialize};

use super::domain::{ApplicationStatus, StatusCategory};
use super::mapping::StatusMapping;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Filter state of an application list view.
///
/// An explicit status selection always wins over the category; an empty
/// selection means "every status of the category".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFilters {
    pub category: StatusCategory,
    #[serde(default)]
    pub statuses: Vec<ApplicationStatus>,
    #[serde(default)]
    pub search_term: Option<String>,
}

impl ApplicationFilters {
    pub fn new(category: StatusCategory) -> Self {
        Self {
            category,
            ..Self::default()
        }
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ApplicationStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Switch category and drop any explicit selection.
    pub fn select_category(&mut self, category: StatusCategory) {
        self.category = category;
        self.statuses.clear();
    }

    /// Statuses shown as checked: the explicit selection, or the category's set.
    pub fn checklist(&self, mapping: &StatusMapping) -> Vec<ApplicationStatus> {
        self.effective_statuses(mapping)
    }

    /// Flip a checklist entry. The first edit starts from the category's set.
    pub fn toggle_status(&mut self, status: ApplicationStatus, mapping: &StatusMapping) {
        if self.statuses.is_empty() {
            self.statuses = mapping.statuses_for(self.category).iter().copied().collect();
        }
        if let Some(position) = self.statuses.iter().position(|s| *s == status) {
            self.statuses.remove(position);
        } else {
            self.statuses.push(status);
        }
    }

    /// Status set sent to the backend; matching is OR across the set.
    pub fn effective_statuses(&self, mapping: &StatusMapping) -> Vec<ApplicationStatus> {
        if self.statuses.is_empty() {
            return mapping.statuses_for(self.category).iter().copied().collect();
        }

        let mut selected = Vec::with_capacity(self.statuses.len());
        for status in &self.statuses {
            if !selected.contains(status) {
                selected.push(*status);
            }
        }
        selected
    }

    pub fn normalized_search(&self) -> Option<String> {
        self.search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string)
    }

    pub fn to_query(&self, mapping: &StatusMapping, page: u32, limit: u32) -> ApplicationListQuery {
        ApplicationListQuery {
            statuses: self.effective_statuses(mapping),
            search: self.normalized_search(),
            page: page.max(1),
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }
}

/// Query for `GET /applications/{vendor|client}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationListQuery {
    pub statuses: Vec<ApplicationStatus>,
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ApplicationListQuery {
    fn default() -> Self {
        Self {
            statuses: Vec::new(),
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ApplicationListQuery {
    /// One `status` pair per selected status, then search and paging.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = self
            .statuses
            .iter()
            .map(|status| ("status", status.as_str().to_string()))
            .collect();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs
    }

    /// Parse decoded query pairs; unknown statuses and malformed numbers are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "status" => {
                    for raw in value.split(',') {
                        if let Ok(status) = raw.parse() {
                            if !query.statuses.contains(&status) {
                                query.statuses.push(status);
                            }
                        }
                    }
                }
                "search" => {
                    let term = value.trim();
                    if !term.is_empty() {
                        query.search = Some(term.to_string());
                    }
                }
                "page" => {
                    if let Ok(page) = value.parse::<u32>() {
                        query.page = page.max(1);
                    }
                }
                "limit" => {
                    if let Ok(limit) = value.parse::<u32>() {
                        if limit > 0 {
                            query.limit = limit;
                        }
                    }
                }
                _ => {}
            }
        }
        query
    }

    pub fn matches_status(&self, status: ApplicationStatus) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&status)
    }
}
