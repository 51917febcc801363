//! Predicate stage of the view pipeline.
//!
//! Every active predicate must hold for an item to stay visible. Each
//! predicate has an "all" value that bypasses it.

use serde::{Deserialize, Serialize};

use crate::domain::{Orderable, Platform, Severity};
use crate::view::sorting::{SortKey, SortValue};

/// Text fields a search query is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Id,
    Title,
    Description,
    Assignee,
}

/// Read access the pipeline needs on top of [`Orderable`]
pub trait Filterable: Orderable {
    fn search_text(&self, field: SearchField) -> Option<&str>;

    /// Lowercase status key, e.g. "in_progress"
    fn status_key(&self) -> &'static str;

    fn severity(&self) -> Option<Severity> {
        None
    }

    fn platform(&self) -> Option<Platform> {
        None
    }

    fn assignee(&self) -> Option<&str>;

    fn sort_value(&self, key: SortKey) -> Option<SortValue>;
}

/// Status predicate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum StatusFilter {
    #[default]
    All,
    /// Status not in the closed set
    Active,
    /// Status in the closed set
    Closed,
    Exact(String),
}

/// Exact-match predicate with an "all" bypass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum FieldFilter<T> {
    #[default]
    All,
    Is(T),
}

impl<T: PartialEq> FieldFilter<T> {
    fn matches(&self, value: Option<T>) -> bool {
        match self {
            Self::All => true,
            Self::Is(wanted) => value.as_ref() == Some(wanted),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum AssigneeFilter {
    #[default]
    All,
    /// Items with no assignee
    Unassigned,
    Is(String),
}

/// Client-held filter configuration for one view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewFilter {
    pub search: String,
    pub status: StatusFilter,
    pub severity: FieldFilter<Severity>,
    pub platform: FieldFilter<Platform>,
    pub assignee: AssigneeFilter,
}

impl ViewFilter {
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = FieldFilter::Is(severity);
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = FieldFilter::Is(platform);
        self
    }

    pub fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = assignee;
        self
    }

    /// True when no predicate is active
    pub fn is_pass_through(&self) -> bool {
        self.search.trim().is_empty()
            && self.status == StatusFilter::All
            && self.severity == FieldFilter::All
            && self.platform == FieldFilter::All
            && self.assignee == AssigneeFilter::All
    }
}

/// Settings that give the predicates their meaning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria<'a> {
    pub closed_statuses: &'a [String],
    pub search_fields: &'a [SearchField],
}

impl<'a> FilterCriteria<'a> {
    pub fn new(closed_statuses: &'a [String], search_fields: &'a [SearchField]) -> Self {
        Self {
            closed_statuses,
            search_fields,
        }
    }

    fn is_closed(&self, status: &str) -> bool {
        self.closed_statuses.iter().any(|s| s == status)
    }
}

/// Checks an item against every active predicate
pub fn matches<T: Filterable>(item: &T, filter: &ViewFilter, criteria: &FilterCriteria) -> bool {
    matches_search(item, &filter.search, criteria.search_fields)
        && matches_status(item, &filter.status, criteria)
        && filter.severity.matches(item.severity())
        && filter.platform.matches(item.platform())
        && matches_assignee(item, &filter.assignee)
}

fn matches_search<T: Filterable>(item: &T, query: &str, fields: &[SearchField]) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let query_lower = query.to_lowercase();
    fields.iter().any(|field| {
        item.search_text(*field)
            .map(|text| text.to_lowercase().contains(&query_lower))
            .unwrap_or(false)
    })
}

fn matches_status<T: Filterable>(item: &T, filter: &StatusFilter, criteria: &FilterCriteria) -> bool {
    let status = item.status_key();
    match filter {
        StatusFilter::All => true,
        StatusFilter::Active => !criteria.is_closed(status),
        StatusFilter::Closed => criteria.is_closed(status),
        StatusFilter::Exact(wanted) => wanted.eq_ignore_ascii_case(status),
    }
}

fn matches_assignee<T: Filterable>(item: &T, filter: &AssigneeFilter) -> bool {
    match filter {
        AssigneeFilter::All => true,
        AssigneeFilter::Unassigned => item.assignee().is_none(),
        AssigneeFilter::Is(name) => item.assignee() == Some(name.as_str()),
    }
}
