use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::view::filter::Filterable;

/// Fields available for explicit sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Id,
    Title,
    Status,
    Severity,
    Priority,
    Platform,
    Assignee,
    Created,
    Updated,
    Due,
    StoryPoints,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortKey::Id),
            "title" => Ok(SortKey::Title),
            "status" => Ok(SortKey::Status),
            "severity" => Ok(SortKey::Severity),
            "priority" => Ok(SortKey::Priority),
            "platform" => Ok(SortKey::Platform),
            "assignee" => Ok(SortKey::Assignee),
            "created" => Ok(SortKey::Created),
            "updated" => Ok(SortKey::Updated),
            "due" => Ok(SortKey::Due),
            "story-points" | "points" => Ok(SortKey::StoryPoints),
            _ => Err(format!(
                "Invalid sort key '{}'. Valid keys: id, title, status, severity, priority, platform, assignee, created, updated, due, story-points",
                s
            )),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            _ => Err(format!(
                "Invalid sort direction '{}'. Valid directions: asc, desc",
                s
            )),
        }
    }
}

/// Comparable projection of a field
///
/// A given key always yields the same variant, so the derived ordering only
/// ever compares like with like.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    /// Lowercased text
    Text(String),
    /// Workflow or severity rank
    Rank(u8),
    Number(i64),
    Date(DateTime<Utc>),
}

impl SortValue {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_lowercase())
    }
}

/// Column sort state of a table header
///
/// Clicking a new key starts ascending; clicking the same key again goes
/// ascending, descending, then back to no explicit sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "direction", content = "key")]
pub enum SortState {
    #[default]
    None,
    Asc(SortKey),
    Desc(SortKey),
}

impl SortState {
    pub fn next(self, key: SortKey) -> SortState {
        match self {
            SortState::Asc(current) if current == key => SortState::Desc(key),
            SortState::Desc(current) if current == key => SortState::None,
            _ => SortState::Asc(key),
        }
    }

    pub fn key(&self) -> Option<SortKey> {
        match self {
            SortState::None => None,
            SortState::Asc(key) | SortState::Desc(key) => Some(*key),
        }
    }

    pub fn direction(&self) -> Option<SortDirection> {
        match self {
            SortState::None => None,
            SortState::Asc(_) => Some(SortDirection::Ascending),
            SortState::Desc(_) => Some(SortDirection::Descending),
        }
    }

    /// True when an explicit key overrides the stored order
    pub fn is_explicit(&self) -> bool {
        !matches!(self, SortState::None)
    }
}

/// Advances the header sort state for a click on `key`
pub fn next_sort_state(current: SortState, key: SortKey) -> SortState {
    current.next(key)
}

/// Sorts a view in place.
///
/// With an explicit key, items lacking the field always come last and ties
/// keep their input order. Without one, items are ordered by ascending
/// `order`.
///
/// # Examples
/// ```
/// use sprintboard_core::domain::{ItemId, Ticket};
/// use sprintboard_core::view::{sort_view, SortKey, SortState};
///
/// let mut unassigned = Ticket::new(ItemId::new("T1"), "Login".to_string());
/// unassigned.assignee = None;
/// let mut alice = Ticket::new(ItemId::new("T2"), "Search".to_string());
/// alice.assignee = Some("alice".to_string());
///
/// let mut view = vec![&unassigned, &alice];
/// sort_view(&mut view, SortState::Desc(SortKey::Assignee));
/// assert_eq!(view[0].id.as_str(), "T2");
/// assert_eq!(view[1].id.as_str(), "T1");
/// ```
pub fn sort_view<T: Filterable>(items: &mut [&T], state: SortState) {
    match (state.key(), state.direction()) {
        (Some(key), Some(direction)) => items.sort_by(|a, b| {
            compare_missing_last(a.sort_value(key), b.sort_value(key), direction)
        }),
        _ => items.sort_by_key(|item| item.order()),
    }
}

/// Compares optional values with `None` sorting to the end
///
/// The direction only flips the comparison between present values;
/// absence stays greater in both directions.
fn compare_missing_last(
    a: Option<SortValue>,
    b: Option<SortValue>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.cmp(&b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
