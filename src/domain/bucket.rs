use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::item::{BucketId, BucketRef, Orderable};
use crate::error::{BoardError, Result};

/// Lifecycle of a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintStatus {
    Planned,
    Active,
    Completed,
}

impl fmt::Display for SprintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planned => write!(f, "Planned"),
            Self::Active => write!(f, "Active"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// A sprint: a named partition of items.
///
/// Buckets do not own items; items point at their bucket and membership is
/// derived with [`members`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bucket {
    pub id: BucketId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    pub status: SprintStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl Bucket {
    pub fn new(id: BucketId, name: String) -> Self {
        Self {
            id,
            name,
            goal: None,
            status: SprintStatus::Planned,
            start_date: None,
            end_date: None,
        }
    }

    pub fn reference(&self) -> BucketRef {
        BucketRef::Sprint(self.id.clone())
    }

    pub fn set_goal(&mut self, goal: String) {
        self.goal = Some(goal);
    }

    /// Sets both dates atomically with validation
    pub fn set_date_range(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
        if start > end {
            return Err(BoardError::InvalidDateRange {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        self.start_date = Some(start);
        self.end_date = Some(end);
        Ok(())
    }

    pub fn start(&mut self) {
        self.status = SprintStatus::Active;
    }

    pub fn complete(&mut self) {
        self.status = SprintStatus::Completed;
    }

    pub fn is_active(&self) -> bool {
        self.status == SprintStatus::Active
    }
}

/// Returns the items belonging to `bucket`, sorted by ascending order.
///
/// The sort is stable, so items sharing an order keep their input order.
pub fn members<'a, T: Orderable>(items: &'a [T], bucket: &BucketRef) -> Vec<&'a T> {
    let mut members: Vec<&T> = items.iter().filter(|i| i.bucket() == bucket).collect();
    members.sort_by_key(|i| i.order());
    members
}

/// Owned variant of [`members`]
pub fn members_owned<T: Orderable + Clone>(items: &[T], bucket: &BucketRef) -> Vec<T> {
    members(items, bucket).into_iter().cloned().collect()
}
