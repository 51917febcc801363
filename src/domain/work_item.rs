use serde::{Deserialize, Serialize};

use crate::domain::bug::{Bug, Platform, Severity};
use crate::domain::item::{BucketRef, ItemId, ItemPatch, Orderable};
use crate::domain::ticket::Ticket;
use crate::view::{Filterable, SearchField, SortKey, SortValue};

/// Any item the board can hold
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum WorkItem {
    Ticket(Ticket),
    Bug(Bug),
}

impl WorkItem {
    pub fn title(&self) -> &str {
        match self {
            Self::Ticket(t) => &t.title,
            Self::Bug(b) => &b.title,
        }
    }

    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        match self {
            Self::Ticket(t) => t.apply_patch(patch),
            Self::Bug(b) => b.apply_patch(patch),
        }
    }

    pub fn as_ticket(&self) -> Option<&Ticket> {
        match self {
            Self::Ticket(t) => Some(t),
            Self::Bug(_) => None,
        }
    }

    pub fn as_bug(&self) -> Option<&Bug> {
        match self {
            Self::Bug(b) => Some(b),
            Self::Ticket(_) => None,
        }
    }
}

impl From<Ticket> for WorkItem {
    fn from(ticket: Ticket) -> Self {
        Self::Ticket(ticket)
    }
}

impl From<Bug> for WorkItem {
    fn from(bug: Bug) -> Self {
        Self::Bug(bug)
    }
}

impl Orderable for WorkItem {
    fn id(&self) -> &ItemId {
        match self {
            Self::Ticket(t) => t.id(),
            Self::Bug(b) => b.id(),
        }
    }

    fn bucket(&self) -> &BucketRef {
        match self {
            Self::Ticket(t) => t.bucket(),
            Self::Bug(b) => b.bucket(),
        }
    }

    fn order(&self) -> i64 {
        match self {
            Self::Ticket(t) => t.order(),
            Self::Bug(b) => b.order(),
        }
    }

    fn set_order(&mut self, order: i64) {
        match self {
            Self::Ticket(t) => t.set_order(order),
            Self::Bug(b) => b.set_order(order),
        }
    }

    fn set_bucket(&mut self, bucket: BucketRef) {
        match self {
            Self::Ticket(t) => t.set_bucket(bucket),
            Self::Bug(b) => b.set_bucket(bucket),
        }
    }
}

impl Filterable for WorkItem {
    fn search_text(&self, field: SearchField) -> Option<&str> {
        match self {
            Self::Ticket(t) => t.search_text(field),
            Self::Bug(b) => b.search_text(field),
        }
    }

    fn status_key(&self) -> &'static str {
        match self {
            Self::Ticket(t) => t.status_key(),
            Self::Bug(b) => b.status_key(),
        }
    }

    fn severity(&self) -> Option<Severity> {
        match self {
            Self::Ticket(t) => t.severity(),
            Self::Bug(b) => Filterable::severity(b),
        }
    }

    fn platform(&self) -> Option<Platform> {
        match self {
            Self::Ticket(t) => t.platform(),
            Self::Bug(b) => Filterable::platform(b),
        }
    }

    fn assignee(&self) -> Option<&str> {
        match self {
            Self::Ticket(t) => Filterable::assignee(t),
            Self::Bug(b) => Filterable::assignee(b),
        }
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match self {
            Self::Ticket(t) => t.sort_value(key),
            Self::Bug(b) => b.sort_value(key),
        }
    }
}
