use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::domain::item::{BucketRef, ItemId, ItemPatch, Orderable};
use crate::error::BoardError;
use crate::view::{Filterable, SearchField, SortKey, SortValue};

/// Workflow status of a sprint ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Todo,
    InProgress,
    InReview,
    Done,
}

impl TicketStatus {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::InReview => "in_review",
            Self::Done => "done",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Todo => 0,
            Self::InProgress => 1,
            Self::InReview => 2,
            Self::Done => 3,
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::InReview => write!(f, "In Review"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(&[' ', '-'][..], "_").as_str() {
            "todo" | "to_do" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "in_review" | "review" => Ok(Self::InReview),
            "done" => Ok(Self::Done),
            _ => Err(BoardError::InvalidArgument(format!(
                "unknown ticket status '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    fn rank(&self) -> u8 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
            Self::Urgent => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Urgent => write!(f, "Urgent"),
        }
    }
}

/// A sprint planning ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub status: TicketStatus,
    pub priority: Priority,
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story_points: Option<u32>,
    #[serde(default)]
    pub bucket: BucketRef,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Creates a backlog ticket with the given ID and title
    pub fn new(id: ItemId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: None,
            status: TicketStatus::Todo,
            priority: Priority::Medium,
            assignee: None,
            story_points: None,
            bucket: BucketRef::Backlog,
            order: 0,
            created_at: now,
            updated_at: now,
            due_date: None,
        }
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    pub fn set_description(&mut self, description: String) {
        self.description = Some(description);
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: TicketStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn assign(&mut self, assignee: Option<String>) {
        self.assignee = assignee;
        self.updated_at = Utc::now();
    }

    pub fn set_due_date(&mut self, due: Option<DateTime<Utc>>) {
        self.due_date = due;
        self.updated_at = Utc::now();
    }

    /// Applies a data-layer patch
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(bucket) = &patch.bucket {
            self.bucket = bucket.clone();
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(assignee) = &patch.assignee {
            self.assignee = assignee.clone();
        }
        if !patch.is_empty() {
            self.updated_at = Utc::now();
        }
    }
}

impl Orderable for Ticket {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn bucket(&self) -> &BucketRef {
        &self.bucket
    }

    fn order(&self) -> i64 {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = order;
    }

    fn set_bucket(&mut self, bucket: BucketRef) {
        self.bucket = bucket;
    }
}

impl Filterable for Ticket {
    fn search_text(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Id => Some(self.id.as_str()),
            SearchField::Title => Some(&self.title),
            SearchField::Description => self.description.as_deref(),
            SearchField::Assignee => self.assignee.as_deref(),
        }
    }

    fn status_key(&self) -> &'static str {
        self.status.key()
    }

    fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Id => Some(SortValue::text(self.id.as_str())),
            SortKey::Title => Some(SortValue::text(&self.title)),
            SortKey::Status => Some(SortValue::Rank(self.status.rank())),
            SortKey::Priority => Some(SortValue::Rank(self.priority.rank())),
            SortKey::Assignee => self.assignee.as_deref().map(SortValue::text),
            SortKey::Created => Some(SortValue::Date(self.created_at)),
            SortKey::Updated => Some(SortValue::Date(self.updated_at)),
            SortKey::Due => self.due_date.map(SortValue::Date),
            SortKey::StoryPoints => self.story_points.map(|p| SortValue::Number(i64::from(p))),
            SortKey::Severity | SortKey::Platform => None,
        }
    }
}
