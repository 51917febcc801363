use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::domain::item::{BucketRef, ItemId, ItemPatch, Orderable};
use crate::error::BoardError;
use crate::view::{Filterable, SearchField, SortKey, SortValue};

/// Lifecycle status of a bug report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BugStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
    WontFix,
}

impl BugStatus {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
            Self::WontFix => "wont_fix",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Open => 0,
            Self::InProgress => 1,
            Self::Resolved => 2,
            Self::Closed => 3,
            Self::WontFix => 4,
        }
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Resolved => write!(f, "Resolved"),
            Self::Closed => write!(f, "Closed"),
            Self::WontFix => write!(f, "Won't Fix"),
        }
    }
}

/// Impact of a bug; ranks ascend from trivial to critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trivial,
    Minor,
    Major,
    Critical,
}

impl Severity {
    fn rank(&self) -> u8 {
        match self {
            Self::Trivial => 0,
            Self::Minor => 1,
            Self::Major => 2,
            Self::Critical => 3,
        }
    }
}

impl FromStr for Severity {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trivial" => Ok(Self::Trivial),
            "minor" => Ok(Self::Minor),
            "major" => Ok(Self::Major),
            "critical" => Ok(Self::Critical),
            _ => Err(BoardError::InvalidArgument(format!(
                "unknown severity '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trivial => write!(f, "trivial"),
            Self::Minor => write!(f, "minor"),
            Self::Major => write!(f, "major"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Where a bug was observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Ios,
    Android,
    Desktop,
    Api,
}

impl FromStr for Platform {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "desktop" => Ok(Self::Desktop),
            "api" => Ok(Self::Api),
            _ => Err(BoardError::InvalidArgument(format!(
                "unknown platform '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Ios => write!(f, "ios"),
            Self::Android => write!(f, "android"),
            Self::Desktop => write!(f, "desktop"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// A bug report in the bug tracker table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bug {
    pub id: ItemId,
    pub title: String,
    pub description: Option<String>,
    pub status: BugStatus,
    pub severity: Severity,
    pub platform: Platform,
    pub assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    #[serde(default)]
    pub bucket: BucketRef,
    #[serde(default)]
    pub order: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bug {
    pub fn new(id: ItemId, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            description: None,
            status: BugStatus::Open,
            severity: Severity::Minor,
            platform: Platform::Web,
            assignee: None,
            reporter: None,
            bucket: BucketRef::Backlog,
            order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: BugStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn assign(&mut self, assignee: Option<String>) {
        self.assignee = assignee;
        self.updated_at = Utc::now();
    }

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

impl Orderable for Bug {
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

impl Filterable for Bug {
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

    fn severity(&self) -> Option<Severity> {
        Some(self.severity)
    }

    fn platform(&self) -> Option<Platform> {
        Some(self.platform)
    }

    fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue> {
        match key {
            SortKey::Id => Some(SortValue::text(self.id.as_str())),
            SortKey::Title => Some(SortValue::text(&self.title)),
            SortKey::Status => Some(SortValue::Rank(self.status.rank())),
            SortKey::Severity => Some(SortValue::Rank(self.severity.rank())),
            SortKey::Platform => Some(SortValue::text(&self.platform.to_string())),
            SortKey::Assignee => self.assignee.as_deref().map(SortValue::text),
            SortKey::Created => Some(SortValue::Date(self.created_at)),
            SortKey::Updated => Some(SortValue::Date(self.updated_at)),
            SortKey::Priority | SortKey::Due | SortKey::StoryPoints => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parsing() {
        assert_eq!(Severity::from_str("CRITICAL").unwrap(), Severity::Critical);
        assert!(Severity::from_str("blocker").is_err());
        assert_eq!(Severity::Major.to_string(), "major");
    }

    #[test]
    fn test_platform_parsing() {
        assert_eq!(Platform::from_str("iOS").unwrap(), Platform::Ios);
        assert!(Platform::from_str("watch").is_err());
    }

    #[test]
    fn test_severity_rank_ascends() {
        assert!(Severity::Trivial.rank() < Severity::Minor.rank());
        assert!(Severity::Major.rank() < Severity::Critical.rank());
    }

    #[test]
    fn test_status_change_updates_timestamp() {
        let mut bug = Bug::new(ItemId::new("BUG-1"), "Crash".to_string());
        let initial_updated_at = bug.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        bug.set_status(BugStatus::Resolved);

        assert_eq!(bug.status_key(), "resolved");
        assert!(bug.updated_at > initial_updated_at);
    }

    #[test]
    fn test_bug_roundtrip_json() {
        let mut bug = Bug::new(ItemId::new("BUG-2"), "Slow search".to_string());
        bug.severity = Severity::Critical;
        bug.platform = Platform::Android;
        bug.reporter = Some("qa".to_string());

        let json = serde_json::to_string(&bug).unwrap();
        assert!(json.contains(r#""severity":"critical""#));
        assert!(json.contains(r#""status":"open""#));

        let back: Bug = serde_json::from_str(&json).unwrap();
        assert_eq!(back.platform, Platform::Android);
        assert_eq!(back.reporter.as_deref(), Some("qa"));
    }
}
