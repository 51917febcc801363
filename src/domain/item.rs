use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

use crate::error::BoardError;

/// Opaque identifier of a ticket or bug (e.g., T-12, BUG-7)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(BoardError::InvalidArgument(
                "item id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a sprint
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(String);

impl BucketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The container an item lives in: a sprint, or the unbucketed backlog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum BucketRef {
    #[default]
    Backlog,
    Sprint(BucketId),
}

impl BucketRef {
    pub fn sprint(id: impl Into<String>) -> Self {
        Self::Sprint(BucketId::new(id))
    }

    pub fn is_backlog(&self) -> bool {
        matches!(self, Self::Backlog)
    }

    pub fn sprint_id(&self) -> Option<&BucketId> {
        match self {
            Self::Backlog => None,
            Self::Sprint(id) => Some(id),
        }
    }
}

impl From<Option<BucketId>> for BucketRef {
    fn from(id: Option<BucketId>) -> Self {
        id.map_or(Self::Backlog, Self::Sprint)
    }
}

impl fmt::Display for BucketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backlog => write!(f, "backlog"),
            Self::Sprint(id) => write!(f, "sprint {}", id),
        }
    }
}

/// Capability shared by everything that can be positioned inside a bucket.
///
/// The ordering core only ever sees items through this trait, so tickets
/// and bugs are reconciled by the same code.
pub trait Orderable {
    fn id(&self) -> &ItemId;
    fn bucket(&self) -> &BucketRef;
    fn order(&self) -> i64;
    fn set_order(&mut self, order: i64);
    fn set_bucket(&mut self, bucket: BucketRef);
}

/// Partial modification sent to the data layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<BucketRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `Some(None)` unassigns the item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Option<String>>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.bucket.is_none()
            && self.order.is_none()
            && self.title.is_none()
            && self.assignee.is_none()
    }
}

/// One positional change computed by the reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub item_id: ItemId,
    pub order: i64,
    /// Present only when the item changes bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<BucketRef>,
}

impl Update {
    pub fn into_patch(self) -> (ItemId, ItemPatch) {
        let patch = ItemPatch {
            bucket: self.bucket,
            order: Some(self.order),
            ..ItemPatch::default()
        };
        (self.item_id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_parsing() {
        let id = ItemId::from_str("  T-1 ").unwrap();
        assert_eq!(id.as_str(), "T-1");
        assert!(ItemId::from_str("   ").is_err());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(ItemId::generate(), ItemId::generate());
        assert_ne!(BucketId::generate(), BucketId::generate());
    }

    #[test]
    fn test_bucket_ref_from_option() {
        assert_eq!(BucketRef::from(None), BucketRef::Backlog);
        assert_eq!(
            BucketRef::from(Some(BucketId::new("s1"))),
            BucketRef::sprint("s1")
        );
        assert!(BucketRef::Backlog.sprint_id().is_none());
    }

    #[test]
    fn test_bucket_ref_serialization() {
        let json = serde_json::to_string(&BucketRef::sprint("s1")).unwrap();
        assert_eq!(json, r#"{"kind":"sprint","id":"s1"}"#);

        let backlog: BucketRef = serde_json::from_str(r#"{"kind":"backlog"}"#).unwrap();
        assert!(backlog.is_backlog());
    }

    #[test]
    fn test_update_into_patch() {
        let update = Update {
            item_id: ItemId::new("T1"),
            order: 3,
            bucket: Some(BucketRef::Backlog),
        };

        let (id, patch) = update.into_patch();
        assert_eq!(id.as_str(), "T1");
        assert_eq!(patch.order, Some(3));
        assert_eq!(patch.bucket, Some(BucketRef::Backlog));
        assert!(patch.title.is_none());
        assert!(!patch.is_empty());
        assert!(ItemPatch::default().is_empty());
    }
}
