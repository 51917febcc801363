use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    domain::{Bucket, BucketRef, ItemId, ItemPatch, Orderable, WorkItem},
    error::{BoardError, Result},
    store::Store,
};

/// Store kept entirely in memory, for embedding hosts and tests
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<WorkItem>>,
    buckets: RwLock<Vec<Bucket>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(items: Vec<WorkItem>, buckets: Vec<Bucket>) -> Self {
        Self {
            items: RwLock::new(items),
            buckets: RwLock::new(buckets),
        }
    }

    pub async fn insert_item(&self, item: WorkItem) -> Result<()> {
        self.ensure_bucket_exists(item.bucket()).await?;

        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id() == item.id()) {
            return Err(BoardError::InvalidArgument(format!(
                "item {} already exists",
                item.id()
            )));
        }
        items.push(item);
        Ok(())
    }

    pub async fn insert_bucket(&self, bucket: Bucket) {
        self.buckets.write().await.push(bucket);
    }

    async fn ensure_bucket_exists(&self, bucket: &BucketRef) -> Result<()> {
        let Some(id) = bucket.sprint_id() else {
            return Ok(());
        };
        let buckets = self.buckets.read().await;
        if buckets.iter().any(|b| &b.id == id) {
            Ok(())
        } else {
            Err(BoardError::BucketNotFound(id.to_string()))
        }
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_items(&self) -> Result<Vec<WorkItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        Ok(self.buckets.read().await.clone())
    }

    async fn get_item(&self, id: &ItemId) -> Result<WorkItem> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))
    }

    async fn update_item(&self, id: &ItemId, patch: ItemPatch) -> Result<WorkItem> {
        if let Some(bucket) = &patch.bucket {
            self.ensure_bucket_exists(bucket).await?;
        }

        let mut items = self.items.write().await;
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))?;

        item.apply_patch(&patch);
        Ok(item.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BucketId, Bug, Ticket};

    fn store() -> InMemoryStore {
        InMemoryStore::with_data(
            vec![
                WorkItem::from(Ticket::new(ItemId::new("T1"), "First".to_string())),
                WorkItem::from(Bug::new(ItemId::new("BUG-1"), "Crash".to_string())),
            ],
            vec![Bucket::new(BucketId::new("s1"), "Sprint 1".to_string())],
        )
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let store = store();

        assert_eq!(store.list_items().await.unwrap().len(), 2);
        assert_eq!(store.list_buckets().await.unwrap().len(), 1);

        let item = store.get_item(&ItemId::new("BUG-1")).await.unwrap();
        assert_eq!(item.title(), "Crash");

        let missing = store.get_item(&ItemId::new("T9")).await;
        assert!(matches!(missing, Err(BoardError::ItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_update_item_applies_patch() {
        let store = store();
        let patch = ItemPatch {
            bucket: Some(BucketRef::sprint("s1")),
            order: Some(3),
            ..ItemPatch::default()
        };

        let updated = store.update_item(&ItemId::new("T1"), patch).await.unwrap();
        assert_eq!(updated.bucket(), &BucketRef::sprint("s1"));
        assert_eq!(updated.order(), 3);

        let reloaded = store.get_item(&ItemId::new("T1")).await.unwrap();
        assert_eq!(reloaded.order(), 3);
    }

    #[tokio::test]
    async fn test_update_into_unknown_bucket_fails() {
        let store = store();
        let patch = ItemPatch {
            bucket: Some(BucketRef::sprint("nope")),
            ..ItemPatch::default()
        };

        let result = store.update_item(&ItemId::new("T1"), patch).await;
        assert!(matches!(result, Err(BoardError::BucketNotFound(_))));

        let unchanged = store.get_item(&ItemId::new("T1")).await.unwrap();
        assert!(unchanged.bucket().is_backlog());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates() {
        let store = InMemoryStore::new();
        let ticket = WorkItem::from(Ticket::new(ItemId::new("T1"), "First".to_string()));

        store.insert_item(ticket.clone()).await.unwrap();
        assert!(store.insert_item(ticket).await.is_err());

        let mut in_sprint = Ticket::new(ItemId::new("T2"), "Second".to_string());
        in_sprint.bucket = BucketRef::sprint("s1");
        assert!(store.insert_item(in_sprint.clone().into()).await.is_err());

        store
            .insert_bucket(Bucket::new(BucketId::new("s1"), "Sprint 1".to_string()))
            .await;
        assert!(store.insert_item(in_sprint.into()).await.is_ok());
    }
}
