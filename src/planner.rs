//! Glue between the pure ordering core and an injected [`Store`].

use std::collections::HashSet;

use crate::{
    config::BoardConfig,
    domain::{members_owned, BucketRef, ItemId, Orderable, Update, WorkItem},
    error::{BoardError, Result},
    reorder::{
        move_between_buckets, reorder_within_bucket, resolve_drop, BucketSnapshot, DragState,
        DropOutcome, RenderedBucket,
    },
    store::Store,
    view::{apply_filters, Page, ViewState},
};

/// An owned page of items
#[derive(Debug, Clone)]
pub struct ItemPage {
    pub items: Vec<WorkItem>,
    pub number: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Runs board gestures against a store.
///
/// Each call reads a fresh snapshot, computes the updates, and writes them
/// back in order before returning them. Every target item and bucket is
/// checked before the first write, but the store has no transactions: a
/// write failing midway leaves the earlier updates of that gesture applied.
///
/// Gestures are not serialized here. Callers must finish one gesture
/// before starting the next, or two of them may compute from the same
/// snapshot.
pub struct Planner<S: Store> {
    store: S,
    config: BoardConfig,
}

impl<S: Store> Planner<S> {
    pub fn new(store: S, config: BoardConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Items of one bucket in stored order
    pub async fn bucket_items(&self, bucket: &BucketRef) -> Result<Vec<WorkItem>> {
        self.ensure_bucket(bucket).await?;
        let items = self.store.list_items().await?;
        Ok(members_owned(&items, bucket))
    }

    /// Moves the item at `from` to `to` inside `bucket`
    pub async fn reorder(&self, bucket: &BucketRef, from: usize, to: usize) -> Result<Vec<Update>> {
        let items = self.bucket_items(bucket).await?;
        let updates = reorder_within_bucket(&items, from, to)?;
        self.apply(&updates).await?;
        Ok(updates)
    }

    /// Moves an item to `destination` at `dest_index`, wherever it lives now
    pub async fn move_item(
        &self,
        item_id: &ItemId,
        destination: &BucketRef,
        dest_index: usize,
    ) -> Result<Vec<Update>> {
        self.ensure_bucket(destination).await?;
        let items = self.store.list_items().await?;
        let source = items
            .iter()
            .find(|item| item.id() == item_id)
            .map(|item| item.bucket().clone())
            .ok_or_else(|| BoardError::ItemNotFound(item_id.to_string()))?;

        let source_items = members_owned(&items, &source);
        let dest_items = members_owned(&items, destination);
        let updates = move_between_buckets(
            BucketSnapshot::new(source, &source_items),
            BucketSnapshot::new(destination.clone(), &dest_items),
            item_id,
            dest_index,
        )?;

        self.apply(&updates).await?;
        Ok(updates)
    }

    /// Finishes a drag made against buckets rendered through `view`
    pub async fn complete_drag(&self, drag: &DragState, view: &ViewState) -> Result<DropOutcome> {
        let items = self.store.list_items().await?;
        let criteria = self.config.filter_criteria();

        let mut buckets = vec![drag.source.clone()];
        if let Some(target) = &drag.destination {
            if target.bucket != drag.source {
                if !self.bucket_exists(&target.bucket).await? {
                    tracing::debug!(bucket = ?target.bucket, "drop on unknown bucket cancelled");
                    return Ok(DropOutcome::Cancelled);
                }
                buckets.push(target.bucket.clone());
            }
        }

        let snapshots: Vec<(BucketRef, Vec<WorkItem>)> = buckets
            .into_iter()
            .map(|bucket| {
                let members = members_owned(&items, &bucket);
                (bucket, members)
            })
            .collect();
        let visible: Vec<Vec<ItemId>> = snapshots
            .iter()
            .map(|(_, members)| apply_filters(members, view, &criteria).ids())
            .collect();
        let rendered: Vec<RenderedBucket<'_, WorkItem>> = snapshots
            .iter()
            .zip(&visible)
            .map(|((bucket, members), ids)| {
                RenderedBucket::new(BucketSnapshot::new(bucket.clone(), members), ids)
            })
            .collect();

        let outcome = resolve_drop(drag, &rendered, view.sort, self.config.sorted_drag)?;
        self.apply(outcome.updates()).await?;
        Ok(outcome)
    }

    /// Filtered and sorted view over every item
    pub async fn view(&self, state: &ViewState) -> Result<Vec<WorkItem>> {
        let items = self.store.list_items().await?;
        let criteria = self.config.filter_criteria();
        Ok(apply_filters(&items, state, &criteria).to_owned_items())
    }

    /// Filtered and sorted view over one bucket
    pub async fn bucket_view(&self, bucket: &BucketRef, state: &ViewState) -> Result<Vec<WorkItem>> {
        let items = self.bucket_items(bucket).await?;
        let criteria = self.config.filter_criteria();
        Ok(apply_filters(&items, state, &criteria).to_owned_items())
    }

    /// One page of [`Planner::view`] using the configured page size
    pub async fn page(&self, state: &ViewState, number: usize) -> Result<ItemPage> {
        let items = self.store.list_items().await?;
        let criteria = self.config.filter_criteria();
        let view = apply_filters(&items, state, &criteria);
        let page = view.paginate(Page::new(number, self.config.page_size));

        Ok(ItemPage {
            items: page.items.iter().map(|item| (*item).clone()).collect(),
            number: page.number,
            total_items: page.total_items,
            total_pages: page.total_pages,
        })
    }

    async fn bucket_exists(&self, bucket: &BucketRef) -> Result<bool> {
        let Some(id) = bucket.sprint_id() else {
            return Ok(true);
        };
        let buckets = self.store.list_buckets().await?;
        Ok(buckets.iter().any(|b| &b.id == id))
    }

    async fn ensure_bucket(&self, bucket: &BucketRef) -> Result<()> {
        if self.bucket_exists(bucket).await? {
            return Ok(());
        }
        let id = bucket.sprint_id().map(ToString::to_string).unwrap_or_default();
        Err(BoardError::BucketNotFound(id))
    }

    /// Fails before any write if an update names a missing item or bucket
    async fn check_targets(&self, updates: &[Update]) -> Result<()> {
        let items = self.store.list_items().await?;
        let ids: HashSet<&ItemId> = items.iter().map(|item| item.id()).collect();
        for update in updates {
            if !ids.contains(&update.item_id) {
                return Err(BoardError::ItemNotFound(update.item_id.to_string()));
            }
            if let Some(bucket) = &update.bucket {
                self.ensure_bucket(bucket).await?;
            }
        }
        Ok(())
    }

    async fn apply(&self, updates: &[Update]) -> Result<()> {
        if updates.is_empty() {
            return Ok(());
        }
        self.check_targets(updates).await?;

        for update in updates {
            let (id, patch) = update.clone().into_patch();
            if let Err(err) = self.store.update_item(&id, patch).await {
                tracing::warn!(item = %id, error = %err, "failed to persist order update");
                return Err(err);
            }
        }
        tracing::info!(count = updates.len(), "applied order updates");
        Ok(())
    }
}
