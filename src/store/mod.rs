use crate::{
    domain::{Bucket, ItemId, ItemPatch, WorkItem},
    error::Result,
};
use async_trait::async_trait;

pub mod memory;

pub use memory::InMemoryStore;

/// Data layer that owns items and buckets.
///
/// The ordering core never holds authoritative state; it reads snapshots
/// through this trait and writes back through [`Store::update_item`].
/// Implementations serialize writes.
#[async_trait]
pub trait Store: Send + Sync {
    /// Lists every item
    async fn list_items(&self) -> Result<Vec<WorkItem>>;

    /// Lists the sprints; the backlog is implicit
    async fn list_buckets(&self) -> Result<Vec<Bucket>>;

    /// Loads an item by ID
    async fn get_item(&self, id: &ItemId) -> Result<WorkItem>;

    /// Applies a patch and returns the updated item
    async fn update_item(&self, id: &ItemId, patch: ItemPatch) -> Result<WorkItem>;
}
