use std::collections::HashMap;

use crate::domain::{BucketRef, ItemId, Orderable, Update};
use crate::error::{BoardError, Result};
use crate::reorder::order_index::reassign;

/// A bucket's items in their current display order
#[derive(Debug)]
pub struct BucketSnapshot<'a, T> {
    pub bucket: BucketRef,
    pub items: &'a [T],
}

impl<'a, T> Clone for BucketSnapshot<'a, T> {
    fn clone(&self) -> Self {
        Self {
            bucket: self.bucket.clone(),
            items: self.items,
        }
    }
}

impl<'a, T: Orderable> BucketSnapshot<'a, T> {
    pub fn new(bucket: BucketRef, items: &'a [T]) -> Self {
        Self { bucket, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }
}

/// Working copy of an item's position, remembering where it started
#[derive(Debug, Clone)]
struct Slot {
    id: ItemId,
    bucket: BucketRef,
    order: i64,
    original_bucket: BucketRef,
    original_order: i64,
}

impl Slot {
    fn capture<T: Orderable>(item: &T) -> Self {
        Self {
            id: item.id().clone(),
            bucket: item.bucket().clone(),
            order: item.order(),
            original_bucket: item.bucket().clone(),
            original_order: item.order(),
        }
    }

    fn into_update(self) -> Option<Update> {
        let bucket_changed = self.bucket != self.original_bucket;
        if !bucket_changed && self.order == self.original_order {
            return None;
        }
        Some(Update {
            item_id: self.id,
            order: self.order,
            bucket: bucket_changed.then_some(self.bucket),
        })
    }
}

impl Orderable for Slot {
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

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(BoardError::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// Moves the item at `from` to `to` inside one bucket.
///
/// Only items whose order actually changes are returned; `from == to`
/// yields nothing.
///
/// # Arguments
/// * `bucket_items` - Members of the bucket in their current order
/// * `from` - Index of the dragged item
/// * `to` - Index it is dropped at
///
/// # Examples
/// ```
/// use sprintboard_core::domain::{ItemId, Ticket};
/// use sprintboard_core::reorder::reorder_within_bucket;
///
/// let items: Vec<Ticket> = ["T1", "T2", "T3"]
///     .iter()
///     .enumerate()
///     .map(|(order, id)| {
///         let mut ticket = Ticket::new(ItemId::new(*id), id.to_string());
///         ticket.order = order as i64;
///         ticket
///     })
///     .collect();
///
/// let updates = reorder_within_bucket(&items, 0, 2).unwrap();
/// assert_eq!(updates.len(), 3);
/// assert_eq!(updates[2].item_id.as_str(), "T1");
/// assert_eq!(updates[2].order, 2);
/// ```
pub fn reorder_within_bucket<T: Orderable>(
    bucket_items: &[T],
    from: usize,
    to: usize,
) -> Result<Vec<Update>> {
    check_index(from, bucket_items.len())?;
    check_index(to, bucket_items.len())?;

    if from == to {
        return Ok(Vec::new());
    }

    let mut slots: Vec<Slot> = bucket_items.iter().map(Slot::capture).collect();
    let moved = slots.remove(from);
    slots.insert(to, moved);
    reassign(&mut slots);

    let updates: Vec<Update> = slots.into_iter().filter_map(Slot::into_update).collect();
    tracing::debug!(from, to, changed = updates.len(), "computed in-bucket reorder");
    Ok(updates)
}

/// Moves `item_id` out of `source` and into `destination` at `dest_index`.
///
/// `dest_index` is clamped to `[0, len(destination)]`. Both sequences get
/// dense orders afterwards; the moved item's update always carries the new
/// bucket. When both snapshots name the same bucket this is an in-bucket
/// reorder.
pub fn move_between_buckets<T: Orderable>(
    source: BucketSnapshot<'_, T>,
    destination: BucketSnapshot<'_, T>,
    item_id: &ItemId,
    dest_index: usize,
) -> Result<Vec<Update>> {
    let from = source
        .position_of(item_id)
        .ok_or_else(|| BoardError::ItemNotFound(item_id.to_string()))?;

    if source.bucket == destination.bucket {
        let to = dest_index.min(source.len() - 1);
        return reorder_within_bucket(source.items, from, to);
    }

    if destination.position_of(item_id).is_some() {
        return Err(BoardError::InvalidArgument(format!(
            "item {} is already in {}",
            item_id, destination.bucket
        )));
    }

    let mut source_slots: Vec<Slot> = source.items.iter().map(Slot::capture).collect();
    let mut moved = source_slots.remove(from);
    moved.set_bucket(destination.bucket.clone());

    let mut dest_slots: Vec<Slot> = destination.items.iter().map(Slot::capture).collect();
    let index = dest_index.min(dest_slots.len());
    dest_slots.insert(index, moved);

    reassign(&mut source_slots);
    reassign(&mut dest_slots);

    let updates: Vec<Update> = source_slots
        .into_iter()
        .chain(dest_slots)
        .filter_map(Slot::into_update)
        .collect();

    tracing::debug!(
        item = %item_id,
        from = %source.bucket,
        to = %destination.bucket,
        index,
        changed = updates.len(),
        "computed cross-bucket move"
    );
    Ok(updates)
}

/// Applies updates to a local copy of the items.
///
/// Fails before touching anything if an update names an unknown item.
pub fn apply_updates<T: Orderable>(items: &mut [T], updates: &[Update]) -> Result<()> {
    let resolved: Vec<(usize, &Update)> = {
        let positions: HashMap<&ItemId, usize> = items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.id(), index))
            .collect();

        updates
            .iter()
            .map(|update| {
                positions
                    .get(&update.item_id)
                    .map(|index| (*index, update))
                    .ok_or_else(|| BoardError::ItemNotFound(update.item_id.to_string()))
            })
            .collect::<Result<_>>()?
    };

    for (index, update) in resolved {
        let item = &mut items[index];
        if let Some(bucket) = &update.bucket {
            item.set_bucket(bucket.clone());
        }
        item.set_order(update.order);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{members, Ticket};

    fn ticket(id: &str, bucket: BucketRef, order: i64) -> Ticket {
        let mut t = Ticket::new(ItemId::new(id), id.to_string());
        t.bucket = bucket;
        t.order = order;
        t
    }

    fn bucket_of(items: &[Ticket], bucket: &BucketRef) -> Vec<(String, i64)> {
        members(items, bucket)
            .iter()
            .map(|t| (t.id.to_string(), t.order))
            .collect()
    }

    #[test]
    fn test_reorder_first_to_last() {
        let sprint = BucketRef::sprint("sprint-1");
        let mut items = vec![
            ticket("T1", sprint.clone(), 0),
            ticket("T2", sprint.clone(), 1),
            ticket("T3", sprint.clone(), 2),
        ];

        let updates = reorder_within_bucket(&items, 0, 2).unwrap();
        assert_eq!(updates.len(), 3);
        assert!(updates.iter().all(|u| u.bucket.is_none()));

        apply_updates(&mut items, &updates).unwrap();
        assert_eq!(
            bucket_of(&items, &sprint),
            vec![
                ("T2".to_string(), 0),
                ("T3".to_string(), 1),
                ("T1".to_string(), 2)
            ]
        );
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("T2", BucketRef::Backlog, 1),
        ];
        for i in 0..items.len() {
            assert!(reorder_within_bucket(&items, i, i).unwrap().is_empty());
        }
    }

    #[test]
    fn test_reorder_matches_array_move_for_every_pair() {
        let len = 5;
        for from in 0..len {
            for to in 0..len {
                let mut items: Vec<Ticket> = (0..len)
                    .map(|i| ticket(&format!("T{}", i), BucketRef::Backlog, i as i64 * 10))
                    .collect();

                let mut expected: Vec<String> = items.iter().map(|t| t.id.to_string()).collect();
                let moved = expected.remove(from);
                expected.insert(to, moved);

                let updates = reorder_within_bucket(&items, from, to).unwrap();
                apply_updates(&mut items, &updates).unwrap();

                let actual: Vec<String> = members(&items, &BucketRef::Backlog)
                    .iter()
                    .map(|t| t.id.to_string())
                    .collect();
                assert_eq!(actual, expected, "move {} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_reorder_only_emits_changed_orders() {
        let items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("T2", BucketRef::Backlog, 1),
            ticket("T3", BucketRef::Backlog, 2),
            ticket("T4", BucketRef::Backlog, 3),
        ];

        let updates = reorder_within_bucket(&items, 2, 3).unwrap();
        let ids: Vec<&str> = updates.iter().map(|u| u.item_id.as_str()).collect();
        assert_eq!(ids, vec!["T4", "T3"]);
    }

    #[test]
    fn test_reorder_out_of_range() {
        let items = vec![ticket("T1", BucketRef::Backlog, 0)];
        let err = reorder_within_bucket(&items, 0, 1).unwrap_err();
        assert!(matches!(err, BoardError::IndexOutOfRange { index: 1, len: 1 }));
        assert!(err.is_invalid_argument());

        let empty: Vec<Ticket> = Vec::new();
        assert!(reorder_within_bucket(&empty, 0, 0).is_err());
    }

    #[test]
    fn test_move_backlog_to_sprint_front() {
        let sprint = BucketRef::sprint("sprint-1");
        let mut items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("T2", BucketRef::Backlog, 1),
            ticket("T3", sprint.clone(), 0),
        ];

        let backlog = members_owned_vec(&items, &BucketRef::Backlog);
        let dest = members_owned_vec(&items, &sprint);
        let updates = move_between_buckets(
            BucketSnapshot::new(BucketRef::Backlog, &backlog),
            BucketSnapshot::new(sprint.clone(), &dest),
            &ItemId::new("T1"),
            0,
        )
        .unwrap();

        let moved = updates.iter().find(|u| u.item_id.as_str() == "T1").unwrap();
        assert_eq!(moved.bucket, Some(sprint.clone()));

        apply_updates(&mut items, &updates).unwrap();
        assert_eq!(bucket_of(&items, &BucketRef::Backlog), vec![("T2".to_string(), 0)]);
        assert_eq!(
            bucket_of(&items, &sprint),
            vec![("T1".to_string(), 0), ("T3".to_string(), 1)]
        );
    }

    #[test]
    fn test_move_into_empty_bucket() {
        let sprint = BucketRef::sprint("sprint-2");
        let backlog = vec![ticket("T1", BucketRef::Backlog, 0)];
        let empty: Vec<Ticket> = Vec::new();

        let updates = move_between_buckets(
            BucketSnapshot::new(BucketRef::Backlog, &backlog),
            BucketSnapshot::new(sprint.clone(), &empty),
            &ItemId::new("T1"),
            4,
        )
        .unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].order, 0);
        assert_eq!(updates[0].bucket, Some(sprint));
    }

    #[test]
    fn test_move_index_beyond_length_appends() {
        let sprint = BucketRef::sprint("sprint-1");
        let mut items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("T2", sprint.clone(), 0),
            ticket("T3", sprint.clone(), 1),
        ];

        let backlog = members_owned_vec(&items, &BucketRef::Backlog);
        let dest = members_owned_vec(&items, &sprint);
        let updates = move_between_buckets(
            BucketSnapshot::new(BucketRef::Backlog, &backlog),
            BucketSnapshot::new(sprint.clone(), &dest),
            &ItemId::new("T1"),
            99,
        )
        .unwrap();

        apply_updates(&mut items, &updates).unwrap();
        let ids: Vec<String> = bucket_of(&items, &sprint).into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["T2", "T3", "T1"]);
        assert!(bucket_of(&items, &BucketRef::Backlog).is_empty());
    }

    #[test]
    fn test_move_within_same_bucket_delegates() {
        let items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("T2", BucketRef::Backlog, 1),
        ];

        let updates = move_between_buckets(
            BucketSnapshot::new(BucketRef::Backlog, &items),
            BucketSnapshot::new(BucketRef::Backlog, &items),
            &ItemId::new("T1"),
            10,
        )
        .unwrap();

        assert_eq!(updates.len(), 2);
        assert!(updates.iter().all(|u| u.bucket.is_none()));
    }

    #[test]
    fn test_move_unknown_item() {
        let items = vec![ticket("T1", BucketRef::Backlog, 0)];
        let empty: Vec<Ticket> = Vec::new();

        let err = move_between_buckets(
            BucketSnapshot::new(BucketRef::Backlog, &items),
            BucketSnapshot::new(BucketRef::sprint("s1"), &empty),
            &ItemId::new("T9"),
            0,
        )
        .unwrap_err();
        assert!(matches!(err, BoardError::ItemNotFound(_)));
    }

    #[test]
    fn test_apply_updates_rejects_unknown_item_atomically() {
        let mut items = vec![ticket("T1", BucketRef::Backlog, 5)];
        let updates = vec![
            Update {
                item_id: ItemId::new("T1"),
                order: 0,
                bucket: None,
            },
            Update {
                item_id: ItemId::new("T2"),
                order: 1,
                bucket: None,
            },
        ];

        assert!(apply_updates(&mut items, &updates).is_err());
        assert_eq!(items[0].order, 5);
    }

    fn members_owned_vec(items: &[Ticket], bucket: &BucketRef) -> Vec<Ticket> {
        crate::domain::members_owned(items, bucket)
    }
}
