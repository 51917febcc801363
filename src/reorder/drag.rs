//! Resolving a drop made against a rendered (possibly filtered or sorted)
//! view back onto the underlying bucket order.

use serde::{Deserialize, Serialize};

use crate::domain::{BucketRef, ItemId, Orderable, Update};
use crate::error::{BoardError, Result};
use crate::reorder::reconciler::{move_between_buckets, reorder_within_bucket, BucketSnapshot};
use crate::view::SortState;

/// What a drop does while the view carries an explicit sort
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortedDragPolicy {
    /// Reject the drop; reordering is only offered in the stored order
    #[default]
    Disabled,
    /// Rewrite the stored order and keep showing the explicit sort
    ReorderUnderlying,
    /// Rewrite the stored order and revert the view to the stored order
    ResetSortOnDrop,
}

/// Where an item is currently hovering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub bucket: BucketRef,
    /// Index in the destination view
    pub index: usize,
}

/// An in-flight move, alive from drag start until drop or cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragState {
    pub item_id: ItemId,
    pub source: BucketRef,
    /// Index in the source view
    pub source_index: usize,
    pub destination: Option<DropTarget>,
}

impl DragState {
    pub fn begin(item_id: ItemId, source: BucketRef, source_index: usize) -> Self {
        Self {
            item_id,
            source,
            source_index,
            destination: None,
        }
    }

    /// Records the current hover target; `None` means outside any bucket
    pub fn hover(&mut self, target: Option<DropTarget>) {
        self.destination = target;
    }
}

/// A bucket as rendered: its stored sequence plus the ids the view shows
#[derive(Debug)]
pub struct RenderedBucket<'a, T> {
    pub snapshot: BucketSnapshot<'a, T>,
    /// Visible item ids in view order
    pub visible: &'a [ItemId],
}

impl<'a, T: Orderable> RenderedBucket<'a, T> {
    pub fn new(snapshot: BucketSnapshot<'a, T>, visible: &'a [ItemId]) -> Self {
        Self { snapshot, visible }
    }

    /// Maps a view index onto the stored sequence.
    ///
    /// An index past the end of the view lands right after the last visible
    /// item, or at the end of the bucket when nothing is visible.
    fn bucket_index(&self, view_index: usize) -> Result<usize> {
        let anchor = match self.visible.get(view_index) {
            Some(id) => return self.stored_position(id),
            None => self.visible.last(),
        };
        match anchor {
            Some(id) => Ok(self.stored_position(id)? + 1),
            None => Ok(self.snapshot.len()),
        }
    }

    fn stored_position(&self, id: &ItemId) -> Result<usize> {
        self.snapshot
            .position_of(id)
            .ok_or_else(|| BoardError::ItemNotFound(id.to_string()))
    }
}

/// Result of finishing a drag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped outside any bucket; the view keeps its pre-drag order
    Cancelled,
    /// Refused by the sorted-drag policy
    Rejected(String),
    Apply {
        updates: Vec<Update>,
        /// The caller must revert its sort state to `SortState::None`
        reset_sort: bool,
    },
}

impl DropOutcome {
    pub fn updates(&self) -> &[Update] {
        match self {
            Self::Apply { updates, .. } => updates,
            _ => &[],
        }
    }
}

/// Turns a finished drag into the updates to persist.
///
/// `rendered` must contain the source bucket; a drop onto a bucket that is
/// not rendered is treated like a drop outside any bucket.
pub fn resolve_drop<T: Orderable>(
    drag: &DragState,
    rendered: &[RenderedBucket<'_, T>],
    sort: SortState,
    policy: SortedDragPolicy,
) -> Result<DropOutcome> {
    let Some(target) = &drag.destination else {
        tracing::debug!(item = %drag.item_id, "drag cancelled outside any bucket");
        return Ok(DropOutcome::Cancelled);
    };

    let source = find(rendered, &drag.source).ok_or_else(|| {
        BoardError::InvalidArgument(format!("source {} is not rendered", drag.source))
    })?;
    let Some(destination) = find(rendered, &target.bucket) else {
        tracing::warn!(item = %drag.item_id, bucket = %target.bucket, "drop onto unknown bucket ignored");
        return Ok(DropOutcome::Cancelled);
    };

    if source.visible.get(drag.source_index) != Some(&drag.item_id) {
        return Err(BoardError::InvalidArgument(format!(
            "item {} is not at view index {} of {}",
            drag.item_id, drag.source_index, drag.source
        )));
    }

    let reset_sort = match (sort.key(), policy) {
        (None, _) => false,
        (Some(key), SortedDragPolicy::Disabled) => {
            let reason = format!("reordering is disabled while sorted by {:?}", key);
            tracing::warn!(item = %drag.item_id, "{}", reason);
            return Ok(DropOutcome::Rejected(reason));
        }
        (Some(_), SortedDragPolicy::ReorderUnderlying) => false,
        (Some(_), SortedDragPolicy::ResetSortOnDrop) => true,
    };

    let from = source.stored_position(&drag.item_id)?;
    let updates = if source.snapshot.bucket == destination.snapshot.bucket {
        let last = source.snapshot.len() - 1;
        let to = source.bucket_index(target.index)?.min(last);
        reorder_within_bucket(source.snapshot.items, from, to)?
    } else {
        let dest_index = destination.bucket_index(target.index)?;
        move_between_buckets(
            source.snapshot.clone(),
            destination.snapshot.clone(),
            &drag.item_id,
            dest_index,
        )?
    };

    Ok(DropOutcome::Apply {
        updates,
        reset_sort,
    })
}

fn find<'r, 'a, T>(
    rendered: &'r [RenderedBucket<'a, T>],
    bucket: &BucketRef,
) -> Option<&'r RenderedBucket<'a, T>> {
    rendered.iter().find(|r| &r.snapshot.bucket == bucket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ticket;
    use crate::reorder::reconciler::apply_updates;
    use crate::view::SortKey;

    fn ticket(id: &str, bucket: BucketRef, order: i64) -> Ticket {
        let mut t = Ticket::new(ItemId::new(id), id.to_string());
        t.bucket = bucket;
        t.order = order;
        t
    }

    fn ids(names: &[&str]) -> Vec<ItemId> {
        names.iter().map(|n| ItemId::new(*n)).collect()
    }

    fn order_of(items: &[Ticket]) -> Vec<String> {
        let mut sorted: Vec<&Ticket> = items.iter().collect();
        sorted.sort_by_key(|t| t.order);
        sorted.iter().map(|t| t.id.to_string()).collect()
    }

    #[test]
    fn test_cancelled_drag_emits_nothing() {
        let items = vec![ticket("T1", BucketRef::Backlog, 0)];
        let visible = ids(&["T1"]);
        let rendered = [RenderedBucket::new(
            BucketSnapshot::new(BucketRef::Backlog, &items),
            &visible,
        )];

        let drag = DragState::begin(ItemId::new("T1"), BucketRef::Backlog, 0);
        let outcome = resolve_drop(&drag, &rendered, SortState::None, SortedDragPolicy::Disabled).unwrap();
        assert_eq!(outcome, DropOutcome::Cancelled);
        assert!(outcome.updates().is_empty());
    }

    #[test]
    fn test_filtered_view_maps_to_stored_positions() {
        let mut items = vec![
            ticket("A", BucketRef::Backlog, 0),
            ticket("X", BucketRef::Backlog, 1),
            ticket("B", BucketRef::Backlog, 2),
            ticket("C", BucketRef::Backlog, 3),
        ];
        let visible = ids(&["A", "B", "C"]);
        let snapshot = items.clone();
        let rendered = [RenderedBucket::new(
            BucketSnapshot::new(BucketRef::Backlog, &snapshot),
            &visible,
        )];

        let mut drag = DragState::begin(ItemId::new("A"), BucketRef::Backlog, 0);
        drag.hover(Some(DropTarget {
            bucket: BucketRef::Backlog,
            index: 2,
        }));

        let outcome = resolve_drop(&drag, &rendered, SortState::None, SortedDragPolicy::Disabled).unwrap();
        apply_updates(&mut items, outcome.updates()).unwrap();

        assert_eq!(order_of(&items), vec!["X", "B", "C", "A"]);
    }

    #[test]
    fn test_drop_past_end_of_view_moves_after_last_visible() {
        let sprint = BucketRef::sprint("s1");
        let mut items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("S1", sprint.clone(), 0),
            ticket("S2", sprint.clone(), 1),
        ];
        let backlog = vec![items[0].clone()];
        let sprint_items = vec![items[1].clone(), items[2].clone()];
        let backlog_visible = ids(&["T1"]);
        let sprint_visible = ids(&["S1"]);
        let rendered = [
            RenderedBucket::new(BucketSnapshot::new(BucketRef::Backlog, &backlog), &backlog_visible),
            RenderedBucket::new(BucketSnapshot::new(sprint.clone(), &sprint_items), &sprint_visible),
        ];

        let mut drag = DragState::begin(ItemId::new("T1"), BucketRef::Backlog, 0);
        drag.hover(Some(DropTarget {
            bucket: sprint.clone(),
            index: 1,
        }));

        let outcome = resolve_drop(&drag, &rendered, SortState::None, SortedDragPolicy::Disabled).unwrap();
        apply_updates(&mut items, outcome.updates()).unwrap();

        let sprint_order: Vec<String> = crate::domain::members(&items, &sprint)
            .iter()
            .map(|t| t.id.to_string())
            .collect();
        assert_eq!(sprint_order, vec!["S1", "T1", "S2"]);
    }

    #[test]
    fn test_sorted_view_policies() {
        let items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("T2", BucketRef::Backlog, 1),
        ];
        let visible = ids(&["T2", "T1"]);
        let rendered = [RenderedBucket::new(
            BucketSnapshot::new(BucketRef::Backlog, &items),
            &visible,
        )];
        let mut drag = DragState::begin(ItemId::new("T2"), BucketRef::Backlog, 0);
        drag.hover(Some(DropTarget {
            bucket: BucketRef::Backlog,
            index: 1,
        }));
        let sort = SortState::Desc(SortKey::Title);

        let rejected = resolve_drop(&drag, &rendered, sort, SortedDragPolicy::Disabled).unwrap();
        assert!(matches!(rejected, DropOutcome::Rejected(_)));

        let kept = resolve_drop(&drag, &rendered, sort, SortedDragPolicy::ReorderUnderlying).unwrap();
        assert!(matches!(kept, DropOutcome::Apply { reset_sort: false, .. }));
        assert_eq!(kept.updates().len(), 2);

        let reset = resolve_drop(&drag, &rendered, sort, SortedDragPolicy::ResetSortOnDrop).unwrap();
        assert!(matches!(reset, DropOutcome::Apply { reset_sort: true, .. }));
    }

    #[test]
    fn test_stale_source_index_is_rejected() {
        let items = vec![
            ticket("T1", BucketRef::Backlog, 0),
            ticket("T2", BucketRef::Backlog, 1),
        ];
        let visible = ids(&["T1", "T2"]);
        let rendered = [RenderedBucket::new(
            BucketSnapshot::new(BucketRef::Backlog, &items),
            &visible,
        )];
        let mut drag = DragState::begin(ItemId::new("T1"), BucketRef::Backlog, 1);
        drag.hover(Some(DropTarget {
            bucket: BucketRef::Backlog,
            index: 0,
        }));

        let err = resolve_drop(&drag, &rendered, SortState::None, SortedDragPolicy::Disabled).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_drop_on_unrendered_bucket_cancels() {
        let items = vec![ticket("T1", BucketRef::Backlog, 0)];
        let visible = ids(&["T1"]);
        let rendered = [RenderedBucket::new(
            BucketSnapshot::new(BucketRef::Backlog, &items),
            &visible,
        )];
        let mut drag = DragState::begin(ItemId::new("T1"), BucketRef::Backlog, 0);
        drag.hover(Some(DropTarget {
            bucket: BucketRef::sprint("gone"),
            index: 0,
        }));

        let outcome = resolve_drop(&drag, &rendered, SortState::None, SortedDragPolicy::Disabled).unwrap();
        assert_eq!(outcome, DropOutcome::Cancelled);
    }
}
