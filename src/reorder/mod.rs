//! Order-key maintenance for drag-and-drop moves.
//!
//! Everything here is a pure function of read snapshots: callers pass the
//! bucket sequences as currently rendered and receive the [`Update`]s to
//! send to the data layer.
//!
//! [`Update`]: crate::domain::Update

pub mod drag;
pub mod order_index;
pub mod reconciler;

pub use drag::{resolve_drop, DragState, DropOutcome, DropTarget, RenderedBucket, SortedDragPolicy};
pub use order_index::{is_dense, reassign, repair};
pub use reconciler::{apply_updates, move_between_buckets, reorder_within_bucket, BucketSnapshot};
