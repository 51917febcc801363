//! # Sprintboard Core
//!
//! Ordering and view logic for sprint planning boards and bug tracker
//! tables.
//!
//! This crate computes order-key updates for drag-and-drop moves between
//! sprints and the backlog, projects item collections through filters and
//! sorts, and drives the snap behaviour of the draggable backlog panel. It
//! holds no authoritative state: items are read from and written back to an
//! injected [`Store`].

pub mod config;
pub mod domain;
pub mod error;
pub mod panel;
pub mod planner;
pub mod reorder;
pub mod store;
pub mod view;

// Re-export commonly used types
pub use config::{BoardConfig, PanelConfig};
pub use domain::{
    Bucket, BucketId, BucketRef, Bug, ItemId, ItemPatch, Orderable, Ticket, Update, WorkItem,
};
pub use error::{BoardError, Result};
pub use panel::{offset_for_gesture, DragGestureController, SnapTarget};
pub use planner::Planner;
pub use reorder::{move_between_buckets, reorder_within_bucket, DragState, DropOutcome};
pub use store::Store;
pub use view::{apply_filters, next_sort_state, SortState, ViewFilter, ViewState};
