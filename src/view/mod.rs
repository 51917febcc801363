//! Read-side projection of item collections: filtering, sorting and
//! pagination. Nothing here writes to items.

pub mod filter;
pub mod pipeline;
pub mod sorting;

pub use filter::{
    matches, AssigneeFilter, FieldFilter, FilterCriteria, Filterable, SearchField, StatusFilter,
    ViewFilter,
};
pub use pipeline::{apply_filters, Page, PageSlice, View, ViewState};
pub use sorting::{next_sort_state, sort_view, SortDirection, SortKey, SortState, SortValue};
