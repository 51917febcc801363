use serde::{Deserialize, Serialize};

use crate::domain::ItemId;
use crate::view::filter::{matches, FilterCriteria, Filterable, ViewFilter};
use crate::view::sorting::{sort_view, SortKey, SortState};

/// Everything the host keeps about one table or board view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub filter: ViewFilter,
    pub sort: SortState,
}

impl ViewState {
    /// Header click on `key`
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = self.sort.next(key);
    }

    pub fn reset_sort(&mut self) {
        self.sort = SortState::None;
    }
}

/// Ordered projection of a collection. Never mutates the items.
#[derive(Debug)]
pub struct View<'a, T> {
    items: Vec<&'a T>,
}

impl<'a, T: Filterable> View<'a, T> {
    pub fn items(&self) -> &[&'a T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Visible ids in view order, used to map view indices back to buckets
    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id().clone()).collect()
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn to_owned_items(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.iter().map(|item| (*item).clone()).collect()
    }

    pub fn paginate(&self, page: Page) -> PageSlice<'_, 'a, T> {
        let size = page.size.max(1);
        let total_items = self.items.len();
        let total_pages = total_items.div_ceil(size).max(1);
        let number = page.number.clamp(1, total_pages);

        let start = ((number - 1) * size).min(total_items);
        let end = (start + size).min(total_items);

        PageSlice {
            items: &self.items[start..end],
            number,
            total_items,
            total_pages,
        }
    }
}

/// Page request; `number` is 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    pub fn new(number: usize, size: usize) -> Self {
        Self { number, size }
    }
}

/// One page of a view. Out-of-range page numbers are clamped.
#[derive(Debug)]
pub struct PageSlice<'v, 'a, T> {
    pub items: &'v [&'a T],
    pub number: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<'v, 'a, T> PageSlice<'v, 'a, T> {
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Filters then sorts `items` into a view.
///
/// Output is a subset of the input. Without an explicit sort the view is
/// in ascending `order`.
pub fn apply_filters<'a, T: Filterable>(
    items: &'a [T],
    state: &ViewState,
    criteria: &FilterCriteria,
) -> View<'a, T> {
    let mut visible: Vec<&T> = items
        .iter()
        .filter(|item| matches(*item, &state.filter, criteria))
        .collect();
    sort_view(&mut visible, state.sort);

    tracing::trace!(
        total = items.len(),
        visible = visible.len(),
        sort = ?state.sort,
        "applied view filters"
    );
    View { items: visible }
}
