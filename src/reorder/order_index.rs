use crate::domain::Orderable;

/// Sets `order = index` for every element, keeping the sequence as given
pub fn reassign<T: Orderable>(sequence: &mut [T]) {
    for (index, item) in sequence.iter_mut().enumerate() {
        item.set_order(index as i64);
    }
}

/// Stable-sorts by the current order and then reassigns dense keys.
///
/// Used for data whose keys are sparse or duplicated.
pub fn repair<T: Orderable>(sequence: &mut [T]) {
    sequence.sort_by_key(|item| item.order());
    reassign(sequence);
}

/// True when the orders are exactly 0..len in sequence order
pub fn is_dense<T: Orderable>(sequence: &[T]) -> bool {
    sequence
        .iter()
        .enumerate()
        .all(|(index, item)| item.order() == index as i64)
}
