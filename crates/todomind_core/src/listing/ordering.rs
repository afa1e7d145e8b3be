//! Manual ordering by `reversed_order`.
//!
//! # Invariants
//! - Displayed lists are sorted descending by `reversed_order`.
//! - A reorder is a two-element swap of sort keys. Tasks between the two
//!   indices keep their keys.
//! - Out-of-range indices leave every key untouched.

use crate::model::task::Task;

/// Sorts tasks for display, highest `reversed_order` first.
///
/// Stable, so equal keys keep their input order.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| right.reversed_order.cmp(&left.reversed_order));
}

/// Sort key for a newly created task so it shows at the top.
///
/// Saturates at `i64::MAX`.
pub fn next_reversed_order<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> i64 {
    let max = tasks.into_iter().map(|task| task.reversed_order).max();
    key_after(max)
}

/// Key one above `max`, or `0` when there is no task yet.
pub fn key_after(max: Option<i64>) -> i64 {
    max.map_or(0, |max| max.saturating_add(1))
}

/// Swaps the `reversed_order` of the tasks at `from` and `to`.
///
/// `displayed` is the filtered list exactly as the user sees it. The list
/// itself is not re-sorted. Returns `true` when a swap happened; an
/// out-of-range request returns `false` and changes nothing.
pub fn swap_reversed_order(displayed: &mut [Task], from: usize, to: usize) -> bool {
    if from.max(to) >= displayed.len() {
        return false;
    }
    if from == to {
        return true;
    }

    let from_order = displayed[from].reversed_order;
    displayed[from].reversed_order = displayed[to].reversed_order;
    displayed[to].reversed_order = from_order;
    true
}
