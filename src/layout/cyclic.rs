//! Wrap-aware helpers for index lists read as cycles.

/// Up to `len` items starting at `start`, wrapping past the end once.
///
/// `start` is taken modulo the list length; `len` is capped at it.
#[must_use]
pub fn circular_slice<T: Copy>(items: &[T], start: usize, len: usize) -> Vec<T> {
    let n = items.len();
    if n == 0 {
        return Vec::new();
    }
    items
        .iter()
        .cycle()
        .skip(start % n)
        .take(len.min(n))
        .copied()
        .collect()
}

/// Removes the items strictly between positions `from` and `to`, walking
/// forward from `from` and wrapping past the end.
///
/// Returns how many items were removed.
pub fn remove_between<T>(items: &mut Vec<T>, from: usize, to: usize) -> usize {
    let n = items.len();
    if from >= n || to >= n || from == to {
        return 0;
    }
    if to > from {
        items.drain(from + 1..to).count()
    } else {
        let tail = items.drain(from + 1..).count();
        tail + items.drain(..to).count()
    }
}

/// Drops each item equal to its cyclic successor.
pub(crate) fn drop_adjacent_repeats<T: PartialEq>(items: &mut Vec<T>) -> bool {
    let mut changed = false;
    let mut i = 0;
    while items.len() >= 2 && i < items.len() {
        let next = (i + 1) % items.len();
        if items[i] == items[next] {
            items.remove(i);
            changed = true;
        } else {
            i += 1;
        }
    }
    changed
}

/// Collapses `a, b, a` out-and-back runs to `a`.
pub(crate) fn drop_spurs<T: PartialEq>(items: &mut Vec<T>) -> bool {
    let mut changed = false;
    let mut i = 0;
    while items.len() >= 3 && i < items.len() {
        let n = items.len();
        if items[i] == items[(i + 2) % n] {
            // Remove the tip and the return visit, higher position first.
            let (tip, back) = ((i + 1) % n, (i + 2) % n);
            items.remove(tip.max(back));
            items.remove(tip.min(back));
            changed = true;
            i = i.saturating_sub(2);
        } else {
            i += 1;
        }
    }
    changed
}

/// Keeps only the first occurrence of each item.
pub(crate) fn drop_later_duplicates<T: PartialEq>(items: &mut Vec<T>) -> bool {
    let before = items.len();
    let mut i = 1;
    while i < items.len() {
        if items[..i].contains(&items[i]) {
            items.remove(i);
        } else {
            i += 1;
        }
    }
    items.len() != before
}
