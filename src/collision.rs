//! Brute-force rectangle collision between entity groups.
//!
//! Nothing here mutates a collection.  Callers collect hits into per-group
//! "dead" masks first and then [`sweep`] each collection once, so no
//! collection is modified while it is being iterated.

use crate::entities::{Bounded, Rect};

/// Indices of every member of `group` that overlaps `rect`.
pub fn collide_rect<T: Bounded>(rect: &Rect, group: &[T]) -> Vec<usize> {
    group
        .iter()
        .enumerate()
        .filter(|(_, item)| item.rect().overlaps(rect))
        .map(|(i, _)| i)
        .collect()
}

/// True if any member of `group` overlaps `rect`.
pub fn collide_any<T: Bounded>(rect: &Rect, group: &[T]) -> bool {
    group.iter().any(|item| item.rect().overlaps(rect))
}

/// Pairwise test of two groups.
///
/// Returns `(hitter, targets)` for every member of `hitters` that overlaps
/// at least one member of `targets`.  A target is claimed by the first
/// hitter that reaches it and is not reported again, matching the
/// "remove on contact" semantics of every caller.
pub fn group_collide<A: Bounded, B: Bounded>(hitters: &[A], targets: &[B]) -> Vec<(usize, Vec<usize>)> {
    let mut claimed = vec![false; targets.len()];
    let mut hits = Vec::new();

    for (hi, hitter) in hitters.iter().enumerate() {
        let struck: Vec<usize> = targets
            .iter()
            .enumerate()
            .filter(|(ti, target)| !claimed[*ti] && target.rect().overlaps(hitter.rect()))
            .map(|(ti, _)| ti)
            .collect();

        if struck.is_empty() {
            continue;
        }
        for &ti in &struck {
            claimed[ti] = true;
        }
        hits.push((hi, struck));
    }

    hits
}

/// Build a removal mask of `len` entries from a list of indices.
pub fn mask_from(len: usize, indices: impl IntoIterator<Item = usize>) -> Vec<bool> {
    let mut mask = vec![false; len];
    for i in indices {
        if let Some(slot) = mask.get_mut(i) {
            *slot = true;
        }
    }
    mask
}

/// Drop every item whose mask entry is set.  Returns how many were removed.
pub fn sweep<T>(items: &mut Vec<T>, dead: &[bool]) -> usize {
    let before = items.len();
    let mut i = 0;
    items.retain(|_| {
        let keep = !dead.get(i).copied().unwrap_or(false);
        i += 1;
        keep
    });
    before - items.len()
}
