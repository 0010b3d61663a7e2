//! Group-by over row sequences.
//!
//! Groups come out in ascending key order. Inside a group, rows keep the
//! order they had in the input, so `members[0]` is the group's "first" row.
//! Sums do not depend on input order; "first" does.

use std::collections::BTreeMap;

pub fn group_by<T, K, I, F>(rows: I, key: F) -> BTreeMap<K, Vec<T>>
where
    I: IntoIterator<Item = T>,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(row);
    }
    groups
}

/// Sum `value` over a group.
pub fn sum<T>(members: &[T], value: impl Fn(&T) -> f64) -> f64 {
    members.iter().map(value).sum()
}
