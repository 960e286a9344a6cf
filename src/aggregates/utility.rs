use std::collections::HashMap;
use std::hash::Hash;

use crate::aggregates::types::Bucket;

/// Percentage of `part` in `total`. Returns 0.0 when `total` is zero.
pub fn pct(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

/// Adds up engagement values, clamping at `u64::MAX`.
pub fn saturating_total<I: IntoIterator<Item = u64>>(values: I) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

/// Sums `value` per key. Sums saturate instead of overflowing.
pub fn group_sum<'a, T, K, F, V>(items: &'a [T], key: F, value: V) -> HashMap<K, u64>
where
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
    V: Fn(&T) -> u64,
{
    let mut groups = HashMap::new();
    for item in items {
        let sum = groups.entry(key(item)).or_insert(0u64);
        *sum = sum.saturating_add(value(item));
    }
    groups
}

/// Orders buckets by value descending, then label ascending.
pub fn rank_desc(groups: HashMap<&str, u64>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = groups
        .into_iter()
        .map(|(label, value)| Bucket {
            label: label.to_string(),
            value,
        })
        .collect();
    buckets.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pct_with_zero_total() {
        assert_eq!(pct(10, 0), 0.0);
    }

    #[test]
    fn test_pct_normal_values() {
        assert_eq!(pct(50, 100), 50.0);
        assert_eq!(pct(1, 4), 25.0);
    }

    #[test]
    fn test_group_sum() {
        let items = [("a", 1u64), ("b", 2), ("a", 3)];
        let groups = group_sum(&items, |(k, _)| *k, |(_, v)| *v);
        assert_eq!(groups["a"], 4);
        assert_eq!(groups["b"], 2);
    }

    #[test]
    fn test_sums_saturate_at_max() {
        let items = [("a", u64::MAX - 1), ("a", 10), ("b", 1)];
        let groups = group_sum(&items, |(k, _)| *k, |(_, v)| *v);
        assert_eq!(groups["a"], u64::MAX);
        assert_eq!(saturating_total([u64::MAX, 1, 2]), u64::MAX);
        assert_eq!(saturating_total([2, 3]), 5);
    }

    #[test]
    fn test_rank_desc_breaks_ties_by_label() {
        let groups = HashMap::from([("Jakarta", 200), ("Bandung", 200), ("Surabaya", 300), ("", 5)]);
        let labels: Vec<String> = rank_desc(groups).into_iter().map(|b| b.label).collect();
        assert_eq!(labels, vec!["Surabaya", "Bandung", "Jakarta", ""]);
    }
}
