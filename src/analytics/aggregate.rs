//! Group-by and reduction helpers shared by the panel aggregators
//!
//! Means return `None` on empty input instead of a NaN sentinel, and a
//! non-finite result is treated the same way.

use serde::Serialize;
use std::collections::BTreeMap;

/// Sum of values
pub fn sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().sum()
}

/// Mean of values, `None` on an empty set or a non-finite result
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (total, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    if count == 0 {
        return None;
    }
    let result = total / count as f64;
    result.is_finite().then_some(result)
}

/// Total of one metric for one group
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

/// Row count for one group
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// Partition rows by key, groups in ascending key order
pub fn group_by<'a, T, K, F>(rows: &[&'a T], key: F) -> BTreeMap<K, Vec<&'a T>>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for row in rows {
        groups.entry(key(row)).or_default().push(*row);
    }
    groups
}

/// Sum a metric per group, ascending key order
pub fn sum_by<T, K, V>(rows: &[&T], key: K, value: V) -> Vec<GroupTotal>
where
    K: Fn(&T) -> &str,
    V: Fn(&T) -> f64,
{
    group_by(rows, |row| key(row).to_string())
        .into_iter()
        .map(|(key, members)| GroupTotal {
            key,
            value: sum(members.iter().map(|row| value(row))),
        })
        .collect()
}

/// Count rows per distinct value, most frequent first, ties in first-seen order
pub fn value_counts<T, K>(rows: &[&T], key: K) -> Vec<GroupCount>
where
    K: Fn(&T) -> &str,
{
    let mut counts: Vec<GroupCount> = Vec::new();
    for row in rows {
        let value = key(row);
        match counts.iter_mut().find(|c| c.key == value) {
            Some(entry) => entry.count += 1,
            None => counts.push(GroupCount {
                key: value.to_string(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Distinct values in first-seen order
pub fn unique_values<T, K>(rows: &[T], key: K) -> Vec<String>
where
    K: Fn(&T) -> &str,
{
    let mut values: Vec<String> = Vec::new();
    for row in rows {
        let value = key(row);
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

/// Stable sort, largest metric first
pub fn sort_desc_by<T, F>(items: &mut [T], metric: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| {
        metric(b)
            .partial_cmp(&metric(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
