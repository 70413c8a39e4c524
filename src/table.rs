//! Result Table - in-memory sweep results keyed by parameter tuple
//!
//! ## Design
//!
//! Entries live in a vector in insertion (grid) order, with a hash index
//! for O(1) lookup by key. Every visited key has an [`Outcome`]: either a
//! payload or an explicit "no data" marker with the reason. Keys the sweep
//! never reached are simply absent; lookups return `None` instead of
//! failing, so consumers can iterate a sparse table without special cases.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// What a sweep produced for one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome<V> {
    /// Usable payload
    Data(V),
    /// The point ran (or was skipped) without usable output
    NoData(String),
}

impl<V> Outcome<V> {
    /// The payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&V> {
        match self {
            Self::Data(v) => Some(v),
            Self::NoData(_) => None,
        }
    }

    /// `true` for the explicit "no data" marker.
    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}

/// Ordered, sparse mapping from key to [`Outcome`].
#[derive(Debug, Clone)]
pub struct ResultTable<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, Outcome<V>)>,
}

impl<K, V> Default for ResultTable<K, V> {
    fn default() -> Self {
        Self { index: HashMap::new(), entries: Vec::new() }
    }
}

impl<K: Eq + Hash + Clone, V> ResultTable<K, V> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the outcome for `key`.
    ///
    /// A replaced key keeps its original position.
    pub fn put(&mut self, key: K, outcome: Outcome<V>) {
        if let Some(&i) = self.index.get(&key) {
            self.entries[i].1 = outcome;
        } else {
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push((key, outcome));
        }
    }

    /// Record a payload for `key`.
    pub fn insert(&mut self, key: K, value: V) {
        self.put(key, Outcome::Data(value));
    }

    /// Record the "no data" marker for `key`.
    pub fn mark_missing(&mut self, key: K, reason: impl Into<String>) {
        self.put(key, Outcome::NoData(reason.into()));
    }

    /// Payload for `key`; `None` if absent or marked missing.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.outcome(key).and_then(Outcome::data)
    }

    /// Full outcome for `key`, including the missing marker.
    #[must_use]
    pub fn outcome(&self, key: &K) -> Option<&Outcome<V>> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Whether `key` was visited at all.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// All entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Outcome<V>)> {
        self.entries.iter().map(|(k, o)| (k, o))
    }

    /// Populated entries in insertion order.
    pub fn data(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries
            .iter()
            .filter_map(|(k, o)| o.data().map(|v| (k, v)))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Number of visited keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries carrying a payload.
    #[must_use]
    pub fn data_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| !o.is_no_data()).count()
    }

    /// Number of entries marked "no data".
    #[must_use]
    pub fn missing_count(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_no_data()).count()
    }
}

impl<K: Eq + Hash + Clone> ResultTable<K, f64> {
    /// Scalar lookup with NaN standing in for absent or missing entries.
    #[must_use]
    pub fn value_or_nan(&self, key: &K) -> f64 {
        self.get(key).copied().unwrap_or(f64::NAN)
    }

    /// Entry with the lowest non-NaN value.
    #[must_use]
    pub fn min_entry(&self) -> Option<(&K, f64)> {
        self.data()
            .filter(|(_, v)| !v.is_nan())
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, v)| (k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_default() {
        let table: ResultTable<u32, f64> = ResultTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert!(table.get(&1).is_none());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut table = ResultTable::new();
        table.insert(3, "c");
        table.mark_missing(1, "no output");
        table.insert(2, "b");

        let keys: Vec<_> = table.keys().copied().collect();
        assert_eq!(keys, vec![3, 1, 2]);
        assert_eq!(table.data_count(), 2);
        assert_eq!(table.missing_count(), 1);
    }

    #[test]
    fn test_missing_marker_is_not_data() {
        let mut table: ResultTable<u32, f64> = ResultTable::new();
        table.mark_missing(7, "tool failed");

        assert!(table.contains_key(&7));
        assert!(table.get(&7).is_none());
        assert!(table.value_or_nan(&7).is_nan());
        assert!(table.value_or_nan(&8).is_nan());
        assert_eq!(table.outcome(&7), Some(&Outcome::NoData("tool failed".into())));
    }

    #[test]
    fn test_put_replaces_in_place() {
        let mut table = ResultTable::new();
        table.insert("a", 1.0);
        table.insert("b", 2.0);
        table.insert("a", 0.5);

        assert_eq!(table.len(), 2);
        assert_eq!(table.keys().next(), Some(&"a"));
        assert_eq!(table.get(&"a"), Some(&0.5));
    }

    #[test]
    fn test_min_entry_ignores_missing() {
        let mut table = ResultTable::new();
        table.insert("a", 0.9);
        table.mark_missing("b", "absent");
        table.insert("c", 0.3);
        table.insert("d", f64::NAN);

        assert_eq!(table.min_entry(), Some((&"c", 0.3)));
    }
}
