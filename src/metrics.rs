//! Per-target summary metrics
//!
//! The optimization workflow scores a whole database per run and pulls one
//! metric (NRC by default) out for each requested target sequence.

use serde::Serialize;

/// Target identifier to optional metric, in request order.
///
/// A `None` value means the identifier never appeared (with a parseable
/// metric) in the tool's output for that run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TargetMetricMap {
    entries: Vec<(String, Option<f64>)>,
}

impl TargetMetricMap {
    /// Map with every target present but unset.
    #[must_use]
    pub fn unset<S: AsRef<str>>(targets: &[S]) -> Self {
        Self {
            entries: targets.iter().map(|t| (t.as_ref().to_string(), None)).collect(),
        }
    }

    /// Set `target` if it is tracked and not already set. First write wins.
    ///
    /// Returns `true` if the value was stored.
    pub fn set_first(&mut self, target: &str, value: f64) -> bool {
        match self.entries.iter_mut().find(|(id, _)| id == target) {
            Some((_, slot @ None)) => {
                *slot = Some(value);
                true
            }
            _ => false,
        }
    }

    /// Metric for `target`, if found.
    #[must_use]
    pub fn get(&self, target: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(id, _)| id == target)
            .and_then(|(_, v)| *v)
    }

    /// Whether `target` is tracked at all.
    #[must_use]
    pub fn contains(&self, target: &str) -> bool {
        self.entries.iter().any(|(id, _)| id == target)
    }

    /// Iterate `(target, value)` in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(id, v)| (id.as_str(), *v))
    }

    /// Number of targets with a value.
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_some()).count()
    }

    /// Number of tracked targets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no targets are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let mut map = TargetMetricMap::unset(&["New1", "New2"]);
        assert!(map.set_first("New1", 0.4));
        assert!(!map.set_first("New1", 0.9));
        assert_eq!(map.get("New1"), Some(0.4));
        assert_eq!(map.get("New2"), None);
        assert_eq!(map.found_count(), 1);
    }

    #[test]
    fn test_untracked_target_ignored() {
        let mut map = TargetMetricMap::unset(&["New1"]);
        assert!(!map.set_first("Other", 0.1));
        assert!(!map.contains("Other"));
        assert_eq!(map.len(), 1);
    }
}
