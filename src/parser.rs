//! Output parsing for the external model tools
//!
//! Two extraction modes, neither of which fails on malformed input:
//!
//! - **Series mode** ([`parse_series`]): one `<position> <bits> <symbol>`
//!   record per line. Anything else is skipped and counted.
//! - **Scalar mode** ([`extract_metrics`]): free-form report lines; for each
//!   target identifier, the first line containing it that also carries
//!   `<LABEL>: <number>` supplies the metric.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::metrics::TargetMetricMap;
use crate::series::ComplexitySeries;
use crate::{Error, Result};

/// Metric label the scorer prints by default.
pub const DEFAULT_METRIC_LABEL: &str = "NRC";

static NRC_PATTERN: LazyLock<MetricPattern> =
    LazyLock::new(|| MetricPattern::build(DEFAULT_METRIC_LABEL));

/// Result of a series-mode parse.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesParse {
    series: ComplexitySeries,
    skipped: usize,
    out_of_order: usize,
}

impl SeriesParse {
    /// The accepted samples.
    #[must_use]
    pub const fn series(&self) -> &ComplexitySeries {
        &self.series
    }

    /// Consume into the accepted samples.
    #[must_use]
    pub fn into_series(self) -> ComplexitySeries {
        self.series
    }

    /// Number of accepted records.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.series.len()
    }

    /// Number of non-blank lines that were rejected.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Accepted records whose position is lower than the one before.
    #[must_use]
    pub const fn out_of_order(&self) -> usize {
        self.out_of_order
    }

    /// `true` when zero valid records were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Parse per-symbol complexity output.
///
/// A line is accepted only if it splits into exactly three whitespace
/// separated fields, the first parses as a non-negative integer and the
/// second as a finite real. The third field (the symbol) is not stored. Records
/// whose position goes backwards are kept and counted.
#[must_use]
pub fn parse_series(text: &str) -> SeriesParse {
    let mut parse = SeriesParse::default();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line) {
            Some((position, value)) => {
                if !parse.series.push(position, value) {
                    debug!(position, "profile position went backwards");
                    parse.out_of_order += 1;
                }
            }
            None => parse.skipped += 1,
        }
    }

    if parse.skipped > 0 {
        debug!(
            accepted = parse.accepted(),
            skipped = parse.skipped,
            "skipped malformed profile lines"
        );
    }
    parse
}

fn parse_record(line: &str) -> Option<(u64, f64)> {
    let mut fields = line.split_whitespace();
    let (position, value, _symbol) = (fields.next()?, fields.next()?, fields.next()?);
    if fields.next().is_some() {
        return None;
    }
    let position = position.parse::<u64>().ok()?;
    let value = value.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some((position, value))
}

/// Compiled `<LABEL>: <number>` matcher.
#[derive(Debug, Clone)]
pub struct MetricPattern {
    label: String,
    regex: Regex,
}

impl MetricPattern {
    /// Matcher for `label`, e.g. `"NRC"`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for an empty label.
    pub fn new(label: &str) -> Result<Self> {
        if label.trim().is_empty() {
            return Err(Error::InvalidInput("metric label must not be empty".into()));
        }
        Ok(Self::build(label))
    }

    fn build(label: &str) -> Self {
        // An escaped label always yields a valid pattern
        let regex = Regex::new(&format!(r"{}:\s*([\d.]+)", regex::escape(label)))
            .expect("escaped metric label is a valid regex");
        Self { label: label.to_string(), regex }
    }

    /// Matcher for the default `NRC` label.
    #[must_use]
    pub fn nrc() -> Self {
        NRC_PATTERN.clone()
    }

    /// The label this pattern looks for.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// First parseable metric on `line`.
    #[must_use]
    pub fn find(&self, line: &str) -> Option<f64> {
        self.regex
            .captures_iter(line)
            .find_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
    }
}

impl Default for MetricPattern {
    fn default() -> Self {
        Self::nrc()
    }
}

/// Extract one metric per target identifier from report text.
///
/// Targets are matched as literal substrings. The first matching line per
/// target wins; targets never matched stay unset.
#[must_use]
pub fn extract_metrics<S: AsRef<str>>(
    text: &str,
    targets: &[S],
    pattern: &MetricPattern,
) -> TargetMetricMap {
    let mut map = TargetMetricMap::unset(targets);

    for line in text.lines() {
        for target in targets {
            let target = target.as_ref();
            if map.get(target).is_some() || !line.contains(target) {
                continue;
            }
            if let Some(value) = pattern.find(line) {
                map.set_first(target, value);
            }
        }
        if map.found_count() == map.len() {
            break;
        }
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_accepts_three_fields() {
        let parse = parse_series("5 2.3 A\n6 2.1 B\n");
        assert_eq!(parse.accepted(), 2);
        assert_eq!(parse.skipped(), 0);
        assert_eq!(parse.series().positions(), vec![5, 6]);
        assert_eq!(parse.series().values(), vec![2.3, 2.1]);
    }

    #[test]
    fn test_series_skips_malformed() {
        let text = "Model saved\n5 2.3\n7 x A\n-1 2.0 A\n8 2.0 A extra\n9 1.5 C\n";
        let parse = parse_series(text);
        assert_eq!(parse.accepted(), 1);
        assert_eq!(parse.skipped(), 5);
    }

    #[test]
    fn test_series_blank_lines_not_counted() {
        let parse = parse_series("\n\n   \n");
        assert!(parse.is_empty());
        assert_eq!(parse.skipped(), 0);
    }

    #[test]
    fn test_series_keeps_backwards_position() {
        let parse = parse_series("10 1.0 A\n9 1.5 A\n11 1.0 A\n");
        assert_eq!(parse.series().positions(), vec![10, 9, 11]);
        assert_eq!(parse.series().values(), vec![1.0, 1.5, 1.0]);
        assert_eq!(parse.skipped(), 0);
        assert_eq!(parse.out_of_order(), 1);
    }

    #[test]
    fn test_metric_pattern_find() {
        let pattern = MetricPattern::nrc();
        assert_eq!(pattern.find("New1 NRC: 0.8123"), Some(0.8123));
        assert_eq!(pattern.find("New1 NRC:0.5 len: 3"), Some(0.5));
        assert_eq!(pattern.find("New1 : 0.5"), None);
    }

    #[test]
    fn test_metric_pattern_rejects_empty_label() {
        assert!(MetricPattern::new("  ").is_err());
        assert_eq!(MetricPattern::new("BPS").unwrap().label(), "BPS");
    }

    #[test]
    fn test_extract_first_match_wins() {
        let text = "Top 100\nNew1 NRC: 0.71\nNew1 NRC: 0.99\nNew2 seen without metric\n";
        let map = extract_metrics(text, &["New1", "New2"], &MetricPattern::nrc());
        assert_eq!(map.get("New1"), Some(0.71));
        assert_eq!(map.get("New2"), None);
    }

    #[test]
    fn test_extract_later_line_fills_missing_metric() {
        let text = "New2 pending\nNew2 NRC: 0.42\n";
        let map = extract_metrics(text, &["New2"], &MetricPattern::nrc());
        assert_eq!(map.get("New2"), Some(0.42));
    }
}
