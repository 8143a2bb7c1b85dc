use serde::Serialize;
use std::collections::BTreeMap;

/// A single row of a value distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueCount {
    pub value: i64,
    pub count: usize,
    /// Share of the series in percent (0..=100).
    pub percentage: f64,
}

/// Frequency of each distinct integer in a quantized series, ordered by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueDistribution {
    counts: BTreeMap<i64, usize>,
    total: usize,
}

impl ValueDistribution {
    pub fn from_series(series: &[i64]) -> Self {
        let mut counts = BTreeMap::new();
        for &v in series {
            *counts.entry(v).or_insert(0) += 1;
        }
        Self { counts, total: series.len() }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn count(&self, value: i64) -> usize {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    pub fn percentage(&self, value: i64) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(value) as f64 / self.total as f64 * 100.0
    }

    pub fn min_value(&self) -> Option<i64> {
        self.counts.keys().next().copied()
    }

    pub fn max_value(&self) -> Option<i64> {
        self.counts.keys().next_back().copied()
    }

    /// Rows in ascending value order.
    pub fn entries(&self) -> Vec<ValueCount> {
        self.counts
            .keys()
            .map(|&value| ValueCount {
                value,
                count: self.count(value),
                percentage: self.percentage(value),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_percentages() {
        let dist = ValueDistribution::from_series(&[5, 2, 5, 5, 11, 2, 6, 8]);
        assert_eq!(dist.total(), 8);
        assert_eq!(dist.len(), 5);
        assert_eq!(dist.count(5), 3);
        assert_eq!(dist.count(3), 0);
        assert_eq!(dist.percentage(5), 37.5);
        assert_eq!(dist.min_value(), Some(2));
        assert_eq!(dist.max_value(), Some(11));

        let values: Vec<i64> = dist.entries().iter().map(|e| e.value).collect();
        assert_eq!(values, vec![2, 5, 6, 8, 11]);
        let total_pct: f64 = dist.entries().iter().map(|e| e.percentage).sum();
        assert!((total_pct - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty() {
        let dist = ValueDistribution::from_series(&[]);
        assert!(dist.is_empty());
        assert_eq!(dist.percentage(1), 0.0);
        assert_eq!(dist.min_value(), None);
    }
}
