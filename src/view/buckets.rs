//! Histogram bucket boundaries
//!
//! A boundary list `[b0, b1, .. bn]` defines `n + 1` buckets:
//! `(-inf, b0), [b0, b1), .., [bn, +inf)`. Classification is by binary
//! search, so bucketing a value is O(log n).

use serde::{Deserialize, Serialize};

/// Ordered histogram bucket boundaries
///
/// # Example
///
/// ```rust
/// use kuba_stats::view::BucketBoundaries;
///
/// let buckets = BucketBoundaries::explicit(vec![0.0, 10.0, 100.0]);
/// assert_eq!(buckets.num_buckets(), 4);
/// assert_eq!(buckets.bucket_for_value(-1.0), 0);
/// assert_eq!(buckets.bucket_for_value(10.0), 2);
/// assert_eq!(buckets.bucket_for_value(1e6), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketBoundaries {
    lower_boundaries: Vec<f64>,
}

impl BucketBoundaries {
    /// Buckets delimited by an explicit boundary list
    ///
    /// Boundaries are sorted and deduplicated; an empty list yields a single
    /// bucket covering the whole real line.
    pub fn explicit(mut boundaries: Vec<f64>) -> Self {
        boundaries.sort_by(|a, b| a.total_cmp(b));
        boundaries.dedup();
        Self {
            lower_boundaries: boundaries,
        }
    }

    /// `num_finite_buckets` evenly-sized buckets of `width`, starting at
    /// `offset`, plus the two overflow buckets
    pub fn linear(num_finite_buckets: usize, offset: f64, width: f64) -> Self {
        let boundaries = (0..=num_finite_buckets)
            .map(|i| offset + i as f64 * width)
            .collect();
        Self::explicit(boundaries)
    }

    /// `num_finite_buckets` exponentially-growing buckets starting at
    /// `scale`, each `growth_factor` times wider than the previous, plus the
    /// two overflow buckets
    pub fn exponential(num_finite_buckets: usize, scale: f64, growth_factor: f64) -> Self {
        let boundaries = (0..=num_finite_buckets)
            .map(|i| scale * growth_factor.powi(i as i32))
            .collect();
        Self::explicit(boundaries)
    }

    /// Total number of buckets, including the two unbounded end buckets
    pub fn num_buckets(&self) -> usize {
        self.lower_boundaries.len() + 1
    }

    /// Index of the bucket containing `value`
    ///
    /// The first bucket whose upper boundary exceeds the value; values below
    /// the first boundary map to bucket 0, values at or above the last
    /// boundary map to the last bucket. NaN maps to bucket 0.
    pub fn bucket_for_value(&self, value: f64) -> usize {
        self.lower_boundaries.partition_point(|b| *b <= value)
    }

    /// The boundary list
    pub fn lower_boundaries(&self) -> &[f64] {
        &self.lower_boundaries
    }
}
