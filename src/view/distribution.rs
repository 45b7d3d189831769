//! Distribution accumulator
//!
//! Tracks count, mean, sum of squared deviation, min, max, and per-bucket
//! counts for a stream of values. The mean and deviation use Welford's
//! incremental update, which is numerically stable for long-running
//! cumulative views.

use super::buckets::BucketBoundaries;

/// Running distribution statistics over recorded values
///
/// A fresh distribution reports `count = 0`, `mean = 0`, zero deviation,
/// `min = +inf`, `max = -inf`, and all-zero bucket counts.
///
/// # Example
///
/// ```rust
/// use kuba_stats::view::{BucketBoundaries, Distribution};
///
/// let mut distribution = Distribution::new(BucketBoundaries::explicit(vec![10.0]));
/// distribution.add(5.0);
/// distribution.add(15.0);
///
/// assert_eq!(distribution.count(), 2);
/// assert_eq!(distribution.mean(), 10.0);
/// assert_eq!(distribution.bucket_counts(), &[1, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct Distribution {
    count: u64,
    mean: f64,
    sum_of_squared_deviation: f64,
    min: f64,
    max: f64,
    bucket_counts: Vec<u64>,
    boundaries: BucketBoundaries,
}

impl Distribution {
    /// Create an empty distribution over the given buckets
    pub fn new(boundaries: BucketBoundaries) -> Self {
        Self {
            count: 0,
            mean: 0.0,
            sum_of_squared_deviation: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            bucket_counts: vec![0; boundaries.num_buckets()],
            boundaries,
        }
    }

    /// Record one value
    ///
    /// Non-finite values are not special-cased: they update the count and
    /// bucket counts, and propagate through mean/deviation as IEEE
    /// arithmetic dictates.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.sum_of_squared_deviation += delta * (value - self.mean);
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        let bucket = self.boundaries.bucket_for_value(value);
        self.bucket_counts[bucket] += 1;
    }

    /// Overwrite the statistics with an externally computed window readout.
    pub(crate) fn set_window_stats(
        &mut self,
        count: u64,
        mean: f64,
        sum_of_squared_deviation: f64,
        min: f64,
        max: f64,
        bucket_counts: &[f64],
    ) {
        debug_assert_eq!(bucket_counts.len(), self.bucket_counts.len());
        self.count = count;
        self.mean = mean;
        self.sum_of_squared_deviation = sum_of_squared_deviation;
        self.min = min;
        self.max = max;
        self.bucket_counts = bucket_counts.iter().map(|c| c.round() as u64).collect();
    }

    /// Number of recorded values
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of recorded values, 0 when empty
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sum of squared deviation from the mean
    pub fn sum_of_squared_deviation(&self) -> f64 {
        self.sum_of_squared_deviation
    }

    /// Smallest recorded value, `+inf` when empty
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest recorded value, `-inf` when empty
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Count of values per bucket
    pub fn bucket_counts(&self) -> &[u64] {
        &self.bucket_counts
    }

    /// The bucket boundaries this distribution classifies against
    pub fn bucket_boundaries(&self) -> &BucketBoundaries {
        &self.boundaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_distribution() {
        let distribution = Distribution::new(BucketBoundaries::explicit(vec![10.0]));
        assert_eq!(distribution.count(), 0);
        assert_eq!(distribution.mean(), 0.0);
        assert_eq!(distribution.sum_of_squared_deviation(), 0.0);
        assert_eq!(distribution.min(), f64::INFINITY);
        assert_eq!(distribution.max(), f64::NEG_INFINITY);
        assert_eq!(distribution.bucket_counts(), &[0, 0]);
    }

    #[test]
    fn test_welford_update() {
        let mut distribution = Distribution::new(BucketBoundaries::explicit(vec![10.0]));
        distribution.add(5.0);
        distribution.add(15.0);
        distribution.add(10.0);

        assert_eq!(distribution.count(), 3);
        assert_eq!(distribution.mean(), 10.0);
        // (5-10)^2 + (15-10)^2 + (10-10)^2
        assert!((distribution.sum_of_squared_deviation() - 50.0).abs() < 1e-9);
        assert_eq!(distribution.min(), 5.0);
        assert_eq!(distribution.max(), 15.0);
        assert_eq!(distribution.bucket_counts(), &[1, 2]);
    }

    #[test]
    fn test_single_value() {
        let mut distribution = Distribution::new(BucketBoundaries::explicit(vec![10.0]));
        distribution.add(7.5);
        assert_eq!(distribution.count(), 1);
        assert_eq!(distribution.mean(), 7.5);
        assert_eq!(distribution.sum_of_squared_deviation(), 0.0);
        assert_eq!(distribution.min(), 7.5);
        assert_eq!(distribution.max(), 7.5);
    }
}
