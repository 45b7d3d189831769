//! Rolling-window accumulator ring
//!
//! [`IntervalStats`] tracks an array of `f64` accumulators over a rolling
//! time window. The window is split into [`SUBINTERVALS`] sub-buckets plus
//! one in-progress sub-bucket; writes land in the newest sub-bucket, and the
//! ring advances lazily as timestamps move forward. Reads sum the sub-buckets
//! still inside the window `(now - duration, now]`, weighting the oldest
//! live sub-bucket by the fraction of its span not yet expired, so an
//! expiring sub-bucket fades out linearly instead of dropping at once.
//!
//! For sum/count aggregation a sub-bucket holds a single slot. For
//! distribution aggregation it holds
//! `[count, mean, ssd, min, max, bucket_0 .. bucket_n]`, i.e.
//! [`DISTRIBUTION_STAT_SLOTS`] scalar statistics followed by the histogram
//! bucket counts.

use crate::types::{duration_to_millis, Timestamp};
use std::time::Duration;

use super::distribution::Distribution;

/// Sub-buckets per window; each covers `duration / SUBINTERVALS`.
///
/// Expiry granularity: at most one sub-bucket (a quarter of the window) is
/// ever partially weighted in a readout.
pub const SUBINTERVALS: usize = 4;

/// Scalar slots preceding the per-bucket counts in a distribution-shaped
/// sub-bucket: count, mean, sum of squared deviation, min, max.
pub const DISTRIBUTION_STAT_SLOTS: usize = 5;

const SLOT_COUNT: usize = 0;
const SLOT_MEAN: usize = 1;
const SLOT_SSD: usize = 2;
const SLOT_MIN: usize = 3;
const SLOT_MAX: usize = 4;

/// Ring of per-sub-bucket accumulators spanning a rolling window
///
/// Deliberately not `Clone`: the only way to copy interval state out is the
/// windowed readout through [`sum_into`](IntervalStats::sum_into) or
/// [`distribution_into`](IntervalStats::distribution_into).
#[derive(Debug)]
pub struct IntervalStats {
    num_stats: usize,
    /// Span of one sub-bucket, in milliseconds (at least 1).
    bucket_millis: i64,
    /// Effective window span: `bucket_millis * SUBINTERVALS`.
    window_millis: i64,
    /// Start time of the newest sub-bucket; sub-bucket boundaries stay on
    /// the grid `anchor + k * bucket_millis` fixed at construction.
    newest_start: Timestamp,
    /// Index of the newest sub-bucket in `buckets`.
    newest: usize,
    buckets: Vec<Vec<f64>>,
}

impl IntervalStats {
    /// Create a ring of `num_stats`-slot sub-buckets spanning `duration`,
    /// anchored at `now`
    pub fn new(num_stats: usize, duration: Duration, now: Timestamp) -> Self {
        let bucket_millis = (duration_to_millis(duration) / SUBINTERVALS as i64).max(1);
        Self {
            num_stats,
            bucket_millis,
            window_millis: bucket_millis * SUBINTERVALS as i64,
            newest_start: now,
            newest: 0,
            buckets: vec![vec![0.0; num_stats]; SUBINTERVALS + 1],
        }
    }

    /// Number of accumulator slots per sub-bucket
    pub fn num_stats(&self) -> usize {
        self.num_stats
    }

    /// Advance the ring and return the newest sub-bucket's slots
    ///
    /// A `now` earlier than the newest sub-bucket does not rewind: late
    /// records are attributed to the freshest slot.
    pub fn mutable_current_bucket(&mut self, now: Timestamp) -> &mut [f64] {
        self.advance(now);
        &mut self.buckets[self.newest]
    }

    /// Record one value into the distribution-shaped newest sub-bucket
    ///
    /// `bucket_index` is the histogram bucket chosen by the caller's
    /// boundary classification.
    pub fn add_to_distribution(&mut self, value: f64, bucket_index: usize, now: Timestamp) {
        debug_assert!(DISTRIBUTION_STAT_SLOTS + bucket_index < self.num_stats);
        let slots = self.mutable_current_bucket(now);
        let count = slots[SLOT_COUNT] + 1.0;
        slots[SLOT_COUNT] = count;
        let delta = value - slots[SLOT_MEAN];
        slots[SLOT_MEAN] += delta / count;
        slots[SLOT_SSD] += delta * (value - slots[SLOT_MEAN]);
        if count == 1.0 {
            slots[SLOT_MIN] = value;
            slots[SLOT_MAX] = value;
        } else {
            if value < slots[SLOT_MIN] {
                slots[SLOT_MIN] = value;
            }
            if value > slots[SLOT_MAX] {
                slots[SLOT_MAX] = value;
            }
        }
        slots[DISTRIBUTION_STAT_SLOTS + bucket_index] += 1.0;
    }

    /// Slot-wise windowed sum over `(now - duration, now]`
    ///
    /// Read-only: the ring is not advanced, so snapshots never mutate the
    /// source. `out` must have one element per slot; it is overwritten.
    pub fn sum_into(&self, out: &mut [f64], now: Timestamp) {
        debug_assert_eq!(out.len(), self.num_stats);
        for slot in out.iter_mut() {
            *slot = 0.0;
        }
        self.for_each_live_bucket(now, |slots, weight| {
            for (acc, slot) in out.iter_mut().zip(slots) {
                *acc += slot * weight;
            }
        });
    }

    /// Windowed distribution readout over `(now - duration, now]`
    ///
    /// Merges the distribution-shaped sub-buckets into `distribution`
    /// (pairwise mean/deviation merge). With no surviving data the target is
    /// left in its empty state: zero count, `min = +inf`, `max = -inf`,
    /// all-zero buckets. Counts from a partially expired sub-bucket are
    /// scaled by its weight and rounded.
    pub fn distribution_into(&self, distribution: &mut Distribution, now: Timestamp) {
        debug_assert!(self.num_stats >= DISTRIBUTION_STAT_SLOTS);
        let mut count = 0.0;
        let mut mean = 0.0;
        let mut ssd = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut bucket_counts = vec![0.0; self.num_stats - DISTRIBUTION_STAT_SLOTS];

        self.for_each_live_bucket(now, |slots, weight| {
            let sub_count = slots[SLOT_COUNT] * weight;
            if sub_count <= 0.0 {
                return;
            }
            let merged = count + sub_count;
            let delta = slots[SLOT_MEAN] - mean;
            ssd += slots[SLOT_SSD] * weight + delta * delta * count * sub_count / merged;
            mean += delta * sub_count / merged;
            count = merged;
            if slots[SLOT_MIN] < min {
                min = slots[SLOT_MIN];
            }
            if slots[SLOT_MAX] > max {
                max = slots[SLOT_MAX];
            }
            for (acc, slot) in bucket_counts
                .iter_mut()
                .zip(&slots[DISTRIBUTION_STAT_SLOTS..])
            {
                *acc += slot * weight;
            }
        });

        distribution.set_window_stats(
            count.round() as u64,
            mean,
            ssd,
            min,
            max,
            &bucket_counts,
        );
    }

    fn advance(&mut self, now: Timestamp) {
        if now < self.newest_start + self.bucket_millis {
            return;
        }
        let steps = (now - self.newest_start) / self.bucket_millis;
        if steps as usize >= self.buckets.len() {
            // Everything has expired; reset in place, staying on the grid.
            for bucket in &mut self.buckets {
                bucket.iter_mut().for_each(|slot| *slot = 0.0);
            }
            self.newest_start += steps * self.bucket_millis;
        } else {
            for _ in 0..steps {
                self.newest = (self.newest + 1) % self.buckets.len();
                self.buckets[self.newest]
                    .iter_mut()
                    .for_each(|slot| *slot = 0.0);
                self.newest_start += self.bucket_millis;
            }
        }
    }

    /// Visit each sub-bucket overlapping `(now - duration, now]` with its
    /// weight: 1 for fully-contained sub-buckets, the unexpired fraction for
    /// the oldest partially-expired one.
    fn for_each_live_bucket(&self, now: Timestamp, mut visit: impl FnMut(&[f64], f64)) {
        let window_start = now - self.window_millis;
        for age in 0..self.buckets.len() {
            let start = self.newest_start - age as i64 * self.bucket_millis;
            let end = start + self.bucket_millis;
            if end <= window_start || start > now {
                continue;
            }
            let weight = if start >= window_start {
                1.0
            } else {
                (end - window_start) as f64 / self.bucket_millis as f64
            };
            let index = (self.newest + self.buckets.len() - age) % self.buckets.len();
            visit(&self.buckets[index], weight);
        }
    }
}
