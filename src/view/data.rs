//! Per-view aggregated data
//!
//! [`ViewData`] holds the running aggregation for one view: a map from tag
//! values to per-row state, in one of four shapes selected at construction
//! from the view descriptor. The discriminator and the storage are a single
//! tagged union ([`ViewRows`]), so reads are exhaustive matches and there is
//! no way to hold the wrong map for the declared shape.
//!
//! A `ViewData` is externally synchronized: it performs no locking of its
//! own, in favor of the fastest possible record path. The enclosing recorder
//! layer must serialize [`add`](ViewData::add) against snapshots and reads
//! on the same instance.

use std::collections::HashMap;

use tracing::error;

use crate::error::{Error, Result};
use crate::types::{duration_to_millis, TagValues, Timestamp};

use super::descriptor::{Aggregation, AggregationWindow, ViewDescriptor};
use super::distribution::Distribution;
use super::interval::{IntervalStats, DISTRIBUTION_STAT_SLOTS};

/// Row storage, keyed by tag values, in the shape fixed at construction
#[derive(Debug)]
pub enum ViewRows {
    /// Running sums (cumulative Sum)
    Double(HashMap<TagValues, f64>),
    /// Event counts (cumulative Count)
    Int64(HashMap<TagValues, i64>),
    /// Distribution accumulators (cumulative Distribution)
    Distribution(HashMap<TagValues, Distribution>),
    /// Rolling-window rings (any interval aggregation)
    Interval(HashMap<TagValues, IntervalStats>),
}

/// Running aggregation state for a single view
///
/// # Example
///
/// ```rust
/// use kuba_stats::view::{Aggregation, AggregationWindow, ViewData, ViewDescriptor, ViewRows};
///
/// let descriptor = ViewDescriptor::new()
///     .with_aggregation(Aggregation::Sum)
///     .with_aggregation_window(AggregationWindow::Cumulative);
/// let mut data = ViewData::new(0, &descriptor);
///
/// let row = vec!["get".to_string()];
/// data.add(2.5, &row, 1_000);
/// data.add(1.5, &row, 2_000);
///
/// match data.rows() {
///     ViewRows::Double(rows) => assert_eq!(rows[&row], 4.0),
///     _ => unreachable!(),
/// }
/// assert_eq!(data.end_time(), 2_000);
/// ```
#[derive(Debug)]
pub struct ViewData {
    aggregation: Aggregation,
    window: AggregationWindow,
    start_time: Timestamp,
    end_time: Timestamp,
    rows: ViewRows,
}

impl ViewData {
    /// Create empty view data for a descriptor
    ///
    /// The row shape is fixed here and never changes: cumulative Sum stores
    /// `f64` sums, cumulative Count stores `i64` counts, cumulative
    /// Distribution stores [`Distribution`] rows, and every interval window
    /// stores [`IntervalStats`] rings. `end_time` starts equal to
    /// `start_time`.
    pub fn new(start_time: Timestamp, descriptor: &ViewDescriptor) -> Self {
        let aggregation = descriptor.aggregation().clone();
        let window = *descriptor.aggregation_window();
        let rows = match window {
            AggregationWindow::Cumulative => match aggregation {
                Aggregation::Sum => ViewRows::Double(HashMap::new()),
                Aggregation::Count => ViewRows::Int64(HashMap::new()),
                Aggregation::Distribution(_) => ViewRows::Distribution(HashMap::new()),
            },
            AggregationWindow::Interval(_) => ViewRows::Interval(HashMap::new()),
        };
        Self {
            aggregation,
            window,
            start_time,
            end_time: start_time,
            rows,
        }
    }

    /// Record one measurement under a tag-value key at a timestamp
    ///
    /// Never fails. `end_time` advances to `max(end_time, now)`. Rows are
    /// created on first use and never removed, so a tag seen once stays
    /// visible even after its interval contribution decays to zero.
    pub fn add(&mut self, value: f64, tag_values: &[String], now: Timestamp) {
        self.end_time = self.end_time.max(now);
        let aggregation = &self.aggregation;
        let window = self.window;
        match &mut self.rows {
            ViewRows::Double(rows) => {
                *rows.entry(tag_values.to_vec()).or_insert(0.0) += value;
            }
            ViewRows::Int64(rows) => {
                // Count counts events; the recorded value is ignored.
                *rows.entry(tag_values.to_vec()).or_insert(0) += 1;
            }
            ViewRows::Distribution(rows) => {
                let boundaries = match aggregation {
                    Aggregation::Distribution(boundaries) => boundaries,
                    // The shape and the aggregation are selected together in
                    // new().
                    _ => return,
                };
                rows.entry(tag_values.to_vec())
                    .or_insert_with(|| Distribution::new(boundaries.clone()))
                    .add(value);
            }
            ViewRows::Interval(rows) => {
                let duration = match window {
                    AggregationWindow::Interval(duration) => duration,
                    AggregationWindow::Cumulative => return,
                };
                match aggregation {
                    Aggregation::Distribution(boundaries) => {
                        let stats = rows.entry(tag_values.to_vec()).or_insert_with(|| {
                            IntervalStats::new(
                                boundaries.num_buckets() + DISTRIBUTION_STAT_SLOTS,
                                duration,
                                now,
                            )
                        });
                        stats.add_to_distribution(
                            value,
                            boundaries.bucket_for_value(value),
                            now,
                        );
                    }
                    Aggregation::Sum | Aggregation::Count => {
                        let stats = rows
                            .entry(tag_values.to_vec())
                            .or_insert_with(|| IntervalStats::new(1, duration, now));
                        let slots = stats.mutable_current_bucket(now);
                        slots[0] += match aggregation {
                            Aggregation::Count => 1.0,
                            _ => value,
                        };
                    }
                }
            }
        }
    }

    /// Produce an immutable export view from an interval view
    ///
    /// The export copies the aggregation settings, clamps `start_time` to
    /// `max(start_time, now - duration)`, sets `end_time = now`, and
    /// computes one windowed value per row: Sum and Count become `f64` rows,
    /// Distribution becomes [`Distribution`] rows. The source is not
    /// mutated.
    ///
    /// Calling this on a cumulative view is a programmer error and returns
    /// [`Error::InvalidOperation`]; cumulative views are exported with
    /// [`try_clone`](ViewData::try_clone) instead.
    pub fn snapshot(&self, now: Timestamp) -> Result<ViewData> {
        let (duration, rows) = match (self.window, &self.rows) {
            (AggregationWindow::Interval(duration), ViewRows::Interval(rows)) => {
                (duration, rows)
            }
            _ => {
                debug_assert!(false, "snapshot is only defined for interval views");
                error!("snapshot requested for a cumulative view");
                return Err(Error::InvalidOperation(
                    "snapshot is only defined for interval views".to_string(),
                ));
            }
        };

        let exported = match &self.aggregation {
            Aggregation::Sum | Aggregation::Count => {
                let mut out = HashMap::with_capacity(rows.len());
                let mut slot = [0.0];
                for (tags, stats) in rows {
                    stats.sum_into(&mut slot, now);
                    out.insert(tags.clone(), slot[0]);
                }
                ViewRows::Double(out)
            }
            Aggregation::Distribution(boundaries) => {
                let mut out = HashMap::with_capacity(rows.len());
                for (tags, stats) in rows {
                    let mut distribution = Distribution::new(boundaries.clone());
                    stats.distribution_into(&mut distribution, now);
                    out.insert(tags.clone(), distribution);
                }
                ViewRows::Distribution(out)
            }
        };

        Ok(ViewData {
            aggregation: self.aggregation.clone(),
            window: self.window,
            start_time: self.start_time.max(now - duration_to_millis(duration)),
            end_time: now,
            rows: exported,
        })
    }

    /// Duplicate a cumulative view
    ///
    /// Interval views cannot be copied (their rings only leave through
    /// [`snapshot`](ViewData::snapshot)); attempting it is a programmer
    /// error and returns [`Error::InvalidOperation`].
    pub fn try_clone(&self) -> Result<ViewData> {
        let rows = match &self.rows {
            ViewRows::Double(rows) => ViewRows::Double(rows.clone()),
            ViewRows::Int64(rows) => ViewRows::Int64(rows.clone()),
            ViewRows::Distribution(rows) => ViewRows::Distribution(rows.clone()),
            ViewRows::Interval(_) => {
                debug_assert!(false, "interval view data cannot be copied");
                error!("attempted to copy interval view data");
                return Err(Error::InvalidOperation(
                    "interval view data cannot be copied; snapshot it instead".to_string(),
                ));
            }
        };
        Ok(ViewData {
            aggregation: self.aggregation.clone(),
            window: self.window,
            start_time: self.start_time,
            end_time: self.end_time,
            rows,
        })
    }

    /// Aggregation kind this view applies
    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    /// Aggregation window this view covers
    pub fn aggregation_window(&self) -> &AggregationWindow {
        &self.window
    }

    /// Creation time of the view (or window start, for exports)
    pub fn start_time(&self) -> Timestamp {
        self.start_time
    }

    /// Largest timestamp seen by [`add`](ViewData::add), or `start_time`
    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    /// The row storage, for exhaustive matching on the view's shape
    pub fn rows(&self) -> &ViewRows {
        &self.rows
    }

    /// Sum rows, when this view stores running sums
    pub fn double_rows(&self) -> Option<&HashMap<TagValues, f64>> {
        match &self.rows {
            ViewRows::Double(rows) => Some(rows),
            _ => None,
        }
    }

    /// Count rows, when this view stores event counts
    pub fn int_rows(&self) -> Option<&HashMap<TagValues, i64>> {
        match &self.rows {
            ViewRows::Int64(rows) => Some(rows),
            _ => None,
        }
    }

    /// Distribution rows, when this view stores distributions
    pub fn distribution_rows(&self) -> Option<&HashMap<TagValues, Distribution>> {
        match &self.rows {
            ViewRows::Distribution(rows) => Some(rows),
            _ => None,
        }
    }

    /// Interval rings, when this view stores rolling-window state
    pub fn interval_rows(&self) -> Option<&HashMap<TagValues, IntervalStats>> {
        match &self.rows {
            ViewRows::Interval(rows) => Some(rows),
            _ => None,
        }
    }
}
