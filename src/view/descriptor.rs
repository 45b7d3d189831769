//! View descriptors
//!
//! A view names an aggregation over one measure's stream: which aggregation
//! to apply (sum, count, or distribution), over which time window
//! (cumulative since start, or a rolling interval), broken down by which tag
//! columns. The view data engine copies these settings at construction and
//! treats them as immutable.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::buckets::BucketBoundaries;

/// How recorded values are aggregated within a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Aggregation {
    /// Running sum of recorded values
    Sum,
    /// Number of recorded events; the recorded values are ignored
    Count,
    /// Histogram plus running count/mean/deviation/min/max statistics
    Distribution(BucketBoundaries),
}

impl Aggregation {
    /// Bucket boundaries, for distribution aggregations
    pub fn bucket_boundaries(&self) -> Option<&BucketBoundaries> {
        match self {
            Aggregation::Distribution(boundaries) => Some(boundaries),
            _ => None,
        }
    }
}

/// Time window over which a view aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationWindow {
    /// Unbounded accumulation since the view was created
    Cumulative,
    /// Rolling window covering the last `duration`
    Interval(Duration),
}

impl AggregationWindow {
    /// Window duration, for interval windows
    pub fn duration(&self) -> Option<Duration> {
        match self {
            AggregationWindow::Interval(duration) => Some(*duration),
            AggregationWindow::Cumulative => None,
        }
    }
}

/// Configuration of a single view
///
/// Built in the fluent style; defaults to a cumulative event count.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use kuba_stats::view::{Aggregation, AggregationWindow, BucketBoundaries, ViewDescriptor};
///
/// let descriptor = ViewDescriptor::new()
///     .with_name("rpc/latency/p99")
///     .with_measure("rpc/latency")
///     .with_aggregation(Aggregation::Distribution(BucketBoundaries::explicit(vec![
///         1.0, 10.0, 100.0,
///     ])))
///     .with_aggregation_window(AggregationWindow::Interval(Duration::from_secs(60)))
///     .add_column("method")
///     .add_column("status");
///
/// assert_eq!(descriptor.columns().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDescriptor {
    name: String,
    measure_name: String,
    description: String,
    columns: Vec<String>,
    aggregation: Aggregation,
    aggregation_window: AggregationWindow,
}

impl ViewDescriptor {
    /// Create a descriptor with default settings (cumulative count, no
    /// columns)
    pub fn new() -> Self {
        Self {
            name: String::new(),
            measure_name: String::new(),
            description: String::new(),
            columns: Vec::new(),
            aggregation: Aggregation::Count,
            aggregation_window: AggregationWindow::Cumulative,
        }
    }

    /// Set the view name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the name of the measure this view aggregates
    pub fn with_measure(mut self, measure_name: impl Into<String>) -> Self {
        self.measure_name = measure_name.into();
        self
    }

    /// Set the human-readable description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a tag column; rows are keyed by one value per column, in order
    pub fn add_column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Set the aggregation kind
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = aggregation;
        self
    }

    /// Set the aggregation window
    pub fn with_aggregation_window(mut self, window: AggregationWindow) -> Self {
        self.aggregation_window = window;
        self
    }

    /// View name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the aggregated measure
    pub fn measure_name(&self) -> &str {
        &self.measure_name
    }

    /// Human-readable description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tag column names, fixing the arity and order of every row key
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Aggregation kind
    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    /// Aggregation window
    pub fn aggregation_window(&self) -> &AggregationWindow {
        &self.aggregation_window
    }
}

impl Default for ViewDescriptor {
    fn default() -> Self {
        Self::new()
    }
}
