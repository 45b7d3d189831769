//! Kuba Stats - In-process stats aggregation core
//!
//! This library provides the aggregation core of a stats/metrics stack:
//! - A measure registry assigning stable, compact 64-bit handles to named
//!   measurement streams
//! - A view data engine maintaining per-view aggregated state (sums, counts,
//!   distributions) keyed by tag values
//! - Cumulative windows (unbounded since start) and rolling interval windows
//!   backed by a sub-bucket ring
//! - Immutable export snapshots computed on demand
//!
//! Recording front-ends and exporters live elsewhere; this crate owns only
//! the in-process state and its synchronous operations.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod measure;
pub mod types;
pub mod view;

// Re-export main types
pub use error::{Error, Result};
pub use measure::{MeasureDescriptor, MeasureDouble, MeasureHandle, MeasureInt, MeasureRegistry};
pub use types::{TagValues, Timestamp};
pub use view::{Aggregation, AggregationWindow, BucketBoundaries, ViewData, ViewDescriptor};
