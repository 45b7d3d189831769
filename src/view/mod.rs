//! View Data Engine
//!
//! This module holds the running aggregation for each registered view and
//! produces immutable export snapshots on demand. It supports two window
//! kinds across three aggregation kinds:
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           ViewDescriptor            │
//! │   aggregation + window + columns    │
//! └─────────────────────────────────────┘
//!                  ↓
//! ┌─────────────────────────────────────┐
//! │             ViewData                │
//! │   tag values → per-row state        │
//! │   (sum / count / distribution /     │
//! │    rolling-window ring)             │
//! └─────────────────────────────────────┘
//!                  ↓
//! ┌─────────────────────────────────────┐
//! │         Export snapshot             │
//! │   immutable windowed readout        │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Key Components
//!
//! - **[`ViewDescriptor`]**: configuration (aggregation kind, window kind,
//!   tag columns)
//! - **[`ViewData`]**: the per-view state, a tagged union of four row maps
//! - **[`IntervalStats`]**: the rolling-window ring backing interval views
//! - **[`Distribution`]** / **[`BucketBoundaries`]**: histogram statistics
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use kuba_stats::view::{Aggregation, AggregationWindow, ViewData, ViewDescriptor};
//!
//! let descriptor = ViewDescriptor::new()
//!     .with_name("requests/minute")
//!     .with_aggregation(Aggregation::Count)
//!     .with_aggregation_window(AggregationWindow::Interval(Duration::from_secs(60)))
//!     .add_column("method");
//!
//! let mut data = ViewData::new(0, &descriptor);
//! data.add(1.0, &["get".to_string()], 10_000);
//! data.add(1.0, &["get".to_string()], 20_000);
//!
//! let export = data.snapshot(30_000).unwrap();
//! assert_eq!(export.double_rows().unwrap()[&vec!["get".to_string()]], 2.0);
//! ```

pub mod buckets;
pub mod data;
pub mod descriptor;
pub mod distribution;
pub mod interval;

pub use buckets::BucketBoundaries;
pub use data::{ViewData, ViewRows};
pub use descriptor::{Aggregation, AggregationWindow, ViewDescriptor};
pub use distribution::Distribution;
pub use interval::{IntervalStats, DISTRIBUTION_STAT_SLOTS, SUBINTERVALS};
