//! Core data types shared across the stats core
//!
//! # Key Types
//!
//! - **`Timestamp`**: Unix timestamp in milliseconds (i64)
//! - **`TagValues`**: the ordered tag-value tuple keying one row of a view
//!
//! # Example
//!
//! ```rust
//! use kuba_stats::types::{TagValues, Timestamp};
//!
//! let now: Timestamp = 1_700_000_000_000;
//! let row_key: TagValues = vec!["api".to_string(), "us-east".to_string()];
//! assert_eq!(row_key.len(), 2);
//! ```

use std::time::Duration;

/// Unix timestamp in milliseconds since epoch (1970-01-01 00:00:00 UTC)
///
/// Example: 1700000000000 represents 2023-11-14 22:13:20 UTC. All record and
/// snapshot operations take an explicit timestamp; the core never reads the
/// system clock.
pub type Timestamp = i64;

/// Ordered sequence of tag values labeling a single row within a view
///
/// The number and meaning of the entries is fixed per view by its descriptor's
/// column list. Rows are keyed structurally: two `TagValues` are the same row
/// exactly when they are element-wise equal.
pub type TagValues = Vec<String>;

/// Convert a window duration to whole milliseconds, saturating at `i64::MAX`.
pub(crate) fn duration_to_millis(duration: Duration) -> i64 {
    duration.as_millis().min(i64::MAX as u128) as i64
}
