//! Integration tests for the view data engine
//!
//! These tests validate the complete aggregation pipeline per window and
//! aggregation kind: cumulative sum/count/distribution row math, interval
//! windowing with decay, export snapshot construction, and the
//! snapshot-is-read-only guarantee.

use std::time::Duration;

use kuba_stats::view::{
    Aggregation, AggregationWindow, BucketBoundaries, ViewData, ViewDescriptor,
};
use kuba_stats::TagValues;

const SECOND: i64 = 1_000;
const MINUTE: i64 = 60 * SECOND;

// ============================================================================
// Helper Functions
// ============================================================================

fn tags(values: &[&str]) -> TagValues {
    values.iter().map(|v| v.to_string()).collect()
}

fn descriptor(aggregation: Aggregation, window: AggregationWindow) -> ViewDescriptor {
    ViewDescriptor::new()
        .with_name("test_view")
        .with_measure("test_measure")
        .add_column("key1")
        .add_column("key2")
        .with_aggregation(aggregation)
        .with_aggregation_window(window)
}

// ============================================================================
// Cumulative Views
// ============================================================================

#[test]
fn cumulative_sum() {
    let start_time = 0;
    let end_time = SECOND;
    let mut data = ViewData::new(
        start_time,
        &descriptor(Aggregation::Sum, AggregationWindow::Cumulative),
    );
    let tags1 = tags(&["value1", "value2a"]);
    let tags2 = tags(&["value1", "value2b"]);

    data.add(1.0, &tags1, start_time);
    data.add(2.0, &tags1, start_time);
    data.add(5.0, &tags2, end_time);

    assert_eq!(*data.aggregation(), Aggregation::Sum);
    assert_eq!(*data.aggregation_window(), AggregationWindow::Cumulative);
    assert_eq!(data.start_time(), start_time);
    assert_eq!(data.end_time(), end_time);

    let rows = data.double_rows().expect("sum view stores double rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[&tags1], 3.0);
    assert_eq!(rows[&tags2], 5.0);
}

#[test]
fn cumulative_count_ignores_values() {
    let start_time = 0;
    let end_time = SECOND;
    let mut data = ViewData::new(
        start_time,
        &descriptor(Aggregation::Count, AggregationWindow::Cumulative),
    );
    let tags1 = tags(&["value1", "value2a"]);
    let tags2 = tags(&["value1", "value2b"]);

    data.add(1.0, &tags1, start_time);
    data.add(2.0, &tags1, start_time);
    data.add(5.0, &tags2, end_time);

    assert_eq!(data.start_time(), start_time);
    assert_eq!(data.end_time(), end_time);

    let rows = data.int_rows().expect("count view stores int rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[&tags1], 2);
    assert_eq!(rows[&tags2], 1);
}

#[test]
fn cumulative_distribution() {
    let start_time = 0;
    let end_time = SECOND;
    let buckets = BucketBoundaries::explicit(vec![10.0]);
    let mut data = ViewData::new(
        start_time,
        &descriptor(
            Aggregation::Distribution(buckets.clone()),
            AggregationWindow::Cumulative,
        ),
    );
    let tags1 = tags(&["value1", "value2a"]);
    let tags2 = tags(&["value1", "value2b"]);

    data.add(1.0, &tags1, start_time);
    data.add(5.0, &tags1, end_time);
    data.add(15.0, &tags2, end_time);

    assert_eq!(*data.aggregation(), Aggregation::Distribution(buckets));
    assert_eq!(data.start_time(), start_time);
    assert_eq!(data.end_time(), end_time);

    let rows = data
        .distribution_rows()
        .expect("distribution view stores distribution rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[&tags1].bucket_counts(), &[2, 0]);
    assert_eq!(rows[&tags2].bucket_counts(), &[0, 1]);
}

// ============================================================================
// Interval Views
// ============================================================================

#[test]
fn interval_count_snapshot_and_decay() {
    let interval = Duration::from_millis(MINUTE as u64);
    let start_time = 0;
    let mut time = start_time;
    let mut data = ViewData::new(
        start_time,
        &descriptor(Aggregation::Count, AggregationWindow::Interval(interval)),
    );
    let tags1 = tags(&["value1", "value2a"]);
    let tags2 = tags(&["value1", "value2b"]);

    data.add(1.0, &tags1, time);
    data.add(2.0, &tags1, time);
    data.add(2.0, &tags2, time);
    time += MINUTE / 2;
    data.add(1.0, &tags1, time);

    let export = data.snapshot(time).expect("interval views snapshot");
    assert_eq!(*export.aggregation(), Aggregation::Count);
    assert_eq!(
        *export.aggregation_window(),
        AggregationWindow::Interval(interval)
    );
    assert_eq!(export.start_time(), start_time);
    assert_eq!(export.end_time(), time);
    let rows = export.double_rows().expect("exports store double rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[&tags1], 3.0);
    assert_eq!(rows[&tags2], 1.0);

    // A full window later the first-burst counts have expired; rows remain
    // visible at zero.
    time += MINUTE;
    let export = data.snapshot(time).expect("interval views snapshot");
    assert_eq!(export.start_time(), time - MINUTE);
    assert_eq!(export.end_time(), time);
    let rows = export.double_rows().expect("exports store double rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[&tags1], 1.0);
    assert_eq!(rows[&tags2], 0.0);
}

#[test]
fn interval_sum_snapshot_and_decay() {
    let interval = Duration::from_millis(MINUTE as u64);
    let start_time = 0;
    let mut time = start_time;
    let mut data = ViewData::new(
        start_time,
        &descriptor(Aggregation::Sum, AggregationWindow::Interval(interval)),
    );
    let tags1 = tags(&["value1", "value2a"]);
    let tags2 = tags(&["value1", "value2b"]);

    data.add(1.0, &tags1, time);
    data.add(3.0, &tags1, time);
    data.add(2.0, &tags2, time);
    time += MINUTE / 2;
    data.add(2.0, &tags1, time);

    let export = data.snapshot(time).expect("interval views snapshot");
    assert_eq!(*export.aggregation(), Aggregation::Sum);
    assert_eq!(export.start_time(), start_time);
    assert_eq!(export.end_time(), time);
    let rows = export.double_rows().expect("exports store double rows");
    assert_eq!(rows[&tags1], 6.0);
    assert_eq!(rows[&tags2], 2.0);

    time += MINUTE;
    let export = data.snapshot(time).expect("interval views snapshot");
    assert_eq!(export.start_time(), time - MINUTE);
    assert_eq!(export.end_time(), time);
    let rows = export.double_rows().expect("exports store double rows");
    assert_eq!(rows[&tags1], 2.0);
    assert_eq!(rows[&tags2], 0.0);
}

#[test]
fn interval_distribution_snapshot_and_decay() {
    let interval = Duration::from_millis(MINUTE as u64);
    let start_time = 0;
    let mut time = start_time;
    let buckets = BucketBoundaries::explicit(vec![10.0]);
    let mut data = ViewData::new(
        start_time,
        &descriptor(
            Aggregation::Distribution(buckets),
            AggregationWindow::Interval(interval),
        ),
    );
    let tags1 = tags(&["value1", "value2a"]);
    let tags2 = tags(&["value1", "value2b"]);

    data.add(5.0, &tags1, time);
    data.add(15.0, &tags1, time);
    data.add(0.0, &tags2, time);
    time += MINUTE / 2;
    data.add(10.0, &tags1, time);

    let export = data.snapshot(time).expect("interval views snapshot");
    assert_eq!(export.start_time(), start_time);
    assert_eq!(export.end_time(), time);
    let rows = export
        .distribution_rows()
        .expect("distribution exports store distribution rows");
    assert_eq!(rows.len(), 2);

    let distribution = &rows[&tags1];
    assert_eq!(distribution.count(), 3);
    assert_eq!(distribution.mean(), 10.0);
    assert!((distribution.sum_of_squared_deviation() - 50.0).abs() < 1e-9);
    assert_eq!(distribution.min(), 5.0);
    assert_eq!(distribution.max(), 15.0);
    assert_eq!(distribution.bucket_counts(), &[1, 2]);

    let distribution = &rows[&tags2];
    assert_eq!(distribution.count(), 1);
    assert_eq!(distribution.mean(), 0.0);
    assert_eq!(distribution.sum_of_squared_deviation(), 0.0);
    assert_eq!(distribution.min(), 0.0);
    assert_eq!(distribution.max(), 0.0);
    assert_eq!(distribution.bucket_counts(), &[1, 0]);

    time += MINUTE;
    let export = data.snapshot(time).expect("interval views snapshot");
    assert_eq!(export.start_time(), time - MINUTE);
    assert_eq!(export.end_time(), time);
    let rows = export
        .distribution_rows()
        .expect("distribution exports store distribution rows");
    assert_eq!(rows.len(), 2);

    let distribution = &rows[&tags1];
    assert_eq!(distribution.count(), 1);
    assert_eq!(distribution.mean(), 10.0);
    assert_eq!(distribution.sum_of_squared_deviation(), 0.0);
    assert_eq!(distribution.min(), 10.0);
    assert_eq!(distribution.max(), 10.0);
    assert_eq!(distribution.bucket_counts(), &[0, 1]);

    // A row fully outside the window reads as empty but stays present.
    let distribution = &rows[&tags2];
    assert_eq!(distribution.count(), 0);
    assert_eq!(distribution.mean(), 0.0);
    assert_eq!(distribution.sum_of_squared_deviation(), 0.0);
    assert_eq!(distribution.min(), f64::INFINITY);
    assert_eq!(distribution.max(), f64::NEG_INFINITY);
    assert_eq!(distribution.bucket_counts(), &[0, 0]);
}

#[test]
fn snapshot_is_read_only_on_the_source() {
    let interval = Duration::from_millis(MINUTE as u64);
    let mut data = ViewData::new(
        0,
        &descriptor(Aggregation::Sum, AggregationWindow::Interval(interval)),
    );
    let tags1 = tags(&["value1", "value2a"]);
    data.add(4.0, &tags1, 0);

    let start_before = data.start_time();
    let end_before = data.end_time();

    // Snapshot far past the window, then re-snapshot inside it: the source
    // ring must still hold the original value.
    let late = data.snapshot(10 * MINUTE).expect("interval views snapshot");
    assert_eq!(late.double_rows().unwrap()[&tags1], 0.0);

    let early = data.snapshot(MINUTE / 2).expect("interval views snapshot");
    assert_eq!(early.double_rows().unwrap()[&tags1], 4.0);

    assert_eq!(data.start_time(), start_before);
    assert_eq!(data.end_time(), end_before);
    assert_eq!(data.interval_rows().unwrap().len(), 1);
}

#[test]
fn interval_rows_persist_after_decay() {
    let interval = Duration::from_millis(MINUTE as u64);
    let mut data = ViewData::new(
        0,
        &descriptor(Aggregation::Count, AggregationWindow::Interval(interval)),
    );
    data.add(1.0, &tags(&["a", "b"]), 0);

    // Recording another row much later slides the first row's window empty,
    // but the row itself is never removed.
    data.add(1.0, &tags(&["c", "d"]), 10 * MINUTE);
    let export = data.snapshot(10 * MINUTE).expect("interval views snapshot");
    let rows = export.double_rows().expect("exports store double rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[&tags(&["a", "b"])], 0.0);
    assert_eq!(rows[&tags(&["c", "d"])], 1.0);
}
