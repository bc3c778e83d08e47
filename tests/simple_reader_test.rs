// ABOUTME: Integration tests for the simple metric reader over the synthetic provider
// ABOUTME: Covers today queries, windowed backfill, throttling, progress and cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use common::{heart_rate_point, midnight, noon, zone, ProgressLog, ReaderHarness, ReversedProvider};
use healthsync::errors::{ProviderError, SyncError};
use healthsync::models::MetricKind;
use healthsync::providers::{DataType, TimeFilter};
use healthsync::readers::{simple, HeartRateSource, ReadContext};
use healthsync::windows::{chunk_for_years, Horizon};

fn four_hundred_day_horizon() -> Horizon {
    Horizon::new(noon() - Duration::days(400), chunk_for_years(1).unwrap())
}

#[tokio::test]
async fn test_today_issues_one_query_over_the_local_day() {
    let harness = ReaderHarness::at(noon());
    harness
        .provider
        .add_points(
            DataType::HeartRate,
            vec![
                heart_rate_point(midnight() - Duration::hours(1), 55.0),
                heart_rate_point(midnight() + Duration::hours(1), 61.0),
                heart_rate_point(midnight() + Duration::hours(20), 70.0),
            ],
        )
        .unwrap();

    let records = simple::read_today(&HeartRateSource, &harness.ctx())
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert!((records[0].value - 61.0).abs() < f64::EPSILON);

    let queries = harness.provider.point_queries().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].data_type, DataType::HeartRate);
    assert_eq!(
        queries[0].filter,
        TimeFilter::instant(midnight(), midnight() + Duration::days(1))
    );
}

#[tokio::test]
async fn test_backfill_reads_each_window_once_with_pauses_between() {
    let harness = ReaderHarness::at(noon());
    let horizon = four_hundred_day_horizon();
    harness
        .provider
        .add_points(
            DataType::HeartRate,
            vec![
                heart_rate_point(noon() - Duration::days(10), 64.0),
                heart_rate_point(noon() - Duration::days(390), 58.0),
                heart_rate_point(noon() - Duration::days(500), 99.0),
            ],
        )
        .unwrap();
    let progress = ProgressLog::default();

    let records = simple::read_all(&HeartRateSource, &harness.ctx(), &horizon, &|done, total| {
        progress.record(done, total);
    })
    .await
    .unwrap();

    assert_eq!(records.len(), 2);
    assert!(records[0].meta.start_time < records[1].meta.start_time);

    let queries = harness.provider.point_queries().unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(
        queries[0].filter,
        TimeFilter::instant(horizon.start, horizon.start + Duration::days(365))
    );
    assert_eq!(
        queries[1].filter,
        TimeFilter::instant(horizon.start + Duration::days(365), noon())
    );
    assert_eq!(harness.throttle.pauses(), 1);
    assert_eq!(progress.updates(), vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_backfill_is_idempotent() {
    let harness = ReaderHarness::at(noon());
    let horizon = four_hundred_day_horizon();
    harness
        .provider
        .seed_history(30, common::date(2024, 6, 15), common::zone(), 11)
        .unwrap();

    let first = simple::read_all(&HeartRateSource, &harness.ctx(), &horizon, &|_, _| {})
        .await
        .unwrap();
    let second = simple::read_all(&HeartRateSource, &harness.ctx(), &horizon, &|_, _| {})
        .await
        .unwrap();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failing_window_discards_partial_results() {
    let harness = ReaderHarness::at(noon());
    harness
        .provider
        .add_point(
            DataType::HeartRate,
            heart_rate_point(noon() - Duration::days(390), 58.0),
        )
        .unwrap();
    let unavailable = ProviderError::Unavailable {
        provider: "synthetic".to_owned(),
        message: "timed out".to_owned(),
    };
    harness.provider.fail_after(1, unavailable.clone()).unwrap();

    let err = simple::read_all(
        &HeartRateSource,
        &harness.ctx(),
        &four_hundred_day_horizon(),
        &|_, _| {},
    )
    .await
    .unwrap_err();

    assert_eq!(err, SyncError::Provider(unavailable));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_malformed_point_fails_the_metric() {
    let harness = ReaderHarness::at(noon());
    harness
        .provider
        .add_point(
            DataType::HeartRate,
            healthsync::providers::RawPoint::at(midnight() + Duration::hours(2)),
        )
        .unwrap();

    let err = simple::read_today(&HeartRateSource, &harness.ctx())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Mapping { metric: MetricKind::HeartRate, .. }));
}

#[tokio::test]
async fn test_cancelled_before_start_issues_no_query() {
    let harness = ReaderHarness::at(noon());
    harness.cancel.cancel();

    let err = simple::read_all(
        &HeartRateSource,
        &harness.ctx(),
        &four_hundred_day_horizon(),
        &|_, _| {},
    )
    .await
    .unwrap_err();

    assert_eq!(
        err,
        SyncError::Cancelled {
            metric: MetricKind::HeartRate
        }
    );
    assert!(harness.provider.queries().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_mid_backfill_skips_pending_pause_and_windows() {
    let harness = ReaderHarness::at(noon());
    harness
        .provider
        .add_point(
            DataType::HeartRate,
            heart_rate_point(noon() - Duration::days(390), 58.0),
        )
        .unwrap();
    let cancel = harness.cancel.clone();

    let err = simple::read_all(
        &HeartRateSource,
        &harness.ctx(),
        &four_hundred_day_horizon(),
        &move |_, _| cancel.cancel(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, SyncError::Cancelled { .. }));
    assert_eq!(harness.provider.point_queries().unwrap().len(), 1);
    assert_eq!(harness.throttle.pauses(), 0);
}

#[tokio::test]
async fn test_today_twice_returns_equal_results() {
    let harness = ReaderHarness::at(noon());
    harness
        .provider
        .seed_history(3, common::date(2024, 6, 15), common::zone(), 5)
        .unwrap();

    let first = simple::read_today(&HeartRateSource, &harness.ctx())
        .await
        .unwrap();
    let second = simple::read_today(&HeartRateSource, &harness.ctx())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(harness.provider.point_queries().unwrap().len(), 2);
}

#[tokio::test]
async fn test_backfill_orders_records_when_provider_returns_newest_first() {
    let harness = ReaderHarness::at(noon());
    let provider = ReversedProvider {
        inner: harness.provider,
    };
    provider
        .inner
        .add_points(
            DataType::HeartRate,
            vec![
                heart_rate_point(noon() - Duration::days(300), 58.0),
                heart_rate_point(noon() - Duration::days(200), 63.0),
                heart_rate_point(noon() - Duration::days(2), 71.0),
                heart_rate_point(noon() - Duration::hours(1), 66.0),
            ],
        )
        .unwrap();
    let ctx = ReadContext {
        provider: &provider,
        device: &harness.device,
        clock: &harness.clock,
        zone: zone(),
        throttle: &harness.throttle,
        cancel: &harness.cancel,
    };

    let records = simple::read_all(&HeartRateSource, &ctx, &four_hundred_day_horizon(), &|_, _| {})
        .await
        .unwrap();

    assert_eq!(records.len(), 4);
    assert!(records
        .windows(2)
        .all(|pair| pair[0].meta.start_time < pair[1].meta.start_time));
}
