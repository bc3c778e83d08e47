// ABOUTME: Integration tests for the sync orchestrator across all metrics
// ABOUTME: Covers failure isolation, retries of failed metrics, overlap rejection and cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{date, midnight, noon, orchestrator, zone};
use healthsync::config::SyncConfig;
use healthsync::errors::{ErrorCode, ProviderError, SyncError};
use healthsync::models::{DailyMetric, DeviceClass, DeviceIdentity, MetricKind, SyncMode};
use healthsync::progress::NoProgress;
use healthsync::providers::{DataType, SyntheticHealthProvider};
use healthsync::sync::{RunStatus, SyncPhase};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn all_metrics() -> BTreeSet<MetricKind> {
    MetricKind::ALL.into_iter().collect()
}

fn seeded_provider() -> Arc<SyntheticHealthProvider> {
    let provider = Arc::new(SyntheticHealthProvider::new());
    provider
        .seed_history(14, date(2024, 6, 15), zone(), 42)
        .unwrap();
    provider
}

fn short_horizon() -> SyncConfig {
    SyncConfig {
        horizon_years: 1,
        ..SyncConfig::default()
    }
}

#[tokio::test]
async fn test_today_syncs_every_metric() {
    let provider = seeded_provider();
    let orchestrator = orchestrator(&provider, SyncConfig::default(), noon());

    let report = orchestrator.sync_today(&all_metrics()).await.unwrap();

    assert_eq!(report.status(), RunStatus::Succeeded);
    assert_eq!(report.mode, SyncMode::Today);
    assert_eq!(report.date, date(2024, 6, 15));
    assert_eq!(report.results().len(), 7);
    assert!(report.failed_metrics().is_empty());

    let payload = report.into_daily_payload().unwrap();
    assert_eq!(payload.device.device_id, "synthetic-device-0001");
    assert!(matches!(
        payload.metrics.get(&MetricKind::Steps),
        Some(DailyMetric::Steps(record)) if record.date == date(2024, 6, 15)
    ));
    assert_eq!(orchestrator.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn test_one_failing_metric_does_not_affect_others() {
    let provider = seeded_provider();
    provider
        .fail_points(
            DataType::Steps,
            ProviderError::Unavailable {
                provider: "synthetic".to_owned(),
                message: "store busy".to_owned(),
            },
        )
        .unwrap();
    let orchestrator = orchestrator(&provider, SyncConfig::default(), noon());

    let report = orchestrator.sync_today(&all_metrics()).await.unwrap();

    assert_eq!(report.status(), RunStatus::PartiallyFailed);
    assert_eq!(report.failed_metrics(), BTreeSet::from([MetricKind::Steps]));
    assert_eq!(report.succeeded_metrics().len(), 6);
    let summary = report.summary();
    assert_eq!(
        summary.failed.get(&MetricKind::Steps).map(|failure| failure.code),
        Some(ErrorCode::ProviderUnavailable)
    );
    assert!(summary.failed[&MetricKind::Steps].retryable);

    // Retry just the failed metric once the store recovers
    provider.clear_failures().unwrap();
    let retry = orchestrator
        .sync_today(&report.failed_metrics())
        .await
        .unwrap();
    assert_eq!(retry.status(), RunStatus::Succeeded);
    assert_eq!(retry.succeeded_metrics(), BTreeSet::from([MetricKind::Steps]));
}

#[tokio::test]
async fn test_empty_request_succeeds_without_touching_provider() {
    let provider = seeded_provider();
    let orchestrator = orchestrator(&provider, SyncConfig::default(), noon());

    let report = orchestrator.sync_today(&BTreeSet::new()).await.unwrap();

    assert_eq!(report.status(), RunStatus::Succeeded);
    assert!(report.results().is_empty());
    assert!(provider.queries().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_device_fails_every_metric() {
    let provider = seeded_provider();
    provider.set_device(None).unwrap();
    let orchestrator = orchestrator(&provider, SyncConfig::default(), noon());

    let report = orchestrator.sync_today(&all_metrics()).await.unwrap();

    assert_eq!(report.status(), RunStatus::Failed);
    assert!(report.results().values().all(|result| matches!(
        result,
        Err(SyncError::NoDeviceRegistered { .. })
    )));
    assert!(provider.queries().unwrap().is_empty());
    assert!(report.into_daily_payload().is_none());
}

#[tokio::test]
async fn test_each_run_resolves_the_device_again() {
    let provider = seeded_provider();
    let orchestrator = orchestrator(&provider, SyncConfig::default(), noon());
    let metrics: BTreeSet<MetricKind> = [MetricKind::HeartRate].into_iter().collect();
    let replacement = DeviceIdentity::new("phone-2", DeviceClass::Mobile);

    let first = orchestrator.sync_today(&metrics).await.unwrap();
    provider.set_device(Some(replacement.clone())).unwrap();
    let second = orchestrator.sync_today(&metrics).await.unwrap();

    assert_eq!(
        first.device.as_ref().map(|device| device.device_id.as_str()),
        Some("synthetic-device-0001")
    );
    assert_eq!(second.device.as_ref(), Some(&replacement));
    let payload = second.into_daily_payload().unwrap();
    match payload.metrics.get(&MetricKind::HeartRate) {
        Some(DailyMetric::HeartRate(records)) => {
            assert!(records.iter().all(|record| record.meta.device_id == "phone-2"));
        }
        other => panic!("unexpected heart rate result: {other:?}"),
    }
}

#[tokio::test]
async fn test_full_backfill_reports_progress_per_metric() {
    let provider = seeded_provider();
    let orchestrator = orchestrator(&provider, short_horizon(), midnight());
    let updates = Mutex::new(Vec::new());
    let reporter = |metric: MetricKind, completed: usize, total: usize| {
        updates.lock().unwrap().push((metric, completed, total));
    };

    let report = orchestrator.sync_full(&all_metrics(), &reporter).await.unwrap();

    assert_eq!(report.status(), RunStatus::Succeeded);
    let updates = updates.into_inner().unwrap();
    for metric in MetricKind::ALL {
        let last = updates
            .iter()
            .filter(|(reported, _, _)| *reported == metric)
            .last()
            .copied()
            .unwrap();
        assert_eq!(last.1, last.2, "{metric} did not finish its progress");
        assert_eq!(
            orchestrator.progress().get(metric).map(|progress| progress.completed),
            Some(last.1)
        );
    }

    // 1 year horizon with one-year chunks: 2 windows, 366 local days (2024 is a leap year)
    assert_eq!(orchestrator.progress().get(MetricKind::HeartRate).unwrap().total, 2);
    assert_eq!(orchestrator.progress().get(MetricKind::Steps).unwrap().total, 366);

    let payload = report.into_full_payload().unwrap();
    assert_eq!(payload.metrics.len(), 7);
    assert!(payload.record_count() > 0);
    let steps = &payload.metrics[&MetricKind::Steps];
    assert!(steps.len() <= 14 && !steps.is_empty());
}

#[tokio::test]
async fn test_second_run_while_running_is_rejected() {
    let provider = Arc::new(SyntheticHealthProvider::new().with_latency(Duration::from_millis(20)));
    let orchestrator = orchestrator(&provider, short_horizon(), noon());
    let metrics = BTreeSet::from([MetricKind::HeartRate]);

    let (first, second) = tokio::join!(orchestrator.sync_full(&metrics, &NoProgress), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        orchestrator.sync_today(&metrics).await
    });

    assert_eq!(first.unwrap().status(), RunStatus::Succeeded);
    assert_eq!(second.unwrap_err(), SyncError::AlreadyRunning);
    assert_eq!(orchestrator.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn test_cancel_discards_in_flight_metrics() {
    let provider = Arc::new(SyntheticHealthProvider::new().with_latency(Duration::from_millis(20)));
    let config = SyncConfig {
        horizon_years: 5,
        ..SyncConfig::default()
    };
    let orchestrator = orchestrator(&provider, config, noon());
    let metrics = BTreeSet::from([MetricKind::HeartRate, MetricKind::Steps]);

    let (report, cancelled) = tokio::join!(orchestrator.sync_full(&metrics, &NoProgress), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        let phase = orchestrator.phase();
        (phase, orchestrator.cancel())
    });

    assert_eq!(cancelled, (SyncPhase::Backfilling, true));
    let report = report.unwrap();
    assert!(report.cancelled);
    assert_eq!(report.status(), RunStatus::Failed);
    for metric in &metrics {
        assert_eq!(
            report.get(*metric),
            Some(&Err(SyncError::Cancelled { metric: *metric }))
        );
    }
    assert!(report.into_full_payload().unwrap().metrics.is_empty());
    assert!(!orchestrator.cancel());
}
