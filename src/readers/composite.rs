// ABOUTME: Reader for metrics assembled per local day from raw points and provider aggregates
// ABOUTME: Buckets window points by day and skips days with no data during backfill
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

use super::{ProgressFn, ReadContext};
use crate::errors::SyncResult;
use crate::models::{CompositeRecord, DeviceIdentity, MetricKind};
use crate::providers::{AggregateMetric, AggregateRequest, DataType, PointRequest, RawPoint, TimeFilter};
use crate::windows::{split_into_days, today, Horizon, LocalDay, TimeWindow};

/// Aggregate values fetched for one local day
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyAggregates {
    values: HashMap<AggregateMetric, f64>,
}

impl DailyAggregates {
    /// Record one value
    pub fn insert(&mut self, metric: AggregateMetric, value: f64) {
        self.values.insert(metric, value);
    }

    /// Value of `metric`, `0.0` when not fetched
    #[must_use]
    pub fn get(&self, metric: AggregateMetric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(0.0)
    }
}

/// Metric read as one merged record per local day
pub trait CompositeSource: Send + Sync {
    /// Per-point record nested inside the daily record
    type Point: Send;
    /// Merged daily record
    type Record: CompositeRecord + Send;

    /// Metric being read
    fn metric(&self) -> MetricKind;

    /// Point type queried, or `None` for aggregate-only metrics
    fn point_type(&self) -> Option<DataType>;

    /// Aggregates queried for every day
    fn aggregates(&self) -> &'static [AggregateMetric];

    /// Convert one provider point
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Mapping` for unusable points.
    fn map_point(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<Self::Point>;

    /// Merge a day's points and aggregates
    fn assemble(
        &self,
        date: NaiveDate,
        points: Vec<Self::Point>,
        aggregates: &DailyAggregates,
    ) -> Self::Record;
}

/// Record for the current local day, returned even when empty
///
/// # Errors
///
/// Propagates provider, mapping and cancellation errors.
pub async fn read_today<S: CompositeSource>(
    source: &S,
    ctx: &ReadContext<'_>,
) -> SyncResult<S::Record> {
    let day = today(ctx.clock.now(), ctx.zone);
    let points = fetch_points(source, ctx, &day.window()).await?;
    read_day(source, ctx, &day, &points).await
}

/// One record per local day with data across the horizon
///
/// Progress is reported once per completed day; the total day count is
/// known before the first query. A day cut by a window edge is read once,
/// with the points of both slices.
///
/// # Errors
///
/// The first failure aborts the read; nothing read so far is returned.
pub async fn read_all<S: CompositeSource>(
    source: &S,
    ctx: &ReadContext<'_>,
    horizon: &Horizon,
    on_progress: ProgressFn<'_>,
) -> SyncResult<Vec<S::Record>> {
    let metric = source.metric();
    let windows = horizon.windows(ctx.clock.now())?;
    let plan: Vec<(TimeWindow, Vec<LocalDay>)> = windows
        .into_iter()
        .map(|window| {
            let days = split_into_days(&window, ctx.zone);
            (window, days)
        })
        .collect();
    let total = distinct_days(&plan);
    let window_count = plan.len();

    let mut records = Vec::new();
    let mut completed = 0;
    let mut open: Option<(LocalDay, Vec<RawPoint>)> = None;

    for (index, (window, days)) in plan.iter().enumerate() {
        let points = fetch_points(source, ctx, window).await?;
        let buckets = bucket_by_day(points, days);

        for (day, day_points) in days.iter().zip(buckets) {
            match open.take() {
                Some((mut slice, mut slice_points)) if slice.date == day.date => {
                    slice.end = day.end;
                    slice_points.extend(day_points);
                    open = Some((slice, slice_points));
                }
                Some((slice, slice_points)) => {
                    let record = read_present_day(source, ctx, &slice, &slice_points).await?;
                    records.extend(record);
                    completed += 1;
                    on_progress(completed, total);
                    open = Some((*day, day_points));
                }
                None => open = Some((*day, day_points)),
            }
        }

        debug!(
            metric = %metric,
            window = index + 1,
            total = window_count,
            days = days.len(),
            records = records.len(),
            "Read window"
        );

        if index + 1 < window_count {
            ctx.pause(metric).await?;
        }
    }

    if let Some((slice, slice_points)) = open {
        let record = read_present_day(source, ctx, &slice, &slice_points).await?;
        records.extend(record);
        completed += 1;
        on_progress(completed, total);
    }

    Ok(records)
}

/// Number of distinct local dates across the planned day slices
fn distinct_days(plan: &[(TimeWindow, Vec<LocalDay>)]) -> usize {
    let mut previous: Option<NaiveDate> = None;
    let mut count = 0;
    for day in plan.iter().flat_map(|(_, days)| days) {
        if previous != Some(day.date) {
            count += 1;
            previous = Some(day.date);
        }
    }
    count
}

async fn read_present_day<S: CompositeSource>(
    source: &S,
    ctx: &ReadContext<'_>,
    day: &LocalDay,
    points: &[RawPoint],
) -> SyncResult<Option<S::Record>> {
    let record = read_day(source, ctx, day, points).await?;
    Ok(record.is_present().then_some(record))
}

async fn fetch_points<S: CompositeSource>(
    source: &S,
    ctx: &ReadContext<'_>,
    window: &TimeWindow,
) -> SyncResult<Vec<RawPoint>> {
    let Some(data_type) = source.point_type() else {
        return Ok(Vec::new());
    };
    ctx.ensure_active(source.metric())?;
    let request = PointRequest::new(data_type, TimeFilter::instant(window.start, window.end));
    let mut points = ctx.provider.query_points(&request).await?;
    ctx.ensure_active(source.metric())?;
    points.sort_by_key(|point| point.start_time);
    Ok(points)
}

async fn read_day<S: CompositeSource>(
    source: &S,
    ctx: &ReadContext<'_>,
    day: &LocalDay,
    points: &[RawPoint],
) -> SyncResult<S::Record> {
    let mapped = points
        .iter()
        .map(|point| source.map_point(point, ctx.device))
        .collect::<SyncResult<Vec<_>>>()?;

    let mut aggregates = DailyAggregates::default();
    for &aggregate in source.aggregates() {
        ctx.ensure_active(source.metric())?;
        let request = AggregateRequest::new(aggregate, TimeFilter::local_day(day.date));
        let value = ctx.provider.query_aggregate(&request).await?;
        aggregates.insert(aggregate, value);
    }
    ctx.ensure_active(source.metric())?;

    Ok(source.assemble(day.date, mapped, &aggregates))
}

/// Distribute start-sorted points over the day slices of their window
fn bucket_by_day(points: Vec<RawPoint>, days: &[LocalDay]) -> Vec<Vec<RawPoint>> {
    let mut buckets: Vec<Vec<RawPoint>> = days.iter().map(|_| Vec::new()).collect();
    let mut day_index = 0;

    for point in points {
        while day_index < days.len() && point.start_time >= days[day_index].end {
            day_index += 1;
        }
        match days.get(day_index) {
            Some(day) if day.contains(point.start_time) => buckets[day_index].push(point),
            _ => debug!(start = %point.start_time, "Dropping point outside window days"),
        }
    }

    buckets
}
