// ABOUTME: Reader for metrics whose points map one-to-one onto uploaded records
// ABOUTME: Reads the current local day or the whole horizon window by window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::debug;

use super::{ProgressFn, ReadContext};
use crate::errors::SyncResult;
use crate::models::{DeviceIdentity, MetricKind};
use crate::providers::{DataType, PointRequest, RawPoint, TimeFilter};
use crate::windows::{today, Horizon, TimeWindow};

/// Metric read as a flat list of points
pub trait SimpleSource: Send + Sync {
    /// Domain record produced per point
    type Record: Send;

    /// Metric being read
    fn metric(&self) -> MetricKind;

    /// Provider point type queried
    fn data_type(&self) -> DataType;

    /// Query for one window
    fn request(&self, window: &TimeWindow) -> PointRequest {
        PointRequest::new(self.data_type(), TimeFilter::instant(window.start, window.end))
    }

    /// Convert one provider point
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Mapping` for unusable points.
    fn map(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<Self::Record>;
}

/// All points of the current local day
///
/// # Errors
///
/// Propagates provider, mapping and cancellation errors.
pub async fn read_today<S: SimpleSource>(
    source: &S,
    ctx: &ReadContext<'_>,
) -> SyncResult<Vec<S::Record>> {
    let day = today(ctx.clock.now(), ctx.zone);
    read_window(source, ctx, &day.window()).await
}

/// All points across the horizon, ascending by start time
///
/// Progress is reported once per completed window.
///
/// # Errors
///
/// The first failing window aborts the read; nothing read so far is returned.
pub async fn read_all<S: SimpleSource>(
    source: &S,
    ctx: &ReadContext<'_>,
    horizon: &Horizon,
    on_progress: ProgressFn<'_>,
) -> SyncResult<Vec<S::Record>> {
    let metric = source.metric();
    let windows = horizon.windows(ctx.clock.now())?;
    let total = windows.len();
    let mut records = Vec::new();

    for (index, window) in windows.iter().enumerate() {
        let batch = read_window(source, ctx, window).await?;
        debug!(
            metric = %metric,
            window = index + 1,
            total,
            records = batch.len(),
            "Read window"
        );
        records.extend(batch);
        on_progress(index + 1, total);

        if index + 1 < total {
            ctx.pause(metric).await?;
        }
    }

    Ok(records)
}

async fn read_window<S: SimpleSource>(
    source: &S,
    ctx: &ReadContext<'_>,
    window: &TimeWindow,
) -> SyncResult<Vec<S::Record>> {
    let metric = source.metric();
    ctx.ensure_active(metric)?;
    let mut points = ctx.provider.query_points(&source.request(window)).await?;
    ctx.ensure_active(metric)?;
    points.sort_by_key(|point| point.start_time);

    points
        .iter()
        .map(|point| source.map(point, ctx.device))
        .collect()
}
