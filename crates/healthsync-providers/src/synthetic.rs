// ABOUTME: In-memory synthetic health data provider for development and testing
// ABOUTME: Supports seeded data generation, failure injection, simulated latency, and a query log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// RwLock poisoning is reported as ProviderError::Unavailable so callers see an
// ordinary provider failure instead of a panic.

//! # Synthetic Health Provider
//!
//! Stands in for a platform health store:
//!
//! - Requires no platform permissions
//! - Accepts points and daily aggregates injected at runtime
//! - Generates deterministic history from a seed
//! - Records every query so tests can assert on query shape and count
//! - Fails on demand, per data type, per aggregate, or after N queries
//!
//! ## Thread Safety
//!
//! All state sits behind `RwLock`/`Mutex`; no guard is held across an await,
//! so one instance can serve concurrent readers.

use async_trait::async_trait;
use chrono::{Datelike, DateTime, Days, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use tracing::debug;

use crate::constants::{fields, providers};
use crate::core::{DeviceRegistry, HealthDataProvider};
use crate::errors::ProviderError;
use crate::models::{DeviceClass, DeviceIdentity};
use crate::query::{
    AggregateMetric, AggregateRequest, DataType, PointRequest, RawPoint, TimeFilter,
};

/// One query received by the synthetic provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRecord {
    /// A `query_points` call
    Points(PointRequest),
    /// A `query_aggregate` call
    Aggregate(AggregateRequest),
}

#[derive(Debug, Default)]
struct FailurePlan {
    points: HashMap<DataType, ProviderError>,
    aggregates: HashMap<AggregateMetric, ProviderError>,
    after: Option<(usize, ProviderError)>,
}

/// In-memory health data provider
pub struct SyntheticHealthProvider {
    name: String,
    device: RwLock<Option<DeviceIdentity>>,
    points: RwLock<HashMap<DataType, Vec<RawPoint>>>,
    aggregates: RwLock<HashMap<(AggregateMetric, NaiveDate), f64>>,
    failures: RwLock<FailurePlan>,
    query_log: Mutex<Vec<QueryRecord>>,
    latency: Option<std::time::Duration>,
}

impl Default for SyntheticHealthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntheticHealthProvider {
    /// Empty provider with a registered watch
    #[must_use]
    pub fn new() -> Self {
        Self::with_name(providers::SYNTHETIC)
    }

    /// Empty provider with a custom name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            device: RwLock::new(Some(DeviceIdentity::new(
                format!("{name}-device-0001"),
                DeviceClass::Watch,
            ))),
            points: RwLock::new(HashMap::new()),
            aggregates: RwLock::new(HashMap::new()),
            failures: RwLock::new(FailurePlan::default()),
            query_log: Mutex::new(Vec::new()),
            latency: None,
        }
    }

    /// Delay every query by `latency`
    #[must_use]
    pub fn with_latency(mut self, latency: std::time::Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn poisoned(&self, lock: &str) -> ProviderError {
        ProviderError::Unavailable {
            provider: self.name.clone(),
            message: format!("RwLock poisoned: {lock} lock"),
        }
    }

    /// Replace the registered device (`None` unregisters it)
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn set_device(&self, device: Option<DeviceIdentity>) -> Result<(), ProviderError> {
        *self.device.write().map_err(|_| self.poisoned("device"))? = device;
        Ok(())
    }

    /// Add one point of `data_type`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn add_point(&self, data_type: DataType, point: RawPoint) -> Result<(), ProviderError> {
        self.add_points(data_type, [point])
    }

    /// Add several points of `data_type`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn add_points(
        &self,
        data_type: DataType,
        points: impl IntoIterator<Item = RawPoint>,
    ) -> Result<(), ProviderError> {
        self.points
            .write()
            .map_err(|_| self.poisoned("points"))?
            .entry(data_type)
            .or_default()
            .extend(points);
        Ok(())
    }

    /// Set the aggregate value for one local date
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn set_aggregate(
        &self,
        metric: AggregateMetric,
        date: NaiveDate,
        value: f64,
    ) -> Result<(), ProviderError> {
        self.aggregates
            .write()
            .map_err(|_| self.poisoned("aggregates"))?
            .insert((metric, date), value);
        Ok(())
    }

    /// Make every point query for `data_type` fail with `error`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn fail_points(&self, data_type: DataType, error: ProviderError) -> Result<(), ProviderError> {
        self.failures
            .write()
            .map_err(|_| self.poisoned("failures"))?
            .points
            .insert(data_type, error);
        Ok(())
    }

    /// Make every aggregate query for `metric` fail with `error`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn fail_aggregate(
        &self,
        metric: AggregateMetric,
        error: ProviderError,
    ) -> Result<(), ProviderError> {
        self.failures
            .write()
            .map_err(|_| self.poisoned("failures"))?
            .aggregates
            .insert(metric, error);
        Ok(())
    }

    /// Let `queries` queries succeed, then fail every later one with `error`
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn fail_after(&self, queries: usize, error: ProviderError) -> Result<(), ProviderError> {
        self.failures
            .write()
            .map_err(|_| self.poisoned("failures"))?
            .after = Some((queries, error));
        Ok(())
    }

    /// Remove every injected failure
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn clear_failures(&self) -> Result<(), ProviderError> {
        *self.failures.write().map_err(|_| self.poisoned("failures"))? = FailurePlan::default();
        Ok(())
    }

    /// Every query received so far, in arrival order
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn queries(&self) -> Result<Vec<QueryRecord>, ProviderError> {
        Ok(self
            .query_log
            .lock()
            .map_err(|_| self.poisoned("query_log"))?
            .clone())
    }

    /// Point queries received so far
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn point_queries(&self) -> Result<Vec<PointRequest>, ProviderError> {
        Ok(self
            .queries()?
            .into_iter()
            .filter_map(|query| match query {
                QueryRecord::Points(request) => Some(request),
                QueryRecord::Aggregate(_) => None,
            })
            .collect())
    }

    /// Forget every logged query
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if the internal lock is poisoned.
    pub fn clear_query_log(&self) -> Result<(), ProviderError> {
        self.query_log
            .lock()
            .map_err(|_| self.poisoned("query_log"))?
            .clear();
        Ok(())
    }

    /// Log the query and return the injected failure for it, if any
    fn admit(&self, query: QueryRecord) -> Result<(), ProviderError> {
        let previous = {
            let mut log = self.query_log.lock().map_err(|_| self.poisoned("query_log"))?;
            log.push(query);
            log.len() - 1
        };

        let failures = self.failures.read().map_err(|_| self.poisoned("failures"))?;
        if let Some((allowed, error)) = &failures.after {
            if previous >= *allowed {
                return Err(error.clone());
            }
        }
        let injected = match query {
            QueryRecord::Points(request) => failures.points.get(&request.data_type),
            QueryRecord::Aggregate(request) => failures.aggregates.get(&request.metric),
        };
        injected.map_or(Ok(()), |error| Err(error.clone()))
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    /// Local date of a point, in its own recording zone (UTC when unknown)
    fn local_date(point: &RawPoint) -> NaiveDate {
        point
            .utc_offset
            .and_then(FixedOffset::east_opt)
            .map_or_else(
                || point.start_time.date_naive(),
                |offset| point.start_time.with_timezone(&offset).date_naive(),
            )
    }

    /// Populate `days` days of deterministic history ending on `last_date`
    ///
    /// Roughly one day in ten is left empty so consumers see gaps.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Unavailable` if an internal lock is poisoned.
    pub fn seed_history(
        &self,
        days: u32,
        last_date: NaiveDate,
        zone: FixedOffset,
        seed: u64,
    ) -> Result<(), ProviderError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for back in (0..days).rev() {
            let Some(date) = last_date.checked_sub_days(Days::new(u64::from(back))) else {
                continue;
            };
            if rng.gen_bool(0.1) {
                continue;
            }
            self.seed_day(&mut rng, date, zone)?;
        }
        debug!(provider = %self.name, days, %last_date, "Seeded synthetic health history");
        Ok(())
    }

    fn seed_day(
        &self,
        rng: &mut ChaCha8Rng,
        date: NaiveDate,
        zone: FixedOffset,
    ) -> Result<(), ProviderError> {
        let offset = zone.local_minus_utc();
        let at = |hour: u32, minute: u32| -> DateTime<Utc> {
            let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
            zone.from_local_datetime(&date.and_time(time))
                .single()
                .map_or_else(|| date.and_time(time).and_utc(), |local| local.with_timezone(&Utc))
        };

        let heart_rate = (0..6).map(|slot| {
            let bpm = f64::from(rng.gen_range(55_u32..110));
            RawPoint::at(at(slot * 4 + 1, 0))
                .with_offset(offset)
                .with_source("synthetic.watch")
                .with_field(fields::BPM, bpm)
        });
        self.add_points(DataType::HeartRate, heart_rate.collect::<Vec<_>>())?;

        if date.day0() % 2 == 0 {
            let systolic = f64::from(rng.gen_range(105_u32..135));
            let diastolic = f64::from(rng.gen_range(65_u32..88));
            self.add_point(
                DataType::BloodPressure,
                RawPoint::at(at(8, 0))
                    .with_offset(offset)
                    .with_field(fields::SYSTOLIC, systolic)
                    .with_field(fields::DIASTOLIC, diastolic)
                    .with_field(fields::PULSE_RATE, f64::from(rng.gen_range(58_u32..80))),
            )?;
        }

        let sleep_start = at(0, 30);
        let wake = at(rng.gen_range(6..8), rng.gen_range(0..60));
        let split = sleep_start + Duration::minutes(rng.gen_range(120..200));
        let resume = split + Duration::minutes(rng.gen_range(5..25));
        self.add_point(
            DataType::Sleep,
            RawPoint::at(sleep_start)
                .ending_at(wake)
                .with_offset(offset)
                .with_field(
                    fields::SESSIONS,
                    Value::Array(vec![
                        session_value(sleep_start, split),
                        session_value(resume, wake),
                    ]),
                ),
        )?;

        let drinks = rng.gen_range(0..6_u32);
        let water: Vec<_> = (0..drinks)
            .map(|drink| {
                RawPoint::at(at(9 + drink * 2, 15))
                    .with_offset(offset)
                    .with_field(fields::AMOUNT_ML, 250.0)
            })
            .collect();
        self.add_points(DataType::WaterIntake, water)?;
        self.set_aggregate(AggregateMetric::WaterIntakeTotal, date, f64::from(drinks) * 250.0)?;
        self.set_aggregate(AggregateMetric::WaterIntakeGoal, date, 2000.0)?;

        let mut step_total = 0_i64;
        let mut steps = Vec::new();
        for hour in 8..20 {
            let count = rng.gen_range(0_i64..1200);
            step_total += count;
            steps.push(
                RawPoint::at(at(hour, 0))
                    .ending_at(at(hour, 59))
                    .with_offset(offset)
                    .with_field(fields::COUNT, count),
            );
        }
        self.add_points(DataType::Steps, steps)?;
        #[allow(clippy::cast_precision_loss)]
        self.set_aggregate(AggregateMetric::StepsTotal, date, step_total as f64)?;
        self.set_aggregate(AggregateMetric::StepsGoal, date, 8000.0)?;

        let mut exercise_minutes = 0.0;
        let mut exercise_calories = 0.0;
        if date.day0() % 3 == 0 {
            let minutes = rng.gen_range(25_u32..70);
            let calories = f64::from(minutes) * 9.5;
            exercise_minutes = f64::from(minutes);
            exercise_calories = calories;
            let start = at(18, 0);
            self.add_point(
                DataType::Exercise,
                RawPoint::at(start)
                    .ending_at(start + Duration::minutes(i64::from(minutes)))
                    .with_offset(offset)
                    .with_field(fields::EXERCISE_TYPE, "running")
                    .with_field(fields::DURATION_MINUTES, f64::from(minutes))
                    .with_field(fields::CALORIES, calories)
                    .with_field(fields::DISTANCE_METERS, f64::from(minutes) * 160.0),
            )?;
        }
        self.set_aggregate(AggregateMetric::ExerciseDurationTotal, date, exercise_minutes)?;
        self.set_aggregate(AggregateMetric::ExerciseCaloriesTotal, date, exercise_calories)?;

        #[allow(clippy::cast_precision_loss)]
        let distance = step_total as f64 * 0.75;
        self.set_aggregate(
            AggregateMetric::ActiveCaloriesTotal,
            date,
            exercise_calories + f64::from(rng.gen_range(150_u32..400)),
        )?;
        self.set_aggregate(
            AggregateMetric::ActiveMinutesTotal,
            date,
            exercise_minutes + f64::from(rng.gen_range(10_u32..60)),
        )?;
        self.set_aggregate(AggregateMetric::DistanceTotal, date, distance)?;
        self.set_aggregate(AggregateMetric::ActiveCaloriesGoal, date, 500.0)?;
        self.set_aggregate(AggregateMetric::ActiveMinutesGoal, date, 60.0)?;
        Ok(())
    }
}

fn session_value(start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    let mut session = Map::new();
    session.insert(fields::START.to_owned(), Value::String(start.to_rfc3339()));
    session.insert(fields::END.to_owned(), Value::String(end.to_rfc3339()));
    Value::Object(session)
}

#[async_trait]
impl HealthDataProvider for SyntheticHealthProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn query_points(&self, request: &PointRequest) -> Result<Vec<RawPoint>, ProviderError> {
        self.admit(QueryRecord::Points(*request))?;
        self.simulate_latency().await;

        let store = self.points.read().map_err(|_| self.poisoned("points"))?;
        let mut matching: Vec<RawPoint> = store
            .get(&request.data_type)
            .map(|points| {
                points
                    .iter()
                    .filter(|point| match request.filter {
                        TimeFilter::Instant { start, end } => {
                            point.start_time >= start && point.start_time < end
                        }
                        TimeFilter::LocalDate { start, end } => {
                            let date = Self::local_date(point);
                            date >= start && date < end
                        }
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(store);

        matching.sort_by_key(|point| point.start_time);
        Ok(matching)
    }

    async fn query_aggregate(&self, request: &AggregateRequest) -> Result<f64, ProviderError> {
        self.admit(QueryRecord::Aggregate(*request))?;
        self.simulate_latency().await;

        let TimeFilter::LocalDate { start, end } = request.filter else {
            return Err(ProviderError::MalformedRequest {
                provider: self.name.clone(),
                message: format!("{} requires a local date filter", request.metric),
            });
        };

        let store = self.aggregates.read().map_err(|_| self.poisoned("aggregates"))?;
        Ok(store
            .iter()
            .filter(|((metric, date), _)| *metric == request.metric && *date >= start && *date < end)
            .map(|(_, value)| *value)
            .sum())
    }
}

#[async_trait]
impl DeviceRegistry for SyntheticHealthProvider {
    async fn local_device(&self) -> Result<Option<DeviceIdentity>, ProviderError> {
        Ok(self
            .device
            .read()
            .map_err(|_| self.poisoned("device"))?
            .clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap_or_default()
    }

    #[tokio::test]
    async fn aggregates_sum_over_date_range() {
        let provider = SyntheticHealthProvider::new();
        provider
            .set_aggregate(AggregateMetric::StepsTotal, date(1), 100.0)
            .unwrap();
        provider
            .set_aggregate(AggregateMetric::StepsTotal, date(2), 50.0)
            .unwrap();
        let request = AggregateRequest::new(
            AggregateMetric::StepsTotal,
            TimeFilter::LocalDate {
                start: date(1),
                end: date(3),
            },
        );
        assert!((provider.query_aggregate(&request).await.unwrap() - 150.0).abs() < f64::EPSILON);

        let single = AggregateRequest::new(AggregateMetric::StepsTotal, TimeFilter::local_day(date(2)));
        assert!((provider.query_aggregate(&single).await.unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn aggregate_with_instant_filter_is_malformed() {
        let provider = SyntheticHealthProvider::new();
        let now = Utc::now();
        let request = AggregateRequest::new(
            AggregateMetric::WaterIntakeGoal,
            TimeFilter::instant(now - Duration::days(1), now),
        );
        let result = provider.query_aggregate(&request).await;
        assert!(matches!(result, Err(ProviderError::MalformedRequest { .. })));
    }

    #[tokio::test]
    async fn fail_after_lets_earlier_queries_through() {
        let provider = SyntheticHealthProvider::new();
        provider
            .fail_after(
                1,
                ProviderError::Unavailable {
                    provider: "synthetic".to_owned(),
                    message: "quota".to_owned(),
                },
            )
            .unwrap();
        let now = Utc::now();
        let request = PointRequest::new(
            DataType::HeartRate,
            TimeFilter::instant(now - Duration::days(1), now),
        );
        assert!(provider.query_points(&request).await.is_ok());
        assert!(provider.query_points(&request).await.is_err());
        assert_eq!(provider.queries().unwrap().len(), 2);
    }

    #[test]
    fn seeded_history_is_deterministic() {
        let zone = FixedOffset::east_opt(9 * 3600).unwrap();
        let first = SyntheticHealthProvider::new();
        let second = SyntheticHealthProvider::new();
        first.seed_history(30, date(30), zone, 7).unwrap();
        second.seed_history(30, date(30), zone, 7).unwrap();

        let first_points = first.points.read().unwrap();
        let second_points = second.points.read().unwrap();
        assert_eq!(
            first_points.get(&DataType::HeartRate),
            second_points.get(&DataType::HeartRate)
        );
        assert!(first_points.get(&DataType::Sleep).is_some_and(|sleep| !sleep.is_empty()));
    }
}
