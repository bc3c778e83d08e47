// ABOUTME: Concrete per-metric sources plugged into the generic simple and composite readers
// ABOUTME: Declares each metric's point type, aggregates, mapper and daily assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::NaiveDate;

use super::composite::{CompositeSource, DailyAggregates};
use super::simple::SimpleSource;
use crate::errors::SyncResult;
use crate::mappers;
use crate::models::{
    ActivitySummaryRecord, BloodPressureRecord, DeviceIdentity, ExercisePoint, ExerciseRecord,
    HeartRateRecord, MetricKind, SleepRecord, StepsPoint, StepsRecord, WaterIntakePoint,
    WaterIntakeRecord,
};
use crate::providers::{AggregateMetric, DataType, RawPoint};

/// Heart rate samples
#[derive(Debug, Clone, Copy, Default)]
pub struct HeartRateSource;

impl SimpleSource for HeartRateSource {
    type Record = HeartRateRecord;

    fn metric(&self) -> MetricKind {
        MetricKind::HeartRate
    }

    fn data_type(&self) -> DataType {
        DataType::HeartRate
    }

    fn map(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<HeartRateRecord> {
        mappers::map_heart_rate(point, device)
    }
}

/// Sleep records
#[derive(Debug, Clone, Copy, Default)]
pub struct SleepSource;

impl SimpleSource for SleepSource {
    type Record = SleepRecord;

    fn metric(&self) -> MetricKind {
        MetricKind::Sleep
    }

    fn data_type(&self) -> DataType {
        DataType::Sleep
    }

    fn map(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<SleepRecord> {
        mappers::map_sleep(point, device)
    }
}

/// Blood pressure readings
#[derive(Debug, Clone, Copy, Default)]
pub struct BloodPressureSource;

impl SimpleSource for BloodPressureSource {
    type Record = BloodPressureRecord;

    fn metric(&self) -> MetricKind {
        MetricKind::BloodPressure
    }

    fn data_type(&self) -> DataType {
        DataType::BloodPressure
    }

    fn map(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<BloodPressureRecord> {
        mappers::map_blood_pressure(point, device)
    }
}

/// Daily water intake: events plus total and goal
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterIntakeSource;

impl CompositeSource for WaterIntakeSource {
    type Point = WaterIntakePoint;
    type Record = WaterIntakeRecord;

    fn metric(&self) -> MetricKind {
        MetricKind::WaterIntake
    }

    fn point_type(&self) -> Option<DataType> {
        Some(DataType::WaterIntake)
    }

    fn aggregates(&self) -> &'static [AggregateMetric] {
        &[AggregateMetric::WaterIntakeTotal, AggregateMetric::WaterIntakeGoal]
    }

    fn map_point(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<WaterIntakePoint> {
        mappers::map_water_intake(point, device)
    }

    fn assemble(
        &self,
        date: NaiveDate,
        points: Vec<WaterIntakePoint>,
        aggregates: &DailyAggregates,
    ) -> WaterIntakeRecord {
        WaterIntakeRecord {
            date,
            points,
            goal: aggregates.get(AggregateMetric::WaterIntakeGoal),
            total: aggregates.get(AggregateMetric::WaterIntakeTotal),
        }
    }
}

/// Daily steps: intervals plus total and goal
#[derive(Debug, Clone, Copy, Default)]
pub struct StepsSource;

impl CompositeSource for StepsSource {
    type Point = StepsPoint;
    type Record = StepsRecord;

    fn metric(&self) -> MetricKind {
        MetricKind::Steps
    }

    fn point_type(&self) -> Option<DataType> {
        Some(DataType::Steps)
    }

    fn aggregates(&self) -> &'static [AggregateMetric] {
        &[AggregateMetric::StepsTotal, AggregateMetric::StepsGoal]
    }

    fn map_point(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<StepsPoint> {
        mappers::map_steps(point, device)
    }

    fn assemble(
        &self,
        date: NaiveDate,
        points: Vec<StepsPoint>,
        aggregates: &DailyAggregates,
    ) -> StepsRecord {
        StepsRecord {
            date,
            points,
            total: aggregates.get(AggregateMetric::StepsTotal),
            goal: aggregates.get(AggregateMetric::StepsGoal),
        }
    }
}

/// Daily exercise: sessions plus duration and calorie totals
#[derive(Debug, Clone, Copy, Default)]
pub struct ExerciseSource;

impl CompositeSource for ExerciseSource {
    type Point = ExercisePoint;
    type Record = ExerciseRecord;

    fn metric(&self) -> MetricKind {
        MetricKind::Exercise
    }

    fn point_type(&self) -> Option<DataType> {
        Some(DataType::Exercise)
    }

    fn aggregates(&self) -> &'static [AggregateMetric] {
        &[
            AggregateMetric::ExerciseDurationTotal,
            AggregateMetric::ExerciseCaloriesTotal,
        ]
    }

    fn map_point(&self, point: &RawPoint, device: &DeviceIdentity) -> SyncResult<ExercisePoint> {
        mappers::map_exercise(point, device)
    }

    fn assemble(
        &self,
        date: NaiveDate,
        points: Vec<ExercisePoint>,
        aggregates: &DailyAggregates,
    ) -> ExerciseRecord {
        ExerciseRecord {
            date,
            points,
            total_duration_minutes: aggregates.get(AggregateMetric::ExerciseDurationTotal),
            total_calories: aggregates.get(AggregateMetric::ExerciseCaloriesTotal),
        }
    }
}

/// Daily activity summary, built from aggregates only
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivitySummarySource;

impl CompositeSource for ActivitySummarySource {
    type Point = ();
    type Record = ActivitySummaryRecord;

    fn metric(&self) -> MetricKind {
        MetricKind::ActivitySummary
    }

    fn point_type(&self) -> Option<DataType> {
        None
    }

    fn aggregates(&self) -> &'static [AggregateMetric] {
        &[
            AggregateMetric::ActiveCaloriesTotal,
            AggregateMetric::ActiveMinutesTotal,
            AggregateMetric::DistanceTotal,
            AggregateMetric::ActiveCaloriesGoal,
            AggregateMetric::ActiveMinutesGoal,
        ]
    }

    fn map_point(&self, _point: &RawPoint, _device: &DeviceIdentity) -> SyncResult<()> {
        Ok(())
    }

    fn assemble(
        &self,
        date: NaiveDate,
        _points: Vec<()>,
        aggregates: &DailyAggregates,
    ) -> ActivitySummaryRecord {
        ActivitySummaryRecord {
            date,
            active_calories: aggregates.get(AggregateMetric::ActiveCaloriesTotal),
            active_minutes: aggregates.get(AggregateMetric::ActiveMinutesTotal),
            distance_meters: aggregates.get(AggregateMetric::DistanceTotal),
            active_calories_goal: aggregates.get(AggregateMetric::ActiveCaloriesGoal),
            active_minutes_goal: aggregates.get(AggregateMetric::ActiveMinutesGoal),
        }
    }
}
