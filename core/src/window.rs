//! Final-week window and its base statistics.
//!
//! The window is always the last 7 records of the log (days 23..29 for a
//! full profile), never a sliding window.

use crate::{
    error::{DatasetError, DatasetResult},
    profile::DailyRecord,
    types::{BASE_STAT_COUNT, WINDOW_DAYS},
};
use serde::{Deserialize, Serialize};

/// Exactly seven consecutive daily records, oldest first.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    records: &'a [DailyRecord; WINDOW_DAYS],
}

impl<'a> Window<'a> {
    /// Select the trailing week of a daily log.
    pub fn last_week(log: &'a [DailyRecord]) -> DatasetResult<Self> {
        let start = log.len().checked_sub(WINDOW_DAYS).ok_or(DatasetError::InsufficientData {
            available: log.len(),
            required: WINDOW_DAYS,
        })?;
        let records = <&[DailyRecord; WINDOW_DAYS]>::try_from(&log[start..]).map_err(|_| {
            DatasetError::InsufficientData {
                available: log.len(),
                required: WINDOW_DAYS,
            }
        })?;
        Ok(Self { records })
    }

    pub fn records(&self) -> &'a [DailyRecord; WINDOW_DAYS] {
        self.records
    }

    pub fn steps(&self) -> [f64; WINDOW_DAYS] {
        self.records.map(|d| d.steps_mean)
    }

    pub fn charge_night(&self) -> [f64; WINDOW_DAYS] {
        self.records.map(|d| d.charge_night_fraction)
    }
}

/// The seven base statistics, in their positional feature order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub steps_mean: f64,
    pub steps_spread: f64,
    pub charge_night_mean: f64,
    pub sms_loan_total: f64,
    pub idle_days: f64,
    pub charge_cycles_mean: f64,
    pub steps_std_spread: f64,
}

impl BaseStats {
    pub fn to_array(&self) -> [f64; BASE_STAT_COUNT] {
        [
            self.steps_mean,
            self.steps_spread,
            self.charge_night_mean,
            self.sms_loan_total,
            self.idle_days,
            self.charge_cycles_mean,
            self.steps_std_spread,
        ]
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WindowAggregator;

impl WindowAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn aggregate(&self, window: &Window<'_>) -> BaseStats {
        let r = window.records();
        BaseStats {
            steps_mean: mean(&window.steps()),
            steps_spread: std_dev(&window.steps()),
            charge_night_mean: mean(&window.charge_night()),
            sms_loan_total: r.iter().map(|d| d.sms_loan_count as f64).sum(),
            idle_days: r.iter().map(|d| d.idle_flag as f64).sum(),
            charge_cycles_mean: mean(&r.map(|d| d.charge_cycles as f64)),
            steps_std_spread: std_dev(&r.map(|d| d.steps_std)),
        }
    }
}

// Population moments (divide by n).

pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

pub(crate) fn variance(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    let m = mean(xs);
    xs.iter().map(|x| (x - m).powi(2)).sum::<f64>() / xs.len() as f64
}

pub(crate) fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}
