//! Feature expansion: 7 base statistics -> 21 positional features.
//!
//!   0..=6   base statistics
//!   7       OLS slope of steps over window positions 0..6
//!   8       variance of steps
//!   9       variance of night-charge fraction
//!   10      window step total / 7 (0 when the total is 0)
//!   11      weekend (pos 5-6) / weekday (pos 0-4) step ratio, 1 when weekday mean is 0
//!   12..=20 base[i % 7] * (1 + 0.1 i), i = 0..8
//!
//! Indices 12..=20 are scaled copies of the base statistics and carry no
//! independent signal; only 12 of the 21 features are distinct. They are
//! kept so downstream models see the fixed 21-wide input.

use crate::{
    types::{BASE_STAT_COUNT, FEATURE_COUNT, WINDOW_DAYS},
    window::{mean, variance, BaseStats, Window},
};
use serde::{Deserialize, Serialize};

const WEEKDAY_DAYS: usize = 5;
const SCALED_COPY_COUNT: usize = 9;
const SCALED_COPY_STEP: f64 = 0.1;

/// Positional names, written to the dataset metadata.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "steps_mean",
    "steps_std",
    "charge_night_pct",
    "sms_loan_count",
    "idle_periods",
    "charge_cycles",
    "steps_variability",
    "steps_trend",
    "steps_variance",
    "charge_variance",
    "daily_avg_steps",
    "weekend_ratio",
    "engineered_0",
    "engineered_1",
    "engineered_2",
    "engineered_3",
    "engineered_4",
    "engineered_5",
    "engineered_6",
    "engineered_7",
    "engineered_8",
];

/// Fixed-length feature row for one profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn values_mut(&mut self) -> &mut [f64; FEATURE_COUNT] {
        &mut self.0
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FeatureExpander;

impl FeatureExpander {
    pub fn new() -> Self {
        Self
    }

    /// Deterministic: the same window and stats always give the same bits.
    pub fn expand(&self, window: &Window<'_>, base: &BaseStats) -> FeatureVector {
        let steps = window.steps();
        let mut out = [0.0; FEATURE_COUNT];

        out[..BASE_STAT_COUNT].copy_from_slice(&base.to_array());
        out[7] = ols_slope(&steps);
        out[8] = variance(&steps);
        out[9] = variance(&window.charge_night());

        let total: f64 = steps.iter().sum();
        out[10] = if total > 0.0 {
            total / WINDOW_DAYS as f64
        } else {
            0.0
        };
        out[11] = weekend_ratio(&steps);

        for i in 0..SCALED_COPY_COUNT {
            out[12 + i] = out[i % BASE_STAT_COUNT] * (1.0 + i as f64 * SCALED_COPY_STEP);
        }

        FeatureVector(out)
    }
}

/// Least-squares slope of `ys` against x = 0, 1, ..., n-1.
pub fn ols_slope(ys: &[f64]) -> f64 {
    let n = ys.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(ys);
    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (i, y) in ys.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxy += dx * (y - y_mean);
        sxx += dx * dx;
    }
    sxy / sxx
}

fn weekend_ratio(steps: &[f64; WINDOW_DAYS]) -> f64 {
    let weekday = mean(&steps[..WEEKDAY_DAYS]);
    let weekend = mean(&steps[WEEKDAY_DAYS..]);
    // Not a real "equal" ratio; guards the division.
    if weekday > 0.0 {
        weekend / weekday
    } else {
        1.0
    }
}
