//! Profile simulator: synthetic individuals and their 30-day behavioral logs.
//!
//! One latent `base_risk` per individual conditions every daily draw, so
//! days within a profile are correlated. The four behavioral signals are
//! gated through different cutoffs on that same scalar:
//!   - steps / idle:    > 0.7 high, > 0.4 medium, else low
//!   - night charging:  > 0.6 high, else low (charge cycles follow)
//!   - loan SMS:        > 0.5 high, else low

use crate::{
    error::{DatasetError, DatasetResult},
    rng::StageRng,
    types::{ProfileId, HORIZON_DAYS},
};
use serde::{Deserialize, Serialize};

// ── Static attribute parameters ──────────────────────────────────────────────

const AGE_MEAN: f64 = 35.0;
const AGE_SD: f64 = 12.0;
const HOUSEHOLD_POISSON_MEAN: f64 = 5.0;
const GOAT_OWNERSHIP_PROBABILITY: f64 = 0.7;
const GOAT_POISSON_MEAN: f64 = 2.0;
const CHICKEN_OWNERSHIP_PROBABILITY: f64 = 0.8;
const CHICKEN_POISSON_MEAN: f64 = 8.0;

// ── Behavioral band cutoffs ──────────────────────────────────────────────────

const MOBILITY_HIGH_CUTOFF: f64 = 0.7;
const MOBILITY_MEDIUM_CUTOFF: f64 = 0.4;
const CHARGING_HIGH_CUTOFF: f64 = 0.6;
const LOAN_SMS_HIGH_CUTOFF: f64 = 0.5;

const STEPS_STD_MEAN: f64 = 1500.0;
const STEPS_STD_SD: f64 = 300.0;

/// One simulated day for one individual.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub day_index: u32,
    pub steps_mean: f64,
    pub steps_std: f64,
    pub idle_flag: u32, // 0 | 1
    pub charge_night_fraction: f64,
    pub charge_cycles: u32,
    pub sms_loan_count: u32,
}

/// Mobility band selected by `base_risk` against the 0.7 / 0.4 cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilityBand {
    High,
    Medium,
    Low,
}

impl MobilityBand {
    pub fn for_risk(base_risk: f64) -> Self {
        if base_risk > MOBILITY_HIGH_CUTOFF {
            Self::High
        } else if base_risk > MOBILITY_MEDIUM_CUTOFF {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// (steps mean, steps s.d., idle-day probability)
    fn params(self) -> (f64, f64, f64) {
        match self {
            Self::High => (2500.0, 800.0, 0.4),
            Self::Medium => (5000.0, 1200.0, 0.2),
            Self::Low => (8000.0, 1500.0, 0.1),
        }
    }
}

/// A simulated individual before the ground-truth label is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub id: ProfileId,
    pub age: f64,
    pub household_size: u32,
    pub goats: u32,
    pub chickens: u32,
    /// Latent risk that conditioned the daily draws.
    pub base_risk: f64,
    pub daily_records: Vec<DailyRecord>,
}

impl ProfileDraft {
    /// Attach the label. A profile's label is set exactly once.
    pub fn freeze(self, poverty_risk: f64) -> Profile {
        Profile {
            id: self.id,
            age: self.age,
            household_size: self.household_size,
            goats: self.goats,
            chickens: self.chickens,
            base_risk: self.base_risk,
            daily_records: self.daily_records,
            poverty_risk,
        }
    }
}

/// A labelled individual. Read-only once built.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: ProfileId,
    pub age: f64,
    pub household_size: u32,
    pub goats: u32,
    pub chickens: u32,
    base_risk: f64,
    pub daily_records: Vec<DailyRecord>,
    poverty_risk: f64,
}

impl Profile {
    pub fn base_risk(&self) -> f64 {
        self.base_risk
    }

    pub fn poverty_risk(&self) -> f64 {
        self.poverty_risk
    }
}

/// Draws profiles. Holds no seed state; reproducibility comes from the
/// caller's `StageRng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileSimulator;

impl ProfileSimulator {
    pub fn new() -> Self {
        Self
    }

    /// Generate `count` independent drafts in id order.
    pub fn generate(&self, count: usize, rng: &mut StageRng) -> DatasetResult<Vec<ProfileDraft>> {
        if count == 0 {
            return Err(DatasetError::InvalidProfileCount { requested: 0 });
        }
        let drafts: Vec<_> = (0..count).map(|i| self.draw_profile(i, rng)).collect();
        log::info!("profile: simulated {} profiles x {HORIZON_DAYS} days", drafts.len());
        Ok(drafts)
    }

    /// Draw one individual. Draw order is fixed: attributes, base risk, then days.
    pub fn draw_profile(&self, index: usize, rng: &mut StageRng) -> ProfileDraft {
        let age = rng.normal(AGE_MEAN, AGE_SD);
        let household_size = 1 + rng.poisson(HOUSEHOLD_POISSON_MEAN);
        let goats = if rng.chance(GOAT_OWNERSHIP_PROBABILITY) {
            rng.poisson(GOAT_POISSON_MEAN)
        } else {
            0
        };
        let chickens = if rng.chance(CHICKEN_OWNERSHIP_PROBABILITY) {
            rng.poisson(CHICKEN_POISSON_MEAN)
        } else {
            0
        };

        let base_risk = rng.next_f64();
        let daily_records = (0..HORIZON_DAYS as u32)
            .map(|day| draw_day(day, base_risk, rng))
            .collect();

        ProfileDraft {
            id: format!("p-{index:06}"),
            age,
            household_size,
            goats,
            chickens,
            base_risk,
            daily_records,
        }
    }
}

/// Draw one day of behavior conditioned on `base_risk`.
pub fn draw_day(day_index: u32, base_risk: f64, rng: &mut StageRng) -> DailyRecord {
    let (steps_mu, steps_sd, idle_probability) = MobilityBand::for_risk(base_risk).params();
    let steps_mean = rng.normal(steps_mu, steps_sd);
    let steps_std = rng.normal(STEPS_STD_MEAN, STEPS_STD_SD);
    let idle_flag = u32::from(rng.chance(idle_probability));

    let (charge_night, charge_cycles) = if base_risk > CHARGING_HIGH_CUTOFF {
        (rng.normal(0.7, 0.2), rng.poisson(1.0))
    } else {
        (rng.normal(0.3, 0.15), rng.poisson(2.0))
    };

    let sms_loan_count = if base_risk > LOAN_SMS_HIGH_CUTOFF {
        rng.poisson(3.0)
    } else {
        rng.poisson(0.5)
    };

    DailyRecord {
        day_index,
        steps_mean: steps_mean.max(0.0),
        steps_std: steps_std.max(0.0),
        idle_flag,
        charge_night_fraction: charge_night.clamp(0.0, 1.0),
        charge_cycles,
        sms_loan_count,
    }
}
