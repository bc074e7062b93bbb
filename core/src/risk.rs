//! Ground-truth poverty risk label.
//!
//! label = clip(0.30 mobility + 0.25 charging + 0.25 sms + 0.20 asset + N(0, 0.1), 0, 1)
//! computed over the full 30-day log. Weights are fixed.

use crate::{
    profile::{DailyRecord, Profile, ProfileDraft},
    rng::StageRng,
};
use serde::{Deserialize, Serialize};

pub const MOBILITY_WEIGHT: f64 = 0.30;
pub const CHARGING_WEIGHT: f64 = 0.25;
pub const SMS_WEIGHT: f64 = 0.25;
pub const ASSET_WEIGHT: f64 = 0.20;
pub const LABEL_NOISE_SD: f64 = 0.1;

const STEPS_REFERENCE: f64 = 10_000.0;
const SMS_SATURATION: f64 = 5.0;
const GOAT_ASSET_VALUE: f64 = 0.2;
const CHICKEN_ASSET_VALUE: f64 = 0.05;

/// The four latent factors behind a label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub mobility: f64,
    pub charging: f64,
    pub sms: f64,
    pub asset: f64,
}

impl RiskFactors {
    pub fn from_log(records: &[DailyRecord], goats: u32, chickens: u32) -> Self {
        let mobility = 1.0 - mean(records.iter().map(|d| d.steps_mean)) / STEPS_REFERENCE;
        let charging = mean(records.iter().map(|d| d.charge_night_fraction));
        let sms = (mean(records.iter().map(|d| d.sms_loan_count as f64)) / SMS_SATURATION).min(1.0);
        let holdings = goats as f64 * GOAT_ASSET_VALUE + chickens as f64 * CHICKEN_ASSET_VALUE;
        let asset = 1.0 - holdings.min(1.0);
        Self { mobility, charging, sms, asset }
    }

    /// Weighted sum before noise and clipping.
    pub fn composite(&self) -> f64 {
        MOBILITY_WEIGHT * self.mobility
            + CHARGING_WEIGHT * self.charging
            + SMS_WEIGHT * self.sms
            + ASSET_WEIGHT * self.asset
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn factors(&self, draft: &ProfileDraft) -> RiskFactors {
        RiskFactors::from_log(&draft.daily_records, draft.goats, draft.chickens)
    }

    /// Compute the label for a complete draft. Always in [0, 1].
    pub fn score(&self, draft: &ProfileDraft, rng: &mut StageRng) -> f64 {
        let noise = rng.normal(0.0, LABEL_NOISE_SD);
        (self.factors(draft).composite() + noise).clamp(0.0, 1.0)
    }

    /// Score and freeze the draft into a labelled profile.
    pub fn label(&self, draft: ProfileDraft, rng: &mut StageRng) -> Profile {
        let risk = self.score(&draft, rng);
        draft.freeze(risk)
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
