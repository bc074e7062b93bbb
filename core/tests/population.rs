//! Profile simulation invariants.

use echowealth_core::{
    error::DatasetError,
    profile::{draw_day, MobilityBand, ProfileSimulator},
    rng::{RngBank, StageRng, StageSlot},
    types::HORIZON_DAYS,
};
use std::collections::HashSet;

fn profile_rng(seed: u64) -> StageRng {
    RngBank::new(seed).for_stage(StageSlot::Profile)
}

#[test]
fn generates_requested_number_of_profiles() {
    let drafts = ProfileSimulator::new()
        .generate(50, &mut profile_rng(42))
        .unwrap();
    assert_eq!(drafts.len(), 50, "Expected 50 profiles, got {}", drafts.len());

    let ids: HashSet<_> = drafts.iter().map(|d| d.id.clone()).collect();
    assert_eq!(ids.len(), 50, "Profile ids must be unique within a run");
    assert_eq!(drafts[0].id, "p-000000");
}

#[test]
fn zero_profiles_is_rejected() {
    let err = ProfileSimulator::new()
        .generate(0, &mut profile_rng(1))
        .unwrap_err();
    assert!(
        matches!(err, DatasetError::InvalidProfileCount { requested: 0 }),
        "Unexpected error: {err}"
    );
}

#[test]
fn every_profile_has_thirty_ordered_days() {
    let drafts = ProfileSimulator::new()
        .generate(100, &mut profile_rng(9))
        .unwrap();
    for d in &drafts {
        assert_eq!(d.daily_records.len(), HORIZON_DAYS);
        for (i, day) in d.daily_records.iter().enumerate() {
            assert_eq!(day.day_index as usize, i, "Days out of order in {}", d.id);
        }
    }
}

#[test]
fn daily_records_respect_floors_and_clips() {
    let drafts = ProfileSimulator::new()
        .generate(300, &mut profile_rng(123))
        .unwrap();
    for d in &drafts {
        assert!(d.household_size >= 1, "Household size below 1 in {}", d.id);
        assert!((0.0..1.0).contains(&d.base_risk));
        for day in &d.daily_records {
            assert!(day.steps_mean >= 0.0);
            assert!(day.steps_std >= 0.0);
            assert!(day.idle_flag <= 1);
            assert!(
                (0.0..=1.0).contains(&day.charge_night_fraction),
                "Night-charge fraction out of range: {}",
                day.charge_night_fraction
            );
        }
    }
}

#[test]
fn mobility_falls_as_base_risk_rises() {
    let drafts = ProfileSimulator::new()
        .generate(600, &mut profile_rng(2024))
        .unwrap();

    let band_mean = |band: MobilityBand| {
        let steps: Vec<f64> = drafts
            .iter()
            .filter(|d| MobilityBand::for_risk(d.base_risk) == band)
            .flat_map(|d| d.daily_records.iter().map(|r| r.steps_mean))
            .collect();
        assert!(!steps.is_empty(), "No profiles landed in {band:?}");
        steps.iter().sum::<f64>() / steps.len() as f64
    };

    let high = band_mean(MobilityBand::High);
    let medium = band_mean(MobilityBand::Medium);
    let low = band_mean(MobilityBand::Low);

    assert!((high - 2500.0).abs() < 150.0, "High band steps mean {high:.0}");
    assert!((medium - 5000.0).abs() < 150.0, "Medium band steps mean {medium:.0}");
    assert!((low - 8000.0).abs() < 150.0, "Low band steps mean {low:.0}");
}

#[test]
fn band_cutoffs() {
    assert_eq!(MobilityBand::for_risk(0.71), MobilityBand::High);
    assert_eq!(MobilityBand::for_risk(0.7), MobilityBand::Medium);
    assert_eq!(MobilityBand::for_risk(0.41), MobilityBand::Medium);
    assert_eq!(MobilityBand::for_risk(0.4), MobilityBand::Low);
}

#[test]
fn charging_and_loan_signals_use_their_own_cutoffs() {
    let mut rng = profile_rng(55);
    let days = 4000;

    // 0.65: medium mobility, but above the 0.6 charging cutoff.
    let charging: f64 = (0..days)
        .map(|i| draw_day(i % 30, 0.65, &mut rng).charge_night_fraction)
        .sum::<f64>()
        / days as f64;
    assert!(charging > 0.6, "Expected heavy night charging, got {charging:.3}");

    // 0.55: below the charging cutoff but above the 0.5 loan cutoff.
    let samples: Vec<_> = (0..days).map(|i| draw_day(i % 30, 0.55, &mut rng)).collect();
    let charge = samples.iter().map(|d| d.charge_night_fraction).sum::<f64>() / days as f64;
    let loans = samples.iter().map(|d| d.sms_loan_count as f64).sum::<f64>() / days as f64;
    assert!(charge < 0.4, "Expected light night charging, got {charge:.3}");
    assert!((loans - 3.0).abs() < 0.2, "Expected loan SMS mean near 3, got {loans:.3}");

    // 0.45: both below; loan mean near 0.5.
    let low_loans = (0..days)
        .map(|i| draw_day(i % 30, 0.45, &mut rng).sms_loan_count as f64)
        .sum::<f64>()
        / days as f64;
    assert!((low_loans - 0.5).abs() < 0.1, "Expected loan SMS mean near 0.5, got {low_loans:.3}");
}

#[test]
fn asset_holdings_follow_ownership_rates() {
    let drafts = ProfileSimulator::new()
        .generate(2000, &mut profile_rng(77))
        .unwrap();
    let n = drafts.len() as f64;
    let goat_mean = drafts.iter().map(|d| d.goats as f64).sum::<f64>() / n;
    let chicken_mean = drafts.iter().map(|d| d.chickens as f64).sum::<f64>() / n;

    // E[goats] = 0.7 * 2, E[chickens] = 0.8 * 8
    assert!((goat_mean - 1.4).abs() < 0.15, "Goat mean {goat_mean:.2}");
    assert!((chicken_mean - 6.4).abs() < 0.4, "Chicken mean {chicken_mean:.2}");
}
