//! Ground-truth label tests.

use echowealth_core::{
    pipeline::DatasetPipeline,
    profile::{DailyRecord, ProfileDraft},
    risk::{RiskFactors, RiskScorer},
    rng::{RngBank, StageSlot},
};

fn day(i: u32, steps: f64, charge: f64, sms: u32) -> DailyRecord {
    DailyRecord {
        day_index: i,
        steps_mean: steps,
        steps_std: 1500.0,
        idle_flag: 0,
        charge_night_fraction: charge,
        charge_cycles: 1,
        sms_loan_count: sms,
    }
}

fn draft(steps: f64, charge: f64, sms: u32, goats: u32, chickens: u32) -> ProfileDraft {
    ProfileDraft {
        id: "p-test".into(),
        age: 35.0,
        household_size: 6,
        goats,
        chickens,
        base_risk: 0.9,
        daily_records: (0..30).map(|i| day(i, steps, charge, sms)).collect(),
    }
}

#[test]
fn factors_follow_the_formula() {
    let d = draft(4000.0, 0.5, 2, 2, 4);
    let f = RiskFactors::from_log(&d.daily_records, d.goats, d.chickens);

    assert!((f.mobility - 0.6).abs() < 1e-12);
    assert!((f.charging - 0.5).abs() < 1e-12);
    assert!((f.sms - 0.4).abs() < 1e-12);
    // 2 * 0.2 + 4 * 0.05 = 0.6
    assert!((f.asset - 0.4).abs() < 1e-12);

    let expected = 0.3 * 0.6 + 0.25 * 0.5 + 0.25 * 0.4 + 0.2 * 0.4;
    assert!((f.composite() - expected).abs() < 1e-12);
}

#[test]
fn sms_and_asset_factors_saturate() {
    let d = draft(0.0, 1.0, 12, 10, 40);
    let f = RiskFactors::from_log(&d.daily_records, d.goats, d.chickens);
    assert_eq!(f.sms, 1.0);
    assert_eq!(f.asset, 0.0);
    assert_eq!(f.mobility, 1.0);
}

#[test]
fn labels_always_within_unit_interval() {
    let pipeline = DatasetPipeline::build_test("risk-range-test".into(), 31).unwrap();
    let profiles = pipeline.generate_profiles(500).unwrap();
    for p in &profiles {
        let y = p.poverty_risk();
        assert!((0.0..=1.0).contains(&y), "Label out of range for {}: {y}", p.id);
    }
}

#[test]
fn extreme_inputs_still_clip() {
    let scorer = RiskScorer::new();
    let mut rng = RngBank::new(5).for_stage(StageSlot::Label);
    let worst = draft(0.0, 1.0, 20, 0, 0);
    let best = draft(30_000.0, 0.0, 0, 20, 50);
    for _ in 0..1000 {
        let hi = scorer.score(&worst, &mut rng);
        let lo = scorer.score(&best, &mut rng);
        assert!((0.0..=1.0).contains(&hi));
        assert!((0.0..=1.0).contains(&lo));
    }
}

#[test]
fn assetless_heavy_night_charging_scores_high() {
    let scorer = RiskScorer::new();
    let mut rng = RngBank::new(2025).for_stage(StageSlot::Label);
    let d = draft(5000.0, 1.0, 5, 0, 0);

    let factors = scorer.factors(&d);
    assert_eq!(factors.asset, 1.0);
    assert!(factors.composite() > 0.6, "Composite {}", factors.composite());

    let trials = 2000;
    let mean = (0..trials).map(|_| scorer.score(&d, &mut rng)).sum::<f64>() / trials as f64;
    assert!(mean > 0.6, "Mean label {mean:.3} should sit in the upper range");
}

#[test]
fn label_is_frozen_on_the_profile() {
    let scorer = RiskScorer::new();
    let mut rng = RngBank::new(8).for_stage(StageSlot::Label);
    let profile = scorer.label(draft(2500.0, 0.8, 3, 1, 2), &mut rng);
    let first = profile.poverty_risk();
    assert_eq!(first.to_bits(), profile.poverty_risk().to_bits());
    assert_eq!(profile.base_risk(), 0.9);
}
