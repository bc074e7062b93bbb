//! The generation pipeline.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. ProfileSimulator   drafts N profiles           (Profile stream)
//!   2. RiskScorer         labels each draft in order  (Label stream)
//!   3. WindowAggregator   base stats of the last week
//!   4. FeatureExpander    21 features per profile
//!   5. DatasetNormalizer  per-row standardization + assembly
//!
//! RULES:
//!   - All randomness flows through the RngBank; stages 3-5 use none.
//!   - Any failure aborts the run; nothing partial is returned.

use crate::{
    error::{DatasetError, DatasetResult},
    features::{FeatureExpander, FeatureVector},
    normalizer::{Dataset, DatasetNormalizer},
    profile::{Profile, ProfileSimulator},
    risk::RiskScorer,
    rng::{RngBank, StageSlot},
    store::ProfileStore,
    types::RunId,
    window::{Window, WindowAggregator},
    writer::{DatasetMetadata, DatasetWriter, WrittenArtifacts},
};
use chrono::{DateTime, Utc};

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct GenerationRun {
    pub run_id: RunId,
    pub seed: u64,
    pub profiles: Vec<Profile>,
    pub dataset: Dataset,
}

pub struct DatasetPipeline {
    pub run_id: RunId,
    pub rng_bank: RngBank,
    simulator: ProfileSimulator,
    scorer: RiskScorer,
    aggregator: WindowAggregator,
    expander: FeatureExpander,
    normalizer: DatasetNormalizer,
}

impl DatasetPipeline {
    pub fn new(run_id: RunId, seed: u64) -> Self {
        Self {
            run_id,
            rng_bank: RngBank::new(seed),
            simulator: ProfileSimulator::new(),
            scorer: RiskScorer::new(),
            aggregator: WindowAggregator::new(),
            expander: FeatureExpander::new(),
            normalizer: DatasetNormalizer::new(),
        }
    }

    /// Pipeline for tests: same wiring, fixed run id.
    pub fn build_test(run_id: RunId, seed: u64) -> DatasetResult<Self> {
        Ok(Self::new(run_id, seed))
    }

    pub fn seed(&self) -> u64 {
        self.rng_bank.master_seed()
    }

    /// Stages 1-2: simulate and label `count` profiles.
    pub fn generate_profiles(&self, count: usize) -> DatasetResult<Vec<Profile>> {
        let mut profile_rng = self.rng_bank.for_stage(StageSlot::Profile);
        let mut label_rng = self.rng_bank.for_stage(StageSlot::Label);

        let drafts = self.simulator.generate(count, &mut profile_rng)?;
        let profiles: Vec<Profile> = drafts
            .into_iter()
            .map(|draft| self.scorer.label(draft, &mut label_rng))
            .collect();
        log::info!("risk: labelled {} profiles", profiles.len());
        Ok(profiles)
    }

    /// Stage 3-4 for a single profile.
    pub fn feature_vector(&self, profile: &Profile) -> DatasetResult<FeatureVector> {
        let window = Window::last_week(&profile.daily_records)?;
        let base = self.aggregator.aggregate(&window);
        Ok(self.expander.expand(&window, &base))
    }

    /// Stages 3-5: turn labelled profiles into the final dataset.
    pub fn build_dataset(&self, profiles: &[Profile]) -> DatasetResult<Dataset> {
        if profiles.is_empty() {
            return Err(DatasetError::InvalidProfileCount { requested: 0 });
        }
        let features = profiles
            .iter()
            .map(|p| self.feature_vector(p))
            .collect::<DatasetResult<Vec<_>>>()?;
        let labels = profiles.iter().map(Profile::poverty_risk).collect();
        self.normalizer.assemble(features, labels)
    }

    /// Run every stage for `count` profiles.
    pub fn run(&self, count: usize) -> DatasetResult<GenerationRun> {
        log::info!("pipeline: run {} seed={} profiles={count}", self.run_id, self.seed());
        let profiles = self.generate_profiles(count)?;
        let dataset = self.build_dataset(&profiles)?;
        Ok(GenerationRun {
            run_id: self.run_id.clone(),
            seed: self.seed(),
            profiles,
            dataset,
        })
    }
}

/// Persist a finished run.
///
/// Order: open the ledger, stage the artifacts, record the run in the
/// ledger, then commit the artifacts. Any failure before the commit leaves
/// the output directory without new artifacts.
pub fn publish(
    run: &GenerationRun,
    writer: &DatasetWriter,
    ledger_path: Option<&str>,
    version: &str,
    generated_at: DateTime<Utc>,
) -> DatasetResult<(DatasetMetadata, WrittenArtifacts)> {
    let ledger = match ledger_path {
        Some(path) => {
            let store = ProfileStore::open(path)?;
            store.migrate()?;
            Some(store)
        }
        None => None,
    };

    let metadata = DatasetMetadata::describe(&run.dataset, &run.run_id, run.seed, generated_at);
    let staged = writer.stage(&run.dataset, &metadata)?;

    if let Some(store) = &ledger {
        let recorded = store
            .insert_run(&run.run_id, run.seed, version, run.profiles.len(), generated_at)
            .and_then(|_| store.insert_profiles(&run.run_id, &run.profiles));
        if let Err(e) = recorded {
            staged.discard();
            return Err(e);
        }
    }

    let artifacts = staged.commit()?;
    Ok((metadata, artifacts))
}

/// Fresh run id for a generation run.
pub fn new_run_id() -> RunId {
    format!("run-{}", uuid::Uuid::new_v4())
}
