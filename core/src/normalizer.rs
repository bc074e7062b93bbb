//! Per-row standardization and dataset assembly.
//!
//! Each feature vector is standardized against its OWN mean and standard
//! deviation, not per column across the dataset. This changes the geometry
//! of the feature space relative to column-wise scaling and must not be
//! swapped for it.

use crate::{
    error::{DatasetError, DatasetResult},
    features::FeatureVector,
    window::{mean, std_dev},
};
use serde::Serialize;

/// Added to the row standard deviation before dividing.
pub const STD_EPSILON: f64 = 1e-8;

/// Feature matrix (row-major) paired positionally with labels.
/// Row i and label i always describe the same profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    features: Vec<FeatureVector>,
    labels: Vec<f64>,
}

impl Dataset {
    pub fn features(&self) -> &[FeatureVector] {
        &self.features
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn sample_count(&self) -> usize {
        self.labels.len()
    }

    /// (min, max) of the labels; (0, 0) for an empty dataset.
    pub fn label_range(&self) -> (f64, f64) {
        if self.labels.is_empty() {
            return (0.0, 0.0);
        }
        self.labels
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &y| {
                (lo.min(y), hi.max(y))
            })
    }

    pub fn label_mean(&self) -> f64 {
        mean(&self.labels)
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.features.iter().map(|f| f.as_slice().to_vec()).collect()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DatasetNormalizer;

impl DatasetNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Standardize one vector in place. `row` is only used for reporting.
    ///
    /// A zero-variance vector is not an error: the epsilon keeps the
    /// division finite and every entry becomes 0.
    pub fn standardize(&self, row: usize, vector: &mut FeatureVector) -> DatasetResult<()> {
        let values = vector.values_mut();
        let mu = mean(&values[..]);
        let sigma = std_dev(&values[..]);
        if sigma == 0.0 {
            log::debug!("normalizer: row {row} has zero variance, relying on epsilon");
        }
        let denom = sigma + STD_EPSILON;
        for v in values.iter_mut() {
            *v = (*v - mu) / denom;
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(DatasetError::DegenerateVector { row });
        }
        Ok(())
    }

    /// Standardize every row and pair it with its label, preserving order.
    pub fn assemble(
        &self,
        mut features: Vec<FeatureVector>,
        labels: Vec<f64>,
    ) -> DatasetResult<Dataset> {
        if features.len() != labels.len() {
            return Err(anyhow::anyhow!(
                "feature rows ({}) and labels ({}) differ in length",
                features.len(),
                labels.len()
            )
            .into());
        }
        for (row, vector) in features.iter_mut().enumerate() {
            self.standardize(row, vector)?;
        }
        log::info!("normalizer: standardized {} rows", features.len());
        Ok(Dataset { features, labels })
    }
}
