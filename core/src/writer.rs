//! Dataset artifacts on disk.
//!
//! Three files in the output directory, consumed by position downstream:
//!   training_features.json  N x 21 array, row-major
//!   training_labels.json    N labels
//!   dataset_metadata.json   DatasetMetadata
//!
//! All three are staged as `.tmp` files and only renamed into place once
//! every write has succeeded (and, for the CLI, once the ledger has
//! recorded the run). Metadata is renamed last.

use crate::{
    error::DatasetResult,
    features::FEATURE_NAMES,
    normalizer::Dataset,
    types::{RunId, FEATURE_COUNT},
};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const FEATURES_FILE: &str = "training_features.json";
pub const LABELS_FILE: &str = "training_labels.json";
pub const METADATA_FILE: &str = "dataset_metadata.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub run_id: RunId,
    pub seed: u64,
    pub sample_count: usize,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub label_min: f64,
    pub label_max: f64,
    pub label_mean: f64,
    pub generated_at: DateTime<Utc>,
}

impl DatasetMetadata {
    pub fn describe(dataset: &Dataset, run_id: &str, seed: u64, generated_at: DateTime<Utc>) -> Self {
        let (label_min, label_max) = dataset.label_range();
        Self {
            run_id: run_id.to_string(),
            seed,
            sample_count: dataset.sample_count(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            label_min,
            label_max,
            label_mean: dataset.label_mean(),
            generated_at,
        }
    }
}

/// Paths of the committed artifacts.
#[derive(Debug, Clone)]
pub struct WrittenArtifacts {
    pub features: PathBuf,
    pub labels: PathBuf,
    pub metadata: PathBuf,
}

/// Artifacts written to `.tmp` files, not yet visible under their final names.
///
/// `commit` renames features, then labels, then metadata. The metadata file
/// is the commit marker: a dataset directory is complete only when its
/// metadata describes the features and labels beside it.
#[derive(Debug)]
pub struct StagedArtifacts {
    temp: [PathBuf; 3],
    artifacts: WrittenArtifacts,
    sample_count: usize,
    output_dir: PathBuf,
}

impl StagedArtifacts {
    pub fn commit(self) -> DatasetResult<WrittenArtifacts> {
        let dests = [
            &self.artifacts.features,
            &self.artifacts.labels,
            &self.artifacts.metadata,
        ];
        for (tmp, dest) in self.temp.iter().zip(dests) {
            if let Err(e) = fs::rename(tmp, dest) {
                log::warn!("writer: commit failed at {}: {e}", dest.display());
                self.discard();
                return Err(e.into());
            }
            log::debug!("writer: committed {}", dest.display());
        }

        log::info!(
            "writer: {} samples x {FEATURE_COUNT} features -> {}",
            self.sample_count,
            self.output_dir.display()
        );
        Ok(self.artifacts)
    }

    /// Remove whatever staging files still exist.
    pub fn discard(&self) {
        for path in &self.temp {
            if path.exists() {
                let _ = fs::remove_file(path);
            }
        }
    }
}

pub struct DatasetWriter {
    output_dir: PathBuf,
}

impl DatasetWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write and commit all artifacts. Values are serialized as-is.
    pub fn write(&self, dataset: &Dataset, metadata: &DatasetMetadata) -> DatasetResult<WrittenArtifacts> {
        self.stage(dataset, metadata)?.commit()
    }

    /// Write every artifact to its `.tmp` sibling without touching the
    /// committed files. Nothing is visible until `commit`.
    pub fn stage(&self, dataset: &Dataset, metadata: &DatasetMetadata) -> DatasetResult<StagedArtifacts> {
        fs::create_dir_all(&self.output_dir)?;

        let artifacts = WrittenArtifacts {
            features: self.output_dir.join(FEATURES_FILE),
            labels: self.output_dir.join(LABELS_FILE),
            metadata: self.output_dir.join(METADATA_FILE),
        };
        let staged = StagedArtifacts {
            temp: [
                stage_path(&artifacts.features),
                stage_path(&artifacts.labels),
                stage_path(&artifacts.metadata),
            ],
            artifacts,
            sample_count: metadata.sample_count,
            output_dir: self.output_dir.clone(),
        };

        let contents = [
            serde_json::to_vec(&dataset.to_rows())?,
            serde_json::to_vec(dataset.labels())?,
            serde_json::to_vec_pretty(metadata)?,
        ];
        for (path, bytes) in staged.temp.iter().zip(&contents) {
            if let Err(e) = fs::write(path, bytes) {
                staged.discard();
                return Err(e.into());
            }
        }
        Ok(staged)
    }

    pub fn read_metadata(&self) -> DatasetResult<DatasetMetadata> {
        read_json(&self.output_dir.join(METADATA_FILE))
    }

    pub fn read_features(&self) -> DatasetResult<Vec<Vec<f64>>> {
        read_json(&self.output_dir.join(FEATURES_FILE))
    }

    pub fn read_labels(&self) -> DatasetResult<Vec<f64>> {
        read_json(&self.output_dir.join(LABELS_FILE))
    }
}

fn stage_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> DatasetResult<T> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&content)?)
}
