use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_COUNT: usize = 1000;
pub const DEFAULT_OUTPUT_DIR: &str = "./data";

/// Run-level knobs. Band parameters and label weights are fixed constants
/// in profile.rs / risk.rs and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub profile_count: usize,
    /// None: the caller picks a seed and records it.
    pub seed: Option<u64>,
    pub output_dir: String,
    /// When set, raw profiles are also written to this SQLite ledger.
    pub db_path: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            profile_count: DEFAULT_PROFILE_COUNT,
            seed: None,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            db_path: None,
        }
    }
}

impl DatasetConfig {
    /// Load from a JSON file; missing fields fall back to defaults.
    /// In tests, use DatasetConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DatasetConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn default_test() -> Self {
        Self {
            profile_count: 50,
            seed: Some(42),
            output_dir: "./target/test-data".to_string(),
            db_path: None,
        }
    }
}
