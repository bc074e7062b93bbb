//! Shared primitive types and fixed dimensions used across the pipeline.

/// A stable, unique identifier for a simulated profile within a run.
pub type ProfileId = String;

/// The canonical run identifier.
pub type RunId = String;

/// Days of behavioral log simulated per profile.
pub const HORIZON_DAYS: usize = 30;

/// Trailing days used for feature extraction.
pub const WINDOW_DAYS: usize = 7;

/// Base statistics computed over the window.
pub const BASE_STAT_COUNT: usize = 7;

/// Length of every feature vector handed to training.
pub const FEATURE_COUNT: usize = 21;
