//! Synthetic behavioral profiles and the feature pipeline that turns them
//! into a labelled training set for the on-device poverty-risk model.

pub mod config;
pub mod error;
pub mod features;
pub mod normalizer;
pub mod pipeline;
pub mod profile;
pub mod risk;
pub mod rng;
pub mod store;
pub mod types;
pub mod window;
pub mod writer;
