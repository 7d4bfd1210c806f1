//! Adaptive menstrual-cycle prediction with an encrypted on-device vault.
//!
//! The engine modules (`pattern`, `prediction`, `phase`, `insights`) are pure
//! functions over borrowed data. [`Tracker`] owns the user's logs and
//! [`Vault`] persists it.

pub mod commands;
pub mod config;
pub mod crypto;
pub mod dates;
pub mod error;
pub mod insights;
pub mod lifestyle;
pub mod models;
pub mod pattern;
pub mod phase;
pub mod prediction;
pub mod storage;
pub mod tracker;

pub use error::{Error, Result};
pub use lifestyle::LifestyleProfile;
pub use pattern::{analyze_pattern, analyze_pattern_at, CyclePattern, TrendDirection};
pub use prediction::{predict, predict_at, AdaptivePrediction, ConfidenceLevel, PredictionRange};
pub use storage::Vault;
pub use tracker::{Overview, Tracker};
