//! variables.rs: Engine parameters with safe defaults and domain checks.
//!
//! Every field is defaulted, so an empty `{}` parameter file (or none at all)
//! reproduces the reference thresholds.

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.25;
pub const DEFAULT_STRENGTH_THRESHOLD: f64 = 0.55;
pub const DEFAULT_WEAKNESS_THRESHOLD: f64 = 0.45;
pub const DEFAULT_INSIGHT_CAP: usize = 5;
pub const DEFAULT_SHARE_TOLERANCE: f64 = 0.02;
pub const DEFAULT_MAX_WORKERS: usize = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Params {
    /// Jaccard similarity below this is "unclassified".
    pub similarity_threshold: f64,
    /// win_rate ≥ this is a strength (inclusive).
    pub strength_threshold: f64,
    /// win_rate ≤ this is a weakness (inclusive).
    pub weakness_threshold: f64,
    /// Max entries kept in each of strengths / weaknesses.
    pub insight_cap: usize,
    /// Allowed overshoot of Σ meta_share above 1.0.
    pub share_tolerance: f64,
    /// Upper bound on estimator worker threads.
    pub max_workers: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            strength_threshold: DEFAULT_STRENGTH_THRESHOLD,
            weakness_threshold: DEFAULT_WEAKNESS_THRESHOLD,
            insight_cap: DEFAULT_INSIGHT_CAP,
            share_tolerance: DEFAULT_SHARE_TOLERANCE,
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

#[inline]
fn is_unit(x: f64) -> bool {
    x.is_finite() && (0.0..=1.0).contains(&x)
}

/// Reject parameter sets that would make the engine's outputs meaningless.
pub fn validate_domains(p: &Params) -> Result<(), CoreError> {
    if !is_unit(p.similarity_threshold) {
        return Err(CoreError::DomainOutOfRange("similarity_threshold"));
    }
    if !is_unit(p.strength_threshold) {
        return Err(CoreError::DomainOutOfRange("strength_threshold"));
    }
    if !is_unit(p.weakness_threshold) {
        return Err(CoreError::DomainOutOfRange("weakness_threshold"));
    }
    if p.weakness_threshold > p.strength_threshold {
        return Err(CoreError::DomainOutOfRange("weakness_threshold > strength_threshold"));
    }
    if p.insight_cap == 0 {
        return Err(CoreError::DomainOutOfRange("insight_cap"));
    }
    if !is_unit(p.share_tolerance) {
        return Err(CoreError::DomainOutOfRange("share_tolerance"));
    }
    if p.max_workers == 0 {
        return Err(CoreError::DomainOutOfRange("max_workers"));
    }
    Ok(())
}
