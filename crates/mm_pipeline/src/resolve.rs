//! crates/mm_pipeline/src/resolve.rs
//! RESOLVE stage: classify the candidate, then pick the opponent set.

use log::debug;

use mm_algo::{resolve, Resolution};
use mm_core::entities::{CandidateDeck, MetaDeck, MetaSnapshot};
use mm_core::variables::Params;

use crate::PipelineError;

/// Classify the candidate. An empty card multiset cannot be resolved.
pub fn resolve_candidate(
    candidate: &CandidateDeck,
    snapshot: &MetaSnapshot,
    params: &Params,
) -> Result<Resolution, PipelineError> {
    if candidate.is_empty() {
        return Err(PipelineError::UnresolvableCandidate);
    }
    let r = resolve(candidate, snapshot, params.similarity_threshold);
    match &r.label {
        Some(label) => debug!("resolved candidate as '{label}' (similarity {:.3})", r.similarity),
        None => debug!("candidate unclassified (best similarity {:.3})", r.similarity),
    }
    Ok(r)
}

/// Every snapshot archetype except the candidate's own, in snapshot order.
pub fn opponents<'a>(snapshot: &'a MetaSnapshot, resolution: &Resolution) -> Vec<&'a MetaDeck> {
    snapshot
        .decks
        .iter()
        .filter(|d| resolution.label.as_ref() != Some(&d.archetype))
        .collect()
}
