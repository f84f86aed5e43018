// crates/mm_algo/src/similarity.rs
//
// Card-set overlap used to classify a deck into an archetype.

use std::collections::BTreeSet;

use mm_core::ids::CardName;

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`, in [0,1].
/// Two empty sets have similarity 0.0 (nothing to compare).
pub fn jaccard(a: &BTreeSet<CardName>, b: &BTreeSet<CardName>) -> f64 {
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    if union == 0 {
        return 0.0;
    }
    inter as f64 / union as f64
}
