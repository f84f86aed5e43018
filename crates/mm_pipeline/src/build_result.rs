//! crates/mm_pipeline/src/build_result.rs
//! Assemble the idless payload → canonical bytes → sha256, form
//! "CMP:<sha256>", and return the finished `DeckComparisonResult`.

use std::collections::BTreeMap;

use serde_json::Value;

use mm_algo::{Aggregate, Insights, Resolution};
use mm_core::entities::{DeckComparisonResult, MatchupSummary, MetaSnapshot};
use mm_core::ids::{ArchetypeName, ComparisonId};
use mm_io::hasher;

use crate::PipelineError;

/// Everything the result is made of, produced by the earlier stages.
pub struct ResultInputs<'a> {
    pub snapshot: &'a MetaSnapshot,
    pub resolution: Resolution,
    pub aggregate: Aggregate,
    pub matchups: BTreeMap<ArchetypeName, MatchupSummary>,
    pub insights: Insights,
}

/// Content ID of a result: sha256 over the canonical bytes without `id`.
/// Every other serialized field takes part, so new fields are covered too.
pub fn content_id(result: &DeckComparisonResult) -> Result<ComparisonId, PipelineError> {
    let mut value =
        serde_json::to_value(result).map_err(|e| PipelineError::Build(format!("result id: {e}")))?;
    if let Value::Object(fields) = &mut value {
        fields.remove("id");
    }
    hasher::cmp_id_from_canonical(&value).map_err(|e| PipelineError::Build(format!("result id: {e}")))
}

pub fn build_result(inp: ResultInputs<'_>) -> Result<DeckComparisonResult, PipelineError> {
    let snapshot_sha256 = hasher::sha256_canonical(inp.snapshot)
        .map_err(|e| PipelineError::Build(format!("snapshot digest: {e}")))?;
    let placeholder = ComparisonId::from_hex(&"0".repeat(64))
        .map_err(|e| PipelineError::Build(e.to_string()))?;

    let mut result = DeckComparisonResult {
        id: placeholder,
        snapshot_id: inp.snapshot.id.clone(),
        snapshot_sha256,
        archetype: inp.resolution.label,
        similarity: inp.resolution.similarity,
        position: inp.aggregate.position,
        overall_meta_score: inp.aggregate.overall_meta_score,
        matchups: inp.matchups,
        strengths: inp.insights.strengths,
        weaknesses: inp.insights.weaknesses,
        suggestions: inp.insights.suggestions,
    };
    result.id = content_id(&result)?;
    Ok(result)
}

/// True when `result.id` matches its content (for artifacts read back from disk).
pub fn verify_id(result: &DeckComparisonResult) -> Result<bool, PipelineError> {
    Ok(content_id(result)? == result.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::entities::{InsightEntry, Rationale};

    fn sample() -> DeckComparisonResult {
        let opp: ArchetypeName = "Charizard ex".parse().unwrap();
        let mut matchups = BTreeMap::new();
        matchups.insert(
            opp.clone(),
            MatchupSummary { win_rate: 0.4, confidence: 1.0, rationale: Rationale::Observed, notes: "40%".into() },
        );
        let mut r = DeckComparisonResult {
            id: ComparisonId::from_hex(&"0".repeat(64)).unwrap(),
            snapshot_id: "cup-2026-10".parse().unwrap(),
            snapshot_sha256: "ab".repeat(32),
            archetype: Some("Lost Box".parse().unwrap()),
            similarity: 0.75,
            position: Some(3),
            overall_meta_score: 0.4,
            matchups,
            strengths: Vec::new(),
            weaknesses: vec![InsightEntry {
                opponent: opp,
                win_rate: 0.4,
                meta_share: 0.5,
                weighted: 0.2,
                rationale: Rationale::Observed,
            }],
            suggestions: vec!["Unfavored against Charizard ex.".into()],
        };
        r.id = content_id(&r).unwrap();
        r
    }

    #[test]
    fn id_ignores_itself_and_verifies() {
        let r = sample();
        assert!(verify_id(&r).unwrap());
        let mut other = r.clone();
        other.id = ComparisonId::from_hex(&"f".repeat(64)).unwrap();
        assert_eq!(content_id(&other).unwrap(), r.id);
        assert!(!verify_id(&other).unwrap());
    }

    #[test]
    fn every_field_feeds_the_id() {
        let base = sample();
        let edits: [fn(&mut DeckComparisonResult); 10] = [
            |r| r.snapshot_id = "cup-2026-11".parse().unwrap(),
            |r| r.snapshot_sha256 = "cd".repeat(32),
            |r| r.archetype = None,
            |r| r.similarity = 0.5,
            |r| r.position = None,
            |r| r.overall_meta_score = 0.41,
            |r| r.matchups.clear(),
            |r| r.strengths = r.weaknesses.clone(),
            |r| r.weaknesses.clear(),
            |r| r.suggestions.push("More copies of Iono.".into()),
        ];
        for edit in edits {
            let mut r = base.clone();
            edit(&mut r);
            assert_ne!(content_id(&r).unwrap(), base.id);
        }
    }
}
