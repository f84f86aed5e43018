//! crates/mm_pipeline/src/insights.rs
//! INSIGHTS stage: strengths, weaknesses, suggestions, and per-opponent notes.

use std::collections::BTreeMap;

use mm_algo::{extract, Insights, NoteTemplates, Scored, Thresholds};
use mm_core::entities::MatchupSummary;
use mm_core::ids::ArchetypeName;
use mm_core::variables::Params;

pub fn extract_insights(scored: &[Scored<'_>], params: &Params, notes: &dyn NoteTemplates) -> Insights {
    extract(scored, &Thresholds::from(params), notes)
}

/// Result map: opponent → {win_rate, confidence, rationale, notes}.
pub fn matchup_map(
    scored: &[Scored<'_>],
    notes: &dyn NoteTemplates,
) -> BTreeMap<ArchetypeName, MatchupSummary> {
    scored
        .iter()
        .map(|(deck, est)| {
            let summary = MatchupSummary {
                win_rate: est.win_rate,
                confidence: est.confidence,
                rationale: est.rationale,
                notes: notes.matchup_note(est),
            };
            (deck.archetype.clone(), summary)
        })
        .collect()
}
