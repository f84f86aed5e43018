//! Report model: a presentation-ready view of one `DeckComparisonResult`.
//!
//! All numbers are turned into display strings here, so both renderers show
//! identical text.

use mm_core::entities::{DeckComparisonResult, InsightEntry, MetaSnapshot, Rationale};

use crate::ReportError;

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct ReportModel {
    pub cover: SectionCover,
    pub snapshot: SectionSnapshot,
    pub summary: SectionSummary,
    pub matchups: Vec<MatchupRow>,
    pub strengths: Vec<InsightRow>,
    pub weaknesses: Vec<InsightRow>,
    pub suggestions: Vec<String>,
    pub integrity: SectionIntegrity,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SectionCover {
    pub title: String,
    /// Resolved archetype or "Unclassified".
    pub archetype: String,
    pub similarity_pct: String,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotVar {
    pub key: String,
    pub value: String,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSnapshot {
    pub items: Vec<SnapshotVar>,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSummary {
    pub overall_meta_score_pct: String,
    /// "#3" or "n/a".
    pub position: String,
    pub opponents: u32,
    pub observed: u32,
    pub heuristic: u32,
    pub baseline: u32,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct MatchupRow {
    pub opponent: String,
    pub win_rate_pct: String,
    pub confidence_pct: String,
    pub rationale: String,
    pub notes: String,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct InsightRow {
    pub opponent: String,
    pub win_rate_pct: String,
    pub meta_share_pct: String,
    pub rationale: String,
}

#[cfg_attr(feature = "render_json", derive(serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub struct SectionIntegrity {
    pub comparison_id: String,
    pub snapshot_id: String,
    pub snapshot_sha256: String,
}

/// Build the model. `snapshot`, when given, must be the one the result was
/// computed from; it only adds capture details to the snapshot section.
pub fn build_model(
    result: &DeckComparisonResult,
    snapshot: Option<&MetaSnapshot>,
) -> Result<ReportModel, ReportError> {
    if let Some(s) = snapshot {
        if s.id != result.snapshot_id {
            return Err(ReportError::Inconsistent("snapshot id does not match the result"));
        }
    }

    let archetype = result
        .archetype
        .as_ref()
        .map_or_else(|| "Unclassified".to_string(), |a| a.to_string());

    let mut items = vec![SnapshotVar { key: "Snapshot".into(), value: result.snapshot_id.to_string() }];
    if let Some(s) = snapshot {
        items.push(SnapshotVar { key: "Captured on".into(), value: s.captured_on.to_string() });
        if let Some(src) = &s.source {
            items.push(SnapshotVar { key: "Source".into(), value: src.clone() });
        }
        items.push(SnapshotVar { key: "Players".into(), value: s.total_players.to_string() });
        items.push(SnapshotVar { key: "Archetypes".into(), value: s.decks.len().to_string() });
    }

    let count = |r: Rationale| result.matchups.values().filter(|m| m.rationale == r).count() as u32;

    let matchups = result
        .matchups
        .iter()
        .map(|(opp, m)| MatchupRow {
            opponent: opp.to_string(),
            win_rate_pct: pct_1dp(m.win_rate),
            confidence_pct: pct_1dp(m.confidence),
            rationale: m.rationale.as_str().to_string(),
            notes: m.notes.clone(),
        })
        .collect();

    Ok(ReportModel {
        cover: SectionCover {
            title: format!("Meta matchup report: {archetype}"),
            archetype,
            similarity_pct: pct_1dp(result.similarity),
        },
        snapshot: SectionSnapshot { items },
        summary: SectionSummary {
            overall_meta_score_pct: pct_1dp(result.overall_meta_score),
            position: result.position.map_or_else(|| "n/a".to_string(), |p| format!("#{p}")),
            opponents: result.matchups.len() as u32,
            observed: count(Rationale::Observed),
            heuristic: count(Rationale::Heuristic),
            baseline: count(Rationale::Baseline),
        },
        matchups,
        strengths: result.strengths.iter().map(insight_row).collect(),
        weaknesses: result.weaknesses.iter().map(insight_row).collect(),
        suggestions: result.suggestions.clone(),
        integrity: SectionIntegrity {
            comparison_id: result.id.to_string(),
            snapshot_id: result.snapshot_id.to_string(),
            snapshot_sha256: result.snapshot_sha256.clone(),
        },
    })
}

fn insight_row(e: &InsightEntry) -> InsightRow {
    InsightRow {
        opponent: e.opponent.to_string(),
        win_rate_pct: pct_1dp(e.win_rate),
        meta_share_pct: pct_1dp(e.meta_share),
        rationale: e.rationale.as_str().to_string(),
    }
}

/// Fraction in [0,1] → "55.0%".
pub fn pct_1dp(x: f64) -> String {
    format!("{:.1}%", x * 100.0)
}
