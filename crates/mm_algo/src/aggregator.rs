// crates/mm_algo/src/aggregator.rs
//
// Fan-in: meta-share-weighted mean of the per-opponent estimates, renormalized
// by the total opponent share, plus the position the score would take in the
// field.

use std::fmt;

use mm_core::entities::{MetaDeck, Rationale};

use crate::Scored;

/// Aggregated score and field position.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    /// In [0,1].
    pub overall_meta_score: f64,
    /// 1-based; `None` when no score beyond the prior is computable.
    pub position: Option<u32>,
    /// Σ opponent meta_share (the renormalization denominator).
    pub share_total: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AggregateError {
    /// No opponent carries any weight.
    NoWeight { opponents: usize },
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateError::NoWeight { opponents: 0 } => f.write_str("no opponent archetypes to compare against"),
            AggregateError::NoWeight { opponents } => {
                write!(f, "all {opponents} opponent archetypes have zero meta share")
            }
        }
    }
}

impl std::error::Error for AggregateError {}

/// `scored` holds the opponents (already excluding the candidate's own
/// archetype) with their estimates. `field` is the full snapshot used for the
/// position. `classified` says whether the candidate resolved to an archetype.
pub fn aggregate(scored: &[Scored<'_>], field: &[MetaDeck], classified: bool) -> Result<Aggregate, AggregateError> {
    let share_total: f64 = scored.iter().map(|(d, _)| d.meta_share).sum();
    if share_total.is_nan() || share_total <= 0.0 {
        return Err(AggregateError::NoWeight { opponents: scored.len() });
    }

    let weighted: f64 = scored.iter().map(|(d, e)| e.win_rate * d.meta_share).sum();
    let overall_meta_score = (weighted / share_total).clamp(0.0, 1.0);

    let all_baseline = scored.iter().all(|(_, e)| e.rationale == Rationale::Baseline);
    let position = if !classified && all_baseline {
        None
    } else {
        Some(position_in_field(overall_meta_score, field))
    };

    Ok(Aggregate { overall_meta_score, position, share_total })
}

/// 1-based rank of `score` among the field's win rates (descending). Existing
/// entries with an equal or better win rate stay ahead; decks without a
/// recorded win rate do not occupy a slot.
pub fn position_in_field(score: f64, field: &[MetaDeck]) -> u32 {
    let ahead = field
        .iter()
        .filter_map(|d| d.win_rate)
        .filter(|wr| *wr >= score)
        .count();
    u32::try_from(ahead).unwrap_or(u32::MAX - 1) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::entities::MatchupEstimate;

    fn deck(name: &str, share: f64, win_rate: Option<f64>) -> MetaDeck {
        MetaDeck {
            archetype: name.parse().unwrap(),
            rank: 1,
            meta_share: share,
            play_rate: None,
            win_rate,
            matchups: Default::default(),
            core_cards: Default::default(),
        }
    }

    fn est(d: &MetaDeck, wr: f64, rationale: Rationale) -> MatchupEstimate {
        MatchupEstimate {
            opponent: d.archetype.clone(),
            win_rate: wr,
            confidence: 1.0,
            rationale,
            energy: None,
        }
    }

    #[test]
    fn renormalizes_by_share_total() {
        let a = deck("A", 0.5, None);
        let b = deck("B", 0.3, None);
        let scored = vec![(&a, est(&a, 0.6, Rationale::Observed)), (&b, est(&b, 0.4, Rationale::Observed))];
        let agg = aggregate(&scored, &[a.clone(), b.clone()], true).unwrap();
        let expected = (0.6 * 0.5 + 0.4 * 0.3) / 0.8;
        assert!((agg.overall_meta_score - expected).abs() < 1e-12);
        assert!((agg.share_total - 0.8).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_is_an_error() {
        let a = deck("A", 0.0, None);
        let scored = vec![(&a, est(&a, 0.6, Rationale::Observed))];
        assert_eq!(
            aggregate(&scored, &[], true),
            Err(AggregateError::NoWeight { opponents: 1 })
        );
        assert_eq!(aggregate(&[], &[], true), Err(AggregateError::NoWeight { opponents: 0 }));
    }

    #[test]
    fn ties_place_candidate_after_incumbents() {
        let field = vec![deck("A", 0.3, Some(0.56)), deck("B", 0.3, Some(0.52)), deck("C", 0.3, None)];
        assert_eq!(position_in_field(0.60, &field), 1);
        assert_eq!(position_in_field(0.56, &field), 2);
        assert_eq!(position_in_field(0.53, &field), 2);
        assert_eq!(position_in_field(0.52, &field), 3);
    }

    #[test]
    fn unclassified_all_baseline_has_no_position() {
        let a = deck("A", 0.5, Some(0.5));
        let scored = vec![(&a, est(&a, 0.5, Rationale::Baseline))];
        let agg = aggregate(&scored, std::slice::from_ref(&a), false).unwrap();
        assert_eq!(agg.position, None);
        assert_eq!(agg.overall_meta_score, 0.5);

        let agg = aggregate(&scored, std::slice::from_ref(&a), true).unwrap();
        assert_eq!(agg.position, Some(2));
    }
}
