// crates/mm_algo/src/insights.rs
//
// Strengths / weaknesses by inclusive threshold, ranked by
// win_rate × meta_share, plus one suggestion per actionable weakness.

use core::cmp::Ordering;

use mm_core::cards::EnergyType;
use mm_core::determinism::{cmp_f64_asc, cmp_f64_desc};
use mm_core::entities::{InsightEntry, Rationale};
use mm_core::variables::{
    Params, DEFAULT_INSIGHT_CAP, DEFAULT_STRENGTH_THRESHOLD, DEFAULT_WEAKNESS_THRESHOLD,
};

use crate::notes::NoteTemplates;
use crate::Scored;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
    /// win_rate ≥ strength is a strength.
    pub strength: f64,
    /// win_rate ≤ weakness is a weakness.
    pub weakness: f64,
    /// Max entries per list.
    pub cap: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strength: DEFAULT_STRENGTH_THRESHOLD,
            weakness: DEFAULT_WEAKNESS_THRESHOLD,
            cap: DEFAULT_INSIGHT_CAP,
        }
    }
}

impl From<&Params> for Thresholds {
    fn from(p: &Params) -> Self {
        Self { strength: p.strength_threshold, weakness: p.weakness_threshold, cap: p.insight_cap }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Insights {
    pub strengths: Vec<InsightEntry>,
    pub weaknesses: Vec<InsightEntry>,
    pub suggestions: Vec<String>,
}

pub fn extract(scored: &[Scored<'_>], thresholds: &Thresholds, notes: &dyn NoteTemplates) -> Insights {
    let rows: Vec<(InsightEntry, Option<EnergyType>)> = scored
        .iter()
        .map(|(deck, est)| {
            let entry = InsightEntry {
                opponent: deck.archetype.clone(),
                win_rate: est.win_rate,
                meta_share: deck.meta_share,
                weighted: est.win_rate * deck.meta_share,
                rationale: est.rationale,
            };
            (entry, est.energy)
        })
        .collect();

    let mut strengths: Vec<InsightEntry> = rows
        .iter()
        .filter(|(e, _)| e.win_rate >= thresholds.strength)
        .map(|(e, _)| e.clone())
        .collect();
    strengths.sort_by(|a, b| cmp_f64_desc(a.weighted, b.weighted).then_with(|| by_name(a, b)));
    strengths.truncate(thresholds.cap);

    let mut weak_rows: Vec<&(InsightEntry, Option<EnergyType>)> =
        rows.iter().filter(|(e, _)| e.win_rate <= thresholds.weakness).collect();
    weak_rows.sort_by(|a, b| cmp_f64_asc(a.0.weighted, b.0.weighted).then_with(|| by_name(&a.0, &b.0)));
    weak_rows.truncate(thresholds.cap);

    let suggestions = weak_rows
        .iter()
        .filter(|(e, _)| e.rationale != Rationale::Baseline)
        .map(|(e, energy)| {
            let energy = if e.rationale == Rationale::Heuristic { *energy } else { None };
            notes.suggestion(e, energy)
        })
        .collect();

    Insights {
        strengths,
        weaknesses: weak_rows.into_iter().map(|(e, _)| e.clone()).collect(),
        suggestions,
    }
}

fn by_name(a: &InsightEntry, b: &InsightEntry) -> Ordering {
    a.opponent.cmp(&b.opponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::PlainNotes;
    use mm_core::entities::{MatchupEstimate, MetaDeck};

    fn deck(name: &str, share: f64) -> MetaDeck {
        MetaDeck {
            archetype: name.parse().unwrap(),
            rank: 1,
            meta_share: share,
            play_rate: None,
            win_rate: None,
            matchups: Default::default(),
            core_cards: Default::default(),
        }
    }

    fn est(d: &MetaDeck, wr: f64, rationale: Rationale, energy: Option<EnergyType>) -> MatchupEstimate {
        MatchupEstimate { opponent: d.archetype.clone(), win_rate: wr, confidence: 1.0, rationale, energy }
    }

    #[test]
    fn boundaries_are_inclusive() {
        let a = deck("A", 0.2);
        let b = deck("B", 0.2);
        let c = deck("C", 0.2);
        let scored = vec![
            (&a, est(&a, 0.55, Rationale::Observed, None)),
            (&b, est(&b, 0.45, Rationale::Observed, None)),
            (&c, est(&c, 0.50, Rationale::Observed, None)),
        ];
        let out = extract(&scored, &Thresholds::default(), &PlainNotes);
        assert_eq!(out.strengths.len(), 1);
        assert_eq!(out.strengths[0].opponent.as_str(), "A");
        assert_eq!(out.weaknesses.len(), 1);
        assert_eq!(out.weaknesses[0].opponent.as_str(), "B");
        assert_eq!(out.suggestions.len(), 1);
    }

    #[test]
    fn ordering_by_weighted_key_and_cap() {
        let decks: Vec<MetaDeck> = (0..7).map(|i| deck(&format!("D{i}"), 0.05 + 0.01 * i as f64)).collect();
        let scored: Vec<_> = decks.iter().map(|d| (d, est(d, 0.6, Rationale::Observed, None))).collect();
        let out = extract(&scored, &Thresholds::default(), &PlainNotes);
        let names: Vec<&str> = out.strengths.iter().map(|e| e.opponent.as_str()).collect();
        assert_eq!(names, ["D6", "D5", "D4", "D3", "D2"]);

        let scored: Vec<_> = decks.iter().map(|d| (d, est(d, 0.4, Rationale::Observed, None))).collect();
        let out = extract(&scored, &Thresholds::default(), &PlainNotes);
        let names: Vec<&str> = out.weaknesses.iter().map(|e| e.opponent.as_str()).collect();
        assert_eq!(names, ["D0", "D1", "D2", "D3", "D4"]);
        assert_eq!(out.suggestions.len(), 5);
    }

    #[test]
    fn equal_weights_break_by_name() {
        let b = deck("B", 0.2);
        let a = deck("A", 0.2);
        let scored = vec![
            (&b, est(&b, 0.7, Rationale::Observed, None)),
            (&a, est(&a, 0.7, Rationale::Observed, None)),
        ];
        let out = extract(&scored, &Thresholds::default(), &PlainNotes);
        assert_eq!(out.strengths[0].opponent.as_str(), "A");
    }

    #[test]
    fn baseline_weaknesses_get_no_suggestion() {
        let a = deck("A", 0.3);
        let b = deck("B", 0.3);
        let scored = vec![
            (&a, est(&a, 0.5, Rationale::Baseline, None)),
            (&b, est(&b, 0.35, Rationale::Heuristic, Some(EnergyType::Water))),
        ];
        let th = Thresholds { strength: 0.9, weakness: 0.5, cap: 5 };
        let out = extract(&scored, &th, &PlainNotes);
        assert_eq!(out.weaknesses.len(), 2);
        assert_eq!(out.suggestions.len(), 1);
        assert!(out.suggestions[0].contains("Water"));
        assert!(out.suggestions[0].contains("B"));
    }
}
