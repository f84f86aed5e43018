// crates/mm_algo/src/notes.rs
//
// Human-readable copy. Kept behind a trait so wording can change without
// touching estimation or ranking.

use mm_core::cards::EnergyType;
use mm_core::entities::{InsightEntry, MatchupEstimate, Rationale};

pub trait NoteTemplates: Send + Sync {
    /// Short note for one line of the per-opponent matchup map.
    fn matchup_note(&self, estimate: &MatchupEstimate) -> String;

    /// Suggestion for a weakness. `energy` is the opponent's dominant type
    /// when the estimate came from the energy heuristic.
    fn suggestion(&self, weakness: &InsightEntry, energy: Option<EnergyType>) -> String;
}

/// Default plain-English templates.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainNotes;

fn pct(x: f64) -> String {
    format!("{:.1}%", x * 100.0)
}

impl NoteTemplates for PlainNotes {
    fn matchup_note(&self, e: &MatchupEstimate) -> String {
        match (e.rationale, e.energy) {
            (Rationale::Observed, _) => {
                format!("{} observed win rate against {}.", pct(e.win_rate), e.opponent)
            }
            (Rationale::Heuristic, Some(t)) => format!(
                "Estimated {} from card interactions with {}'s {} core.",
                pct(e.win_rate),
                e.opponent,
                t.label()
            ),
            (Rationale::Heuristic, None) => {
                format!("Estimated {} from card interactions with {}.", pct(e.win_rate), e.opponent)
            }
            (Rationale::Baseline, _) => {
                format!("No matchup data against {}; assuming an even matchup.", e.opponent)
            }
        }
    }

    fn suggestion(&self, w: &InsightEntry, energy: Option<EnergyType>) -> String {
        match energy {
            Some(t) => format!(
                "Unfavored against {} ({} expected, {} of the meta): add answers to {} attackers.",
                w.opponent,
                pct(w.win_rate),
                pct(w.meta_share),
                t.label()
            ),
            None => format!(
                "Unfavored against {} ({} win rate, {} of the meta): consider tech cards for this matchup.",
                w.opponent,
                pct(w.win_rate),
                pct(w.meta_share)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(rationale: Rationale, energy: Option<EnergyType>) -> MatchupEstimate {
        MatchupEstimate {
            opponent: "Charizard ex".parse().unwrap(),
            win_rate: 0.4,
            confidence: 0.5,
            rationale,
            energy,
        }
    }

    #[test]
    fn notes_mention_opponent_and_source() {
        let n = PlainNotes;
        assert_eq!(
            n.matchup_note(&estimate(Rationale::Observed, None)),
            "40.0% observed win rate against Charizard ex."
        );
        assert!(n
            .matchup_note(&estimate(Rationale::Heuristic, Some(EnergyType::Fire)))
            .contains("Fire"));
        assert!(n.matchup_note(&estimate(Rationale::Baseline, None)).starts_with("No matchup data"));
    }

    #[test]
    fn heuristic_suggestion_names_energy() {
        let w = InsightEntry {
            opponent: "Charizard ex".parse().unwrap(),
            win_rate: 0.35,
            meta_share: 0.2,
            weighted: 0.07,
            rationale: Rationale::Heuristic,
        };
        let s = PlainNotes.suggestion(&w, Some(EnergyType::Fire));
        assert_eq!(
            s,
            "Unfavored against Charizard ex (35.0% expected, 20.0% of the meta): add answers to Fire attackers."
        );
    }
}
