// crates/mm_algo/src/resolver.rs
//
// Archetype resolution: a pre-assigned label wins when it names a snapshot
// archetype; otherwise the best core-card overlap above the threshold.
//
// Ties on similarity go to the lower rank (the more prevalent archetype), then
// to the lower name, so the outcome never depends on input order.

use core::cmp::Ordering;

use mm_core::determinism::cmp_f64_desc;
use mm_core::entities::{CandidateDeck, MetaDeck, MetaSnapshot};
use mm_core::ids::ArchetypeName;

use crate::similarity::jaccard;

/// Resolver output. `label == None` means "unclassified".
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub label: Option<ArchetypeName>,
    pub similarity: f64,
}

impl Resolution {
    pub fn is_classified(&self) -> bool {
        self.label.is_some()
    }
}

pub fn resolve(candidate: &CandidateDeck, snapshot: &MetaSnapshot, threshold: f64) -> Resolution {
    if let Some(label) = candidate.archetype.as_deref() {
        if let Some(deck) = snapshot.deck_ignore_case(label) {
            return Resolution { label: Some(deck.archetype.clone()), similarity: 1.0 };
        }
    }

    let cards = candidate.card_names();
    let best = snapshot
        .decks
        .iter()
        .map(|d| (d, jaccard(&cards, &d.core_cards)))
        .min_by(|a, b| cmp_candidates(a, b));

    match best {
        Some((deck, sim)) if sim >= threshold => {
            Resolution { label: Some(deck.archetype.clone()), similarity: sim }
        }
        Some((_, sim)) => Resolution { label: None, similarity: sim },
        None => Resolution { label: None, similarity: 0.0 },
    }
}

/// Best first: similarity ↓, rank ↑, archetype ↑.
fn cmp_candidates(a: &(&MetaDeck, f64), b: &(&MetaDeck, f64)) -> Ordering {
    cmp_f64_desc(a.1, b.1)
        .then_with(|| a.0.rank.cmp(&b.0.rank))
        .then_with(|| a.0.archetype.cmp(&b.0.archetype))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::cards::{CardEntry, CardRecord};
    use mm_core::ids::CardName;

    fn deck(name: &str, rank: u32, core: &[&str]) -> MetaDeck {
        MetaDeck {
            archetype: name.parse().unwrap(),
            rank,
            meta_share: 0.1,
            play_rate: None,
            win_rate: None,
            matchups: Default::default(),
            core_cards: core.iter().map(|c| c.parse().unwrap()).collect(),
        }
    }

    fn snapshot(decks: Vec<MetaDeck>) -> MetaSnapshot {
        MetaSnapshot {
            id: "s".parse().unwrap(),
            captured_on: chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            source: None,
            total_players: 0,
            decks,
            cards: Default::default(),
        }
    }

    fn candidate(cards: &[&str], archetype: Option<&str>) -> CandidateDeck {
        let mut deck = CandidateDeck { archetype: archetype.map(str::to_owned), ..Default::default() };
        for c in cards {
            let name: CardName = c.parse().unwrap();
            deck.cards.insert(name.clone(), CardEntry { record: CardRecord::untyped(name), quantity: 1 });
        }
        deck
    }

    #[test]
    fn preassigned_label_matches_case_insensitively() {
        let snap = snapshot(vec![deck("Lost Box", 1, &["Comfey"])]);
        let r = resolve(&candidate(&["Pikachu"], Some("lost box")), &snap, 0.25);
        assert_eq!(r.label.as_ref().map(|l| l.as_str()), Some("Lost Box"));
        assert_eq!(r.similarity, 1.0);
    }

    #[test]
    fn unknown_preassigned_label_falls_back_to_similarity() {
        let snap = snapshot(vec![deck("Lost Box", 1, &["Comfey", "Sableye"])]);
        let r = resolve(&candidate(&["Comfey", "Sableye"], Some("Nonexistent")), &snap, 0.25);
        assert_eq!(r.label.as_ref().map(|l| l.as_str()), Some("Lost Box"));
        assert_eq!(r.similarity, 1.0);
    }

    #[test]
    fn equal_similarity_prefers_lower_rank() {
        let snap = snapshot(vec![
            deck("Second", 2, &["X", "Y"]),
            deck("First", 1, &["X", "Z"]),
        ]);
        let r = resolve(&candidate(&["X"], None), &snap, 0.25);
        assert_eq!(r.label.as_ref().map(|l| l.as_str()), Some("First"));
        assert!((r.similarity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn below_threshold_is_unclassified_but_reports_similarity() {
        let snap = snapshot(vec![deck("A", 1, &["a", "b", "c", "d", "e"])]);
        let r = resolve(&candidate(&["a", "z"], None), &snap, 0.25);
        assert_eq!(r.label, None);
        assert!((r.similarity - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_itself_classifies() {
        let snap = snapshot(vec![deck("A", 1, &["a", "b", "c", "d"])]);
        let r = resolve(&candidate(&["a"], None), &snap, 0.25);
        assert!(r.is_classified());
    }

    #[test]
    fn empty_snapshot_is_unclassified() {
        let r = resolve(&candidate(&["a"], None), &snapshot(vec![]), 0.25);
        assert_eq!(r, Resolution { label: None, similarity: 0.0 });
    }
}
