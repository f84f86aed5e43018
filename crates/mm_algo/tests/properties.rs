//! Property tests over the pure algorithms: similarity bounds, aggregate
//! range, threshold membership, heuristic clamp.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use mm_algo::estimator::{HEURISTIC_MAX, HEURISTIC_MIN};
use mm_algo::{aggregate, estimate, extract, jaccard, EstimateInput, PlainNotes, Thresholds};
use mm_core::cards::{CardCatalog, CardEntry, CardRecord, EnergyType};
use mm_core::entities::{MatchupEstimate, MetaDeck, Rationale};
use mm_core::ids::CardName;

fn card(i: u8) -> CardName {
    format!("Card {i}").parse().unwrap()
}

fn deck(i: usize, share: f64) -> MetaDeck {
    MetaDeck {
        archetype: format!("Deck {i:02}").parse().unwrap(),
        rank: i as u32 + 1,
        meta_share: share,
        play_rate: None,
        win_rate: None,
        matchups: Default::default(),
        core_cards: Default::default(),
    }
}

fn observed(d: &MetaDeck, wr: f64) -> MatchupEstimate {
    MatchupEstimate {
        opponent: d.archetype.clone(),
        win_rate: wr,
        confidence: 1.0,
        rationale: Rationale::Observed,
        energy: None,
    }
}

fn energy() -> impl Strategy<Value = Option<EnergyType>> {
    prop::option::of(prop::sample::select(EnergyType::ALL.to_vec()))
}

proptest! {
    #[test]
    fn jaccard_is_bounded_and_symmetric(
        a in prop::collection::btree_set(0u8..20, 0..12),
        b in prop::collection::btree_set(0u8..20, 0..12),
    ) {
        let a: BTreeSet<CardName> = a.into_iter().map(card).collect();
        let b: BTreeSet<CardName> = b.into_iter().map(card).collect();
        let s = jaccard(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
        prop_assert_eq!(s, jaccard(&b, &a));
    }

    #[test]
    fn aggregate_stays_within_estimate_range(
        rows in prop::collection::vec((0.001f64..1.0, 0.0f64..=1.0), 1..20),
    ) {
        let decks: Vec<MetaDeck> = rows.iter().enumerate().map(|(i, (s, _))| deck(i, *s)).collect();
        let scored: Vec<_> = decks.iter().zip(&rows).map(|(d, (_, wr))| (d, observed(d, *wr))).collect();
        let agg = aggregate(&scored, &decks, true).unwrap();

        let lo = rows.iter().map(|r| r.1).fold(f64::INFINITY, f64::min);
        let hi = rows.iter().map(|r| r.1).fold(f64::NEG_INFINITY, f64::max);
        prop_assert!((0.0..=1.0).contains(&agg.overall_meta_score));
        prop_assert!(agg.overall_meta_score >= lo - 1e-9 && agg.overall_meta_score <= hi + 1e-9);
        prop_assert_eq!(agg.position, Some(1));
    }

    #[test]
    fn insights_respect_thresholds_and_cap(
        rows in prop::collection::vec((0.0f64..0.3, 0.0f64..=1.0), 0..25),
    ) {
        let decks: Vec<MetaDeck> = rows.iter().enumerate().map(|(i, (s, _))| deck(i, *s)).collect();
        let scored: Vec<_> = decks.iter().zip(&rows).map(|(d, (_, wr))| (d, observed(d, *wr))).collect();
        let th = Thresholds::default();
        let out = extract(&scored, &th, &PlainNotes);

        prop_assert!(out.strengths.len() <= th.cap && out.weaknesses.len() <= th.cap);
        prop_assert!(out.strengths.iter().all(|e| e.win_rate >= th.strength));
        prop_assert!(out.weaknesses.iter().all(|e| e.win_rate <= th.weakness));
        prop_assert!(out.strengths.windows(2).all(|w| w[0].weighted >= w[1].weighted));
        prop_assert!(out.weaknesses.windows(2).all(|w| w[0].weighted <= w[1].weighted));
        prop_assert_eq!(out.suggestions.len(), out.weaknesses.len());
    }

    #[test]
    fn heuristic_is_clamped(
        lines in prop::collection::vec((1u32..5, energy(), energy()), 1..15),
        core in prop::collection::vec(prop::sample::select(EnergyType::ALL.to_vec()), 1..6),
    ) {
        let mut opponent = deck(0, 0.2);
        let mut catalog = CardCatalog::new();
        for (i, t) in core.iter().enumerate() {
            let name = card(100 + i as u8);
            catalog.insert(name.clone(), CardRecord { name: name.clone(), energy_type: Some(*t), weakness: None, resistance: None });
            opponent.core_cards.insert(name);
        }

        let cards: BTreeMap<CardName, CardEntry> = lines
            .iter()
            .enumerate()
            .map(|(i, (q, w, r))| {
                let name = card(i as u8);
                let record = CardRecord { name: name.clone(), energy_type: None, weakness: *w, resistance: *r };
                (name, CardEntry { record, quantity: *q })
            })
            .collect();

        let input = EstimateInput { self_label: None, self_table: None, self_cards: &cards, opponent: &opponent, catalog: &catalog };
        let est = estimate(&input).unwrap();
        prop_assert_eq!(est.rationale, Rationale::Heuristic);
        prop_assert!(est.win_rate >= HEURISTIC_MIN && est.win_rate <= HEURISTIC_MAX);
    }
}
