// crates/mm_algo/src/estimator.rs
//
// Per-opponent win-rate estimation as an ordered chain of strategies:
//   observed → reciprocal observed → energy heuristic → baseline.
// The first strategy that yields an estimate wins.
//
// Matchup tables are read in their owner's perspective: `deck.matchups[x]` is
// `deck`'s win rate against `x`. So the candidate's own table is read directly
// and the opponent's table is complemented.

use std::collections::BTreeMap;
use std::fmt;

use mm_core::cards::{CardCatalog, CardEntry, EnergyType};
use mm_core::entities::{MatchupEstimate, MatchupTable, MetaDeck, Rationale};
use mm_core::ids::{ArchetypeName, CardName};

pub const BASE_WIN_RATE: f64 = 0.50;
pub const HEURISTIC_STEP: f64 = 0.05;
pub const HEURISTIC_MIN: f64 = 0.30;
pub const HEURISTIC_MAX: f64 = 0.70;

pub const CONFIDENCE_OBSERVED: f64 = 1.0;
pub const CONFIDENCE_HEURISTIC: f64 = 0.5;
pub const CONFIDENCE_BASELINE: f64 = 0.1;

/// Everything one estimate may look at. Borrowed from the snapshot and the
/// candidate; nothing here is mutated.
#[derive(Clone, Copy, Debug)]
pub struct EstimateInput<'a> {
    /// Resolved archetype of the candidate; `None` when unclassified.
    pub self_label: Option<&'a ArchetypeName>,
    /// The resolved archetype's own matchup table, when it has one.
    pub self_table: Option<&'a MatchupTable>,
    pub self_cards: &'a BTreeMap<CardName, CardEntry>,
    pub opponent: &'a MetaDeck,
    /// Card records used to type the opponent's core cards.
    pub catalog: &'a CardCatalog,
}

/// A strategy failed on malformed data for this one opponent.
#[derive(Clone, Debug, PartialEq)]
pub enum EstimateError {
    /// An observed table value that is not a probability.
    InvalidObserved { owner: ArchetypeName, opponent: ArchetypeName, value: f64 },
}

impl fmt::Display for EstimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateError::InvalidObserved { owner, opponent, value } => write!(
                f,
                "matchup {owner} vs {opponent} has invalid observed win rate {value}"
            ),
        }
    }
}

impl std::error::Error for EstimateError {}

pub type Strategy = fn(&EstimateInput<'_>) -> Result<Option<MatchupEstimate>, EstimateError>;

/// Resolution order. Each entry is independently callable.
pub const STRATEGIES: [(&str, Strategy); 4] = [
    ("observed", observed as Strategy),
    ("reciprocal", reciprocal as Strategy),
    ("heuristic", heuristic as Strategy),
    ("baseline", baseline_strategy as Strategy),
];

/// Run the chain. Errors are per-opponent; callers decide how to degrade.
///
/// A malformed table value does not hide the other table: after an error
/// the chain keeps looking for observed data, and only when none turns up
/// is the first error returned.
pub fn estimate(input: &EstimateInput<'_>) -> Result<MatchupEstimate, EstimateError> {
    let mut first_err = None;
    for (_, strategy) in STRATEGIES {
        match strategy(input) {
            Ok(Some(est)) => match first_err {
                Some(e) if est.rationale != Rationale::Observed => return Err(e),
                _ => return Ok(est),
            },
            Ok(None) => {}
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(baseline(input.opponent)),
    }
}

/// Even matchup with minimal confidence.
pub fn baseline(opponent: &MetaDeck) -> MatchupEstimate {
    MatchupEstimate {
        opponent: opponent.archetype.clone(),
        win_rate: BASE_WIN_RATE,
        confidence: CONFIDENCE_BASELINE,
        rationale: Rationale::Baseline,
        energy: None,
    }
}

/* ------------------------------ Strategies ------------------------------ */

/// The candidate archetype's own record against the opponent.
pub fn observed(input: &EstimateInput<'_>) -> Result<Option<MatchupEstimate>, EstimateError> {
    let (Some(label), Some(table)) = (input.self_label, input.self_table) else {
        return Ok(None);
    };
    let Some(value) = table.get(&input.opponent.archetype).copied() else {
        return Ok(None);
    };
    let win_rate = checked_rate(value, label, &input.opponent.archetype)?;
    Ok(Some(observed_estimate(input.opponent, win_rate)))
}

/// The opponent's record against the candidate archetype, complemented.
pub fn reciprocal(input: &EstimateInput<'_>) -> Result<Option<MatchupEstimate>, EstimateError> {
    let Some(label) = input.self_label else {
        return Ok(None);
    };
    let Some(value) = input.opponent.matchup_against(label) else {
        return Ok(None);
    };
    let theirs = checked_rate(value, &input.opponent.archetype, label)?;
    Ok(Some(observed_estimate(input.opponent, 1.0 - theirs)))
}

/// Card-level energy interactions against the opponent's dominant type.
/// Every copy whose weakness matches adds one step, every copy whose
/// resistance matches removes one.
pub fn heuristic(input: &EstimateInput<'_>) -> Result<Option<MatchupEstimate>, EstimateError> {
    if input.self_cards.values().all(|e| e.quantity == 0) {
        return Ok(None);
    }
    let Some(dominant) = dominant_energy(input.opponent, input.catalog) else {
        return Ok(None);
    };

    let (mut weak, mut resist) = (0u64, 0u64);
    for entry in input.self_cards.values() {
        let q = u64::from(entry.quantity);
        if entry.record.weakness == Some(dominant) {
            weak += q;
        }
        if entry.record.resistance == Some(dominant) {
            resist += q;
        }
    }

    let raw = BASE_WIN_RATE + HEURISTIC_STEP * (weak as f64 - resist as f64);
    Ok(Some(MatchupEstimate {
        opponent: input.opponent.archetype.clone(),
        win_rate: raw.clamp(HEURISTIC_MIN, HEURISTIC_MAX),
        confidence: CONFIDENCE_HEURISTIC,
        rationale: Rationale::Heuristic,
        energy: Some(dominant),
    }))
}

fn baseline_strategy(input: &EstimateInput<'_>) -> Result<Option<MatchupEstimate>, EstimateError> {
    Ok(Some(baseline(input.opponent)))
}

/* ------------------------------- Helpers -------------------------------- */

/// Most frequent energy type among the archetype's typed core cards.
/// Ties resolve to the earlier `EnergyType` variant.
pub fn dominant_energy(deck: &MetaDeck, catalog: &CardCatalog) -> Option<EnergyType> {
    let mut counts: BTreeMap<EnergyType, u32> = BTreeMap::new();
    for name in &deck.core_cards {
        if let Some(t) = catalog.get(name).and_then(|r| r.energy_type) {
            *counts.entry(t).or_insert(0) += 1;
        }
    }
    let mut best: Option<(EnergyType, u32)> = None;
    for (t, n) in counts {
        match best {
            Some((_, m)) if m >= n => {}
            _ => best = Some((t, n)),
        }
    }
    best.map(|(t, _)| t)
}

fn checked_rate(value: f64, owner: &ArchetypeName, opponent: &ArchetypeName) -> Result<f64, EstimateError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(EstimateError::InvalidObserved {
            owner: owner.clone(),
            opponent: opponent.clone(),
            value,
        })
    }
}

fn observed_estimate(opponent: &MetaDeck, win_rate: f64) -> MatchupEstimate {
    MatchupEstimate {
        opponent: opponent.archetype.clone(),
        win_rate,
        confidence: CONFIDENCE_OBSERVED,
        rationale: Rationale::Observed,
        energy: None,
    }
}
