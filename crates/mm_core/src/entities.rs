//! crates/mm_core/src/entities.rs
//! Domain entities: meta snapshot and archetype profiles (inputs), the
//! candidate deck (per-request input), and the derived estimate / result values.
//!
//! Snapshots are immutable once built: the engine only ever borrows them.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardEntry, EnergyType};
use crate::ids::{ArchetypeName, CardName, ComparisonId, SnapshotId};

/// Opponent archetype → observed win rate of the owning archetype.
/// A missing opponent is an absent key.
pub type MatchupTable = BTreeMap<ArchetypeName, f64>;

/* ---------------------------------- Inputs ---------------------------------- */

/// One archetype's profile within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaDeck {
    pub archetype: ArchetypeName,
    /// 1 = most played.
    pub rank: u32,
    /// Fraction of the field in [0,1].
    pub meta_share: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub play_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub matchups: MatchupTable,
    #[serde(default)]
    pub core_cards: BTreeSet<CardName>,
}

impl MetaDeck {
    /// This archetype's observed win rate against `opponent`, if recorded.
    #[inline]
    pub fn matchup_against(&self, opponent: &ArchetypeName) -> Option<f64> {
        self.matchups.get(opponent).copied()
    }
}

/// Immutable, point-in-time capture of the tracked archetypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaSnapshot {
    pub id: SnapshotId,
    pub captured_on: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub total_players: u64,
    /// Canonical order: rank ↑, meta_share ↓, archetype ↑.
    pub decks: Vec<MetaDeck>,
    /// Records for the core cards, used to infer each archetype's energy profile.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub cards: CardCatalog,
}

impl MetaSnapshot {
    pub fn deck(&self, name: &ArchetypeName) -> Option<&MetaDeck> {
        self.decks.iter().find(|d| &d.archetype == name)
    }

    /// Case-insensitive lookup by raw label.
    pub fn deck_ignore_case(&self, label: &str) -> Option<&MetaDeck> {
        self.decks.iter().find(|d| d.archetype.eq_ignore_case(label))
    }

    pub fn share_sum(&self) -> f64 {
        self.decks.iter().map(|d| d.meta_share).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}

/// The deck under analysis. Owned by the caller, never persisted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDeck {
    /// Card multiset keyed by canonical name.
    pub cards: BTreeMap<CardName, CardEntry>,
    /// Optional pre-assigned archetype label (raw text, matched case-insensitively).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
}

impl CandidateDeck {
    /// Names of cards present with at least one copy.
    pub fn card_names(&self) -> BTreeSet<CardName> {
        self.cards
            .iter()
            .filter(|(_, e)| e.quantity > 0)
            .map(|(n, _)| n.clone())
            .collect()
    }

    pub fn total_cards(&self) -> u64 {
        self.cards.values().map(|e| u64::from(e.quantity)).sum()
    }

    /// True when no card has a positive quantity.
    pub fn is_empty(&self) -> bool {
        self.total_cards() == 0
    }
}

/* --------------------------------- Derived ---------------------------------- */

/// Where an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rationale {
    Observed,
    Heuristic,
    Baseline,
}

impl Rationale {
    pub fn as_str(self) -> &'static str {
        match self {
            Rationale::Observed => "observed",
            Rationale::Heuristic => "heuristic",
            Rationale::Baseline => "baseline",
        }
    }
}

/// Predicted result of the candidate against one opponent archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupEstimate {
    pub opponent: ArchetypeName,
    /// In [0,1].
    pub win_rate: f64,
    /// In [0,1]; 1.0 = observed data.
    pub confidence: f64,
    pub rationale: Rationale,
    /// Opponent's dominant energy type when it drove a heuristic estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<EnergyType>,
}

/// Per-opponent line of the result map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSummary {
    pub win_rate: f64,
    pub confidence: f64,
    pub rationale: Rationale,
    pub notes: String,
}

/// A strength or weakness entry, ranked by `weighted = win_rate × meta_share`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightEntry {
    pub opponent: ArchetypeName,
    pub win_rate: f64,
    pub meta_share: f64,
    pub weighted: f64,
    pub rationale: Rationale,
}

/// Engine output. Built whole, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckComparisonResult {
    pub id: ComparisonId,
    pub snapshot_id: SnapshotId,
    pub snapshot_sha256: String,
    /// Resolved archetype; `None` = unclassified.
    pub archetype: Option<ArchetypeName>,
    pub similarity: f64,
    pub position: Option<u32>,
    pub overall_meta_score: f64,
    pub matchups: BTreeMap<ArchetypeName, MatchupSummary>,
    pub strengths: Vec<InsightEntry>,
    pub weaknesses: Vec<InsightEntry>,
    pub suggestions: Vec<String>,
}
