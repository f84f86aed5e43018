//! crates/mm_pipeline/src/validate.rs
//! Defensive snapshot validation before any computation.
//! Deterministic output: issues are sorted by (code, location, message).
//!
//! Errors abort the comparison with `InvalidSnapshot`; warnings are logged and
//! the affected data degrades on its own (e.g. a bad matchup value falls to
//! the baseline estimate).

use std::collections::BTreeSet;
use std::fmt;

use mm_core::determinism::is_canonical_order;
use mm_core::entities::MetaSnapshot;
use mm_core::ids::ArchetypeName;
use mm_core::variables::Params;

use crate::PipelineError;

/// Issue severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

/// Where the issue occurred.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntityRef {
    Root,
    Deck(ArchetypeName),
    Matchup(ArchetypeName, ArchetypeName),
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::Root => f.write_str("snapshot"),
            EntityRef::Deck(a) => write!(f, "deck '{a}'"),
            EntityRef::Matchup(a, b) => write!(f, "matchup '{a}' vs '{b}'"),
        }
    }
}

/// One validation finding.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub where_: EntityRef,
}

/// pass = no Error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationReport {
    pub pass: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// First error (in report order) as `InvalidSnapshot`.
    pub fn into_result(self) -> Result<(), PipelineError> {
        match self.issues.into_iter().find(|i| i.severity == Severity::Error) {
            None => Ok(()),
            Some(i) => Err(PipelineError::InvalidSnapshot {
                code: i.code.to_string(),
                message: format!("{}: {}", i.where_, i.message),
            }),
        }
    }
}

/// Top-level entry point.
pub fn validate_snapshot(snap: &MetaSnapshot, params: &Params) -> ValidationReport {
    let mut issues: Vec<ValidationIssue> = Vec::new();

    issues.extend(check_unique_archetypes(snap));
    issues.extend(check_deck_fields(snap));
    issues.extend(check_matchup_tables(snap));
    issues.extend(check_share_sum(snap, params.share_tolerance));

    if !is_canonical_order(&snap.decks) {
        issues.push(warning(
            "Snapshot.OutOfOrder",
            "decks are not in (rank, meta_share desc, archetype) order".into(),
            EntityRef::Root,
        ));
    }

    sort_issues_stably(&mut issues);

    ValidationReport {
        pass: !issues.iter().any(|i| i.severity == Severity::Error),
        issues,
    }
}

// ------------------------------------------------------------------------------------------------
// Checks
// ------------------------------------------------------------------------------------------------

fn check_unique_archetypes(snap: &MetaSnapshot) -> Vec<ValidationIssue> {
    let mut seen = BTreeSet::new();
    let mut issues = Vec::new();
    for d in &snap.decks {
        if !seen.insert(&d.archetype) {
            issues.push(error(
                "Snapshot.DuplicateArchetype",
                "archetype listed more than once".into(),
                EntityRef::Deck(d.archetype.clone()),
            ));
        }
    }
    issues
}

fn check_deck_fields(snap: &MetaSnapshot) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for d in &snap.decks {
        let at = || EntityRef::Deck(d.archetype.clone());
        if !is_probability(d.meta_share) {
            issues.push(error(
                "MetaDeck.ShareOutOfRange",
                format!("meta_share {} outside [0,1]", d.meta_share),
                at(),
            ));
        }
        if d.rank == 0 {
            issues.push(error("MetaDeck.RankZero", "rank must be ≥ 1".into(), at()));
        }
        for (field, value) in [("play_rate", d.play_rate), ("win_rate", d.win_rate)] {
            if let Some(v) = value.filter(|v| !is_probability(*v)) {
                issues.push(warning(
                    "MetaDeck.RateOutOfRange",
                    format!("{field} {v} outside [0,1]"),
                    at(),
                ));
            }
        }
    }
    issues
}

fn check_matchup_tables(snap: &MetaSnapshot) -> Vec<ValidationIssue> {
    let known: BTreeSet<&ArchetypeName> = snap.decks.iter().map(|d| &d.archetype).collect();
    let mut issues = Vec::new();
    for d in &snap.decks {
        for (opp, rate) in &d.matchups {
            let at = || EntityRef::Matchup(d.archetype.clone(), opp.clone());
            if opp == &d.archetype {
                issues.push(error(
                    "MetaDeck.SelfMatchup",
                    "matchup table lists the archetype itself".into(),
                    at(),
                ));
                continue;
            }
            if !known.contains(opp) {
                issues.push(warning(
                    "MetaDeck.UnknownMatchupKey",
                    "opponent is not an archetype of this snapshot".into(),
                    at(),
                ));
            }
            if !is_probability(*rate) {
                issues.push(warning(
                    "MetaDeck.MatchupOutOfRange",
                    format!("win rate {rate} outside [0,1]; ignored in favour of the other table, else baseline"),
                    at(),
                ));
            }
        }
    }
    issues
}

fn check_share_sum(snap: &MetaSnapshot, tolerance: f64) -> Vec<ValidationIssue> {
    // Only meaningful once every share is itself well-formed.
    if !snap.decks.iter().all(|d| is_probability(d.meta_share)) {
        return Vec::new();
    }
    let sum = snap.share_sum();
    if sum > 1.0 + tolerance {
        vec![error(
            "Snapshot.ShareSumExceeded",
            format!("meta_share sum {sum:.4} exceeds 1 + {tolerance}"),
            EntityRef::Root,
        )]
    } else {
        Vec::new()
    }
}

// ------------------------------------------------------------------------------------------------
// Helpers
// ------------------------------------------------------------------------------------------------

#[inline]
fn is_probability(x: f64) -> bool {
    x.is_finite() && (0.0..=1.0).contains(&x)
}

fn error(code: &'static str, message: String, where_: EntityRef) -> ValidationIssue {
    ValidationIssue { severity: Severity::Error, code, message, where_ }
}

fn warning(code: &'static str, message: String, where_: EntityRef) -> ValidationIssue {
    ValidationIssue { severity: Severity::Warning, code, message, where_ }
}

/// Deterministic sort of issues (by code, then where, then message).
fn sort_issues_stably(issues: &mut [ValidationIssue]) {
    issues.sort_by(|a, b| {
        a.code
            .cmp(b.code)
            .then_with(|| a.where_.cmp(&b.where_))
            .then_with(|| a.message.cmp(&b.message))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::entities::MetaDeck;

    fn deck(name: &str, rank: u32, share: f64, matchups: &[(&str, f64)]) -> MetaDeck {
        MetaDeck {
            archetype: name.parse().unwrap(),
            rank,
            meta_share: share,
            play_rate: None,
            win_rate: None,
            matchups: matchups.iter().map(|(k, v)| (k.parse().unwrap(), *v)).collect(),
            core_cards: Default::default(),
        }
    }

    fn snap(decks: Vec<MetaDeck>) -> MetaSnapshot {
        MetaSnapshot {
            id: "s".parse().unwrap(),
            captured_on: chrono::NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            source: None,
            total_players: 100,
            decks,
            cards: Default::default(),
        }
    }

    fn codes(r: &ValidationReport) -> Vec<&'static str> {
        r.issues.iter().map(|i| i.code).collect()
    }

    #[test]
    fn clean_snapshot_passes() {
        let r = validate_snapshot(
            &snap(vec![deck("A", 1, 0.6, &[("B", 0.6)]), deck("B", 2, 0.4, &[("A", 0.4)])]),
            &Params::default(),
        );
        assert!(r.pass);
        assert!(r.issues.is_empty());
    }

    #[test]
    fn structural_errors_are_reported() {
        let r = validate_snapshot(
            &snap(vec![
                deck("B", 0, 1.5, &[]),
                deck("A", 1, 0.3, &[("A", 0.5)]),
                deck("A", 1, 0.2, &[]),
            ]),
            &Params::default(),
        );
        assert!(!r.pass);
        assert_eq!(
            codes(&r),
            [
                "MetaDeck.RankZero",
                "MetaDeck.SelfMatchup",
                "MetaDeck.ShareOutOfRange",
                "Snapshot.DuplicateArchetype",
            ]
        );
        match r.into_result() {
            Err(PipelineError::InvalidSnapshot { code, .. }) => assert_eq!(code, "MetaDeck.RankZero"),
            other => panic!("expected InvalidSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn share_sum_respects_tolerance() {
        let within = snap(vec![deck("A", 1, 0.61, &[]), deck("B", 2, 0.40, &[])]);
        assert!(validate_snapshot(&within, &Params::default()).pass);

        let over = snap(vec![deck("A", 1, 0.7, &[]), deck("B", 2, 0.4, &[])]);
        let r = validate_snapshot(&over, &Params::default());
        assert_eq!(codes(&r), ["Snapshot.ShareSumExceeded"]);
    }

    #[test]
    fn soft_problems_are_warnings() {
        let mut a = deck("A", 2, 0.3, &[("B", 1.2), ("Ghost", 0.5)]);
        a.win_rate = Some(-0.1);
        let r = validate_snapshot(&snap(vec![a, deck("B", 1, 0.3, &[])]), &Params::default());
        assert!(r.pass);
        assert_eq!(
            codes(&r),
            [
                "MetaDeck.MatchupOutOfRange",
                "MetaDeck.RateOutOfRange",
                "MetaDeck.UnknownMatchupKey",
                "Snapshot.OutOfOrder",
            ]
        );
        assert_eq!(r.warnings().count(), 4);
        assert_eq!(r.errors().count(), 0);
    }
}
