//! Determinism utilities: stable ordering for floats and snapshot entries.
//!
//! This module is **I/O-free**. It provides:
//! - A total order over `f64` (`total_cmp`) for sort keys
//! - The canonical `MetaDeck` order (rank ↑, meta_share ↓, archetype ↑)
//! - In-place canonical sort and order checks

use core::cmp::Ordering;

use crate::entities::MetaDeck;

/* -------------------------------------------------------------------------- */
/*                               Float ordering                               */
/* -------------------------------------------------------------------------- */

/// Ascending total order over floats (NaN sorts last, -0.0 < +0.0).
#[inline]
pub fn cmp_f64_asc(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Descending total order over floats.
#[inline]
pub fn cmp_f64_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

/* -------------------------------------------------------------------------- */
/*                             Canonical deck order                           */
/* -------------------------------------------------------------------------- */

/// Compare decks by `(rank ↑, meta_share ↓, archetype ↑)`.
#[inline]
pub fn cmp_decks_canonical(a: &MetaDeck, b: &MetaDeck) -> Ordering {
    a.rank
        .cmp(&b.rank)
        .then_with(|| cmp_f64_desc(a.meta_share, b.meta_share))
        .then_with(|| a.archetype.cmp(&b.archetype))
}

/// Sort decks **in place** into canonical order.
#[inline]
pub fn sort_decks_canonical(decks: &mut [MetaDeck]) {
    decks.sort_by(cmp_decks_canonical);
}

/// True when `decks` is already in canonical order.
pub fn is_canonical_order(decks: &[MetaDeck]) -> bool {
    decks
        .windows(2)
        .all(|w| cmp_decks_canonical(&w[0], &w[1]) != Ordering::Greater)
}

/* ---------------------------------- Tests --------------------------------- */
