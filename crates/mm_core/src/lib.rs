//! mm_core: Core types, domains, ordering helpers, and engine parameters.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`mm_io`, `mm_algo`, `mm_pipeline`, `mm_report`, `mm_cli`).
//!
//! - Name tokens: `ArchetypeName`, `CardName`, `SnapshotId`
//! - Output IDs: `CMP:` (comparison result)
//! - Card domain: `EnergyType`, `CardRecord`, `CardCatalog`
//! - Entities: `MetaSnapshot`, `MetaDeck`, `CandidateDeck`, `MatchupEstimate`,
//!   `DeckComparisonResult`
//! - Engine parameters: `Params` (thresholds, caps, worker bound)
//! - Deterministic ordering helpers (float total order, canonical deck order)

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidName,
        InvalidId,
        InvalidHex,
        InvalidToken,
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidName => write!(f, "invalid name"),
                CoreError::InvalidId => write!(f, "invalid id"),
                CoreError::InvalidHex => write!(f, "invalid hex"),
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod cards;
pub mod determinism;
pub mod entities;
pub mod ids;
pub mod variables;

pub use errors::CoreError;
