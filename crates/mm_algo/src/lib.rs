// crates/mm_algo/src/lib.rs
#![forbid(unsafe_code)]

// Pure algorithms over mm_core values. No I/O, no threads, no logging.

pub mod aggregator;
pub mod estimator;
pub mod insights;
pub mod notes;
pub mod resolver;
pub mod similarity;

// Tight, explicit re-exports (pipeline imports these from crate root).
pub use aggregator::{aggregate, position_in_field, Aggregate, AggregateError};
pub use estimator::{baseline, dominant_energy, estimate, EstimateError, EstimateInput};
pub use insights::{extract, Insights, Thresholds};
pub use notes::{NoteTemplates, PlainNotes};
pub use resolver::{resolve, Resolution};
pub use similarity::jaccard;

use mm_core::entities::{MatchupEstimate, MetaDeck};

/// One opponent and the candidate's estimate against it, in snapshot order.
pub type Scored<'a> = (&'a MetaDeck, MatchupEstimate);
