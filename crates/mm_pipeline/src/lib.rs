//! mm_pipeline: deterministic comparison pipeline
//! (validate → resolve → estimate → aggregate → insights → build result).
//!
//! I/O is limited to the `run_from_paths` convenience entry, which delegates
//! loading to `mm_io`. Algorithms live in `mm_algo`.

#![forbid(unsafe_code)]

use std::path::Path;

use log::{debug, info, warn};
use thiserror::Error;

use mm_algo::{NoteTemplates, PlainNotes};
use mm_core::entities::{CandidateDeck, DeckComparisonResult, MetaSnapshot};
use mm_core::variables::{validate_domains, Params};
use mm_io::{loader, IoError};

pub mod aggregate;
pub mod build_result;
pub mod estimate;
pub mod insights;
pub mod resolve;
pub mod validate;

pub use build_result::verify_id;
pub use validate::{validate_snapshot, Severity, ValidationIssue, ValidationReport};

/// Single error surface for the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The snapshot breaks a structural invariant. Not repaired.
    #[error("invalid snapshot ({code}): {message}")]
    InvalidSnapshot { code: String, message: String },

    /// An input document failed schema or shape checks while loading.
    #[error("invalid input at {pointer}: {message}")]
    InvalidInput { pointer: String, message: String },

    /// No opponent weight to aggregate over.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// The candidate has no cards.
    #[error("candidate deck has no cards to resolve")]
    UnresolvableCandidate,

    #[error("io: {0}")]
    Io(String),

    #[error("build: {0}")]
    Build(String),
}

impl From<IoError> for PipelineError {
    fn from(e: IoError) -> Self {
        match e {
            IoError::Schema { pointer, msg } | IoError::Json { pointer, msg } => {
                PipelineError::InvalidInput { pointer, message: msg }
            }
            IoError::Invalid(m) => PipelineError::InvalidInput { pointer: "/".into(), message: m },
            IoError::Path(m) => PipelineError::Io(m),
            IoError::Limit(m) => PipelineError::Io(format!("limit: {m}")),
            IoError::Hash(m) => PipelineError::Build(format!("hash: {m}")),
        }
    }
}

/// Compare `candidate` against `snapshot` with the default note templates.
pub fn compare(
    snapshot: &MetaSnapshot,
    candidate: &CandidateDeck,
    params: &Params,
) -> Result<DeckComparisonResult, PipelineError> {
    compare_with_notes(snapshot, candidate, params, &PlainNotes)
}

/// Full pipeline. The snapshot is only borrowed; nothing is mutated.
pub fn compare_with_notes(
    snapshot: &MetaSnapshot,
    candidate: &CandidateDeck,
    params: &Params,
    notes: &dyn NoteTemplates,
) -> Result<DeckComparisonResult, PipelineError> {
    // --- VALIDATE ---
    validate_domains(params)
        .map_err(|e| PipelineError::InvalidInput { pointer: "/params".into(), message: e.to_string() })?;
    debug!("validating snapshot '{}' ({} decks)", snapshot.id, snapshot.decks.len());
    let report = validate::validate_snapshot(snapshot, params);
    for w in report.warnings() {
        warn!("{} at {}: {}", w.code, w.where_, w.message);
    }
    report.into_result()?;
    if snapshot.is_empty() {
        return Err(PipelineError::InsufficientData("snapshot has no archetypes".into()));
    }

    // --- RESOLVE ---
    let resolution = resolve::resolve_candidate(candidate, snapshot, params)?;
    let opponents = resolve::opponents(snapshot, &resolution);

    // --- ESTIMATE (fan-out) ---
    let ctx = estimate::EstimateCtx { snapshot, candidate, resolution: &resolution };
    let scored = estimate::estimate_all(ctx, &opponents, params.max_workers);

    // --- AGGREGATE (fan-in) ---
    let agg = aggregate::aggregate_scores(&scored, snapshot, &resolution)?;

    // --- INSIGHTS ---
    let found = insights::extract_insights(&scored, params, notes);
    let matchups = insights::matchup_map(&scored, notes);

    // --- BUILD_RESULT ---
    let result = build_result::build_result(build_result::ResultInputs {
        snapshot,
        resolution,
        aggregate: agg,
        matchups,
        insights: found,
    })?;

    info!(
        "{}: archetype {}, score {:.4}, position {}, {} strengths, {} weaknesses",
        result.id,
        result.archetype.as_ref().map_or("unclassified", |a| a.as_str()),
        result.overall_meta_score,
        result.position.map_or_else(|| "-".to_string(), |p| p.to_string()),
        result.strengths.len(),
        result.weaknesses.len(),
    );
    Ok(result)
}

/// Convenience entry: load the three documents via `mm_io`, then compare.
/// `workers` overrides `Params::max_workers` when set.
pub fn run_from_paths(
    snapshot: &Path,
    candidate: &Path,
    params: Option<&Path>,
    workers: Option<usize>,
) -> Result<DeckComparisonResult, PipelineError> {
    let mut loaded = loader::load_all(snapshot, candidate, params)?;
    if let Some(n) = workers {
        loaded.params.max_workers = n.max(1);
    }
    compare(&loaded.snapshot, &loaded.candidate, &loaded.params)
}
