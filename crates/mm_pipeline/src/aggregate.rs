//! crates/mm_pipeline/src/aggregate.rs
//! AGGREGATE stage: join barrier over completed estimates.

use log::debug;

use mm_algo::{aggregate, Aggregate, Resolution, Scored};
use mm_core::entities::MetaSnapshot;

use crate::PipelineError;

pub fn aggregate_scores(
    scored: &[Scored<'_>],
    snapshot: &MetaSnapshot,
    resolution: &Resolution,
) -> Result<Aggregate, PipelineError> {
    let agg = aggregate(scored, &snapshot.decks, resolution.is_classified())
        .map_err(|e| PipelineError::InsufficientData(e.to_string()))?;
    debug!(
        "overall meta score {:.4} over share {:.4}, position {:?}",
        agg.overall_meta_score, agg.share_total, agg.position
    );
    Ok(agg)
}
