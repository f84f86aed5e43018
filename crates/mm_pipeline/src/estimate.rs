//! crates/mm_pipeline/src/estimate.rs
//! ESTIMATE stage: fan out over opponents on a bounded rayon pool.
//!
//! Each opponent is independent and reads the snapshot immutably. Results are
//! collected in opponent order, so scheduling never changes the output. A
//! strategy failure for one opponent degrades that opponent to the baseline.

use log::{debug, warn};
use rayon::prelude::*;

use mm_algo::{baseline, estimate, EstimateInput, Resolution, Scored};
use mm_core::entities::{CandidateDeck, MatchupEstimate, MetaDeck, MetaSnapshot};

/// Borrowed context shared by every estimator invocation.
#[derive(Clone, Copy)]
pub struct EstimateCtx<'a> {
    pub snapshot: &'a MetaSnapshot,
    pub candidate: &'a CandidateDeck,
    pub resolution: &'a Resolution,
}

impl<'a> EstimateCtx<'a> {
    fn input(&self, opponent: &'a MetaDeck) -> EstimateInput<'a> {
        let label = self.resolution.label.as_ref();
        EstimateInput {
            self_label: label,
            self_table: label.and_then(|l| self.snapshot.deck(l)).map(|d| &d.matchups),
            self_cards: &self.candidate.cards,
            opponent,
            catalog: &self.snapshot.cards,
        }
    }

    fn estimate_one(&self, opponent: &'a MetaDeck) -> MatchupEstimate {
        match estimate(&self.input(opponent)) {
            Ok(e) => e,
            Err(err) => {
                warn!("{err}; using baseline estimate");
                baseline(opponent)
            }
        }
    }
}

/// Estimate the candidate against every opponent with at most `max_workers`
/// threads.
pub fn estimate_all<'a>(
    ctx: EstimateCtx<'a>,
    opponents: &[&'a MetaDeck],
    max_workers: usize,
) -> Vec<Scored<'a>> {
    let workers = opponents.len().min(max_workers.max(1));
    if workers <= 1 {
        return estimate_sequential(ctx, opponents);
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("mm-estimate-{i}"))
        .build()
    {
        Ok(pool) => {
            debug!("estimating {} opponents on {workers} threads", opponents.len());
            pool.install(|| {
                opponents
                    .par_iter()
                    .map(|opp| (*opp, ctx.estimate_one(*opp)))
                    .collect()
            })
        }
        Err(e) => {
            warn!("estimator thread pool unavailable ({e}); running sequentially");
            estimate_sequential(ctx, opponents)
        }
    }
}

fn estimate_sequential<'a>(ctx: EstimateCtx<'a>, opponents: &[&'a MetaDeck]) -> Vec<Scored<'a>> {
    opponents.iter().map(|opp| (*opp, ctx.estimate_one(*opp))).collect()
}
