use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::engine::core::column::BlockView;
use crate::engine::core::read::aggregate::{Field, StatsFunc};
use crate::engine::core::read::sink::{MemoryBudget, StatsSink};
use crate::engine::errors::StatsError;
use crate::shared::config::CONFIG;

/// How a query is split across shards.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// 0 means one shard per rayon worker thread.
    pub shard_count: usize,
    pub arena_page_size: usize,
    pub budget: Arc<MemoryBudget>,
    pub stop: Option<Arc<AtomicBool>>,
}

impl RunOptions {
    pub fn from_config() -> Self {
        Self {
            shard_count: CONFIG.stats.shard_count,
            arena_page_size: CONFIG.stats.arena_page_size,
            budget: Arc::new(MemoryBudget::from_config()),
            stop: None,
        }
    }

    pub fn with_shard_count(mut self, shard_count: usize) -> Self {
        self.shard_count = shard_count;
        self
    }

    pub fn with_budget(mut self, budget: Arc<MemoryBudget>) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn effective_shard_count(&self) -> usize {
        match self.shard_count {
            0 => rayon::current_num_threads().max(1),
            n => n,
        }
    }
}

/// Runs `funcs` grouped by `by` over `blocks`.
///
/// Blocks are dealt round-robin to shards that run on the rayon pool. Shard sinks are
/// reduced pairwise and the survivor is finalized.
pub fn run_sharded<F, B>(
    funcs: Vec<F>,
    by: Vec<String>,
    blocks: &[B],
    opts: &RunOptions,
) -> Result<Vec<Vec<Field>>, StatsError>
where
    F: StatsFunc,
    B: BlockView + Sync,
{
    let shard_count = opts.effective_shard_count();
    info!(
        target: "logagg::shard",
        shards = shard_count,
        blocks = blocks.len(),
        funcs = funcs.len(),
        "Running stats query"
    );

    let funcs: Arc<[F]> = Arc::from(funcs);
    let sinks = (0..shard_count)
        .into_par_iter()
        .map(|shard_id| -> Result<StatsSink<F>, StatsError> {
            let mut sink = StatsSink::new(Arc::clone(&funcs), by.clone(), Arc::clone(&opts.budget))
                .with_arena_page_size(opts.arena_page_size);
            if let Some(stop) = &opts.stop {
                sink = sink.with_stop_flag(Arc::clone(stop));
            }
            for block in blocks.iter().skip(shard_id).step_by(shard_count) {
                sink.write_block(block)?;
            }
            debug!(
                target: "logagg::shard",
                shard_id,
                groups = sink.group_count(),
                rows = sink.rows_seen(),
                "Shard finished"
            );
            Ok(sink)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let merged = sinks
        .into_par_iter()
        .map(Ok)
        .reduce_with(|left: Result<StatsSink<F>, StatsError>, right| {
            let mut left = left?;
            left.merge(right?)?;
            Ok(left)
        });

    match merged {
        Some(sink) => sink?.finalize(),
        None => StatsSink::new(funcs, by, Arc::clone(&opts.budget)).finalize(),
    }
}
