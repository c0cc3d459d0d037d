use std::fmt;

use crate::engine::core::column::BlockView;
use crate::engine::core::read::aggregate::field::NeededFields;
use crate::engine::errors::StatsError;

/// Immutable, parsed configuration of one stats function call in a query.
pub trait StatsFunc: fmt::Display + Send + Sync {
    type Processor: StatsProcessor<Func = Self>;

    /// Registers the columns the function reads so the planner does not prune them.
    fn update_needed_fields(&self, needed: &mut NeededFields);
}

/// Mutable per-group state of a [`StatsFunc`].
///
/// Every mutating call returns the signed change, in bytes, of the state it retains.
/// Callers sum these deltas to enforce memory limits; processors never enforce anything.
pub trait StatsProcessor: Default + Send {
    type Func: StatsFunc<Processor = Self>;

    /// Feeds every row of `block`. Must end in the same state as calling
    /// [`update_stats_for_row`](Self::update_stats_for_row) for each row in order.
    fn update_stats_for_all_rows(&mut self, func: &Self::Func, block: &dyn BlockView) -> isize;

    /// Feeds a single row of `block`.
    fn update_stats_for_row(
        &mut self,
        func: &Self::Func,
        block: &dyn BlockView,
        row_idx: usize,
    ) -> isize;

    /// Folds a partial state from another shard into `self`. `other` may be drained.
    fn merge_state(&mut self, func: &Self::Func, other: &mut Self) -> isize;

    /// Appends the final result to `dst`.
    fn finalize_stats(&self, func: &Self::Func, dst: &mut Vec<u8>) -> Result<(), StatsError>;

    /// Bytes currently retained; equals the sum of all returned deltas.
    fn state_size(&self) -> usize;
}
