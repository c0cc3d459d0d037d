use std::collections::HashMap;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ahash::RandomState as AHashRandomState;
use tracing::{debug, info, trace};

use super::group_key::GroupKey;
use super::memory_budget::MemoryBudget;
use crate::engine::core::column::BlockView;
use crate::engine::core::read::aggregate::{
    Field, ProcessorArena, ProcessorHandle, StatsFunc, StatsProcessor,
};
use crate::engine::errors::StatsError;
use crate::shared::config::CONFIG;

/// Groups rows by the `by` fields and feeds each group's processors.
///
/// One sink belongs to one shard. Sinks from different shards are combined with
/// [`StatsSink::merge`] before [`StatsSink::finalize`].
pub struct StatsSink<F: StatsFunc> {
    funcs: Arc<[F]>,
    by: Vec<String>,
    groups: HashMap<GroupKey, usize, AHashRandomState>,
    // Processor handles per group, one per function, indexed by the map value.
    slots: Vec<Vec<ProcessorHandle>>,
    arena: ProcessorArena<F::Processor>,
    budget: Arc<MemoryBudget>,
    stop: Option<Arc<AtomicBool>>,
    // Bytes currently charged to `budget` by this sink.
    charged: isize,
    rows_seen: u64,
}

impl<F: StatsFunc> StatsSink<F> {
    pub fn new(funcs: Arc<[F]>, by: Vec<String>, budget: Arc<MemoryBudget>) -> Self {
        Self {
            funcs,
            by,
            groups: HashMap::with_hasher(AHashRandomState::new()),
            slots: Vec::new(),
            arena: ProcessorArena::new(CONFIG.stats.arena_page_size),
            budget,
            stop: None,
            charged: 0,
            rows_seen: 0,
        }
    }

    /// Aborts [`write_block`](Self::write_block) once `stop` is set.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Must be called before the first block.
    pub fn with_arena_page_size(mut self, page_size: usize) -> Self {
        self.arena = ProcessorArena::new(page_size);
        self
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn rows_seen(&self) -> u64 {
        self.rows_seen
    }

    /// Bytes this sink has charged to its budget.
    pub fn charged_bytes(&self) -> usize {
        self.charged as usize
    }

    fn is_cancelled(&self) -> bool {
        self.stop
            .as_ref()
            .is_some_and(|stop| stop.load(Ordering::Relaxed))
    }

    fn charge(&mut self, delta: isize) -> Result<(), StatsError> {
        self.charged += delta;
        self.budget.charge(delta)
    }

    /// Returns the slot of `key`, creating the group if needed, plus the bytes it added.
    fn slot_for(&mut self, key: GroupKey) -> (usize, isize) {
        if let Some(&slot) = self.groups.get(&key) {
            return (slot, 0);
        }
        let arena_before = self.arena.bytes_allocated();
        let handles: Vec<ProcessorHandle> = self.funcs.iter().map(|_| self.arena.alloc()).collect();
        let delta = key.size()
            + handles.len() * mem::size_of::<ProcessorHandle>()
            + (self.arena.bytes_allocated() - arena_before);

        trace!(target: "logagg::sink", key = ?key.values(), "New group");
        let slot = self.slots.len();
        self.slots.push(handles);
        self.groups.insert(key, slot);
        (slot, delta as isize)
    }

    pub fn write_block(&mut self, block: &dyn BlockView) -> Result<(), StatsError> {
        if self.is_cancelled() {
            return Err(StatsError::Cancelled);
        }
        let rows = block.rows_count();
        if rows == 0 {
            return Ok(());
        }
        self.rows_seen += rows as u64;

        let mut delta = 0;
        let whole_block_key = if self.by.is_empty() {
            Some(GroupKey::empty())
        } else {
            GroupKey::from_const_block(&self.by, block)
        };

        match whole_block_key {
            Some(key) => {
                let (slot, added) = self.slot_for(key);
                delta += added;
                for (func, &h) in self.funcs.iter().zip(&self.slots[slot]) {
                    delta += self.arena.get_mut(h).update_stats_for_all_rows(func, block);
                }
            }
            None => {
                let mut prev: Option<(GroupKey, usize)> = None;
                for row_idx in 0..rows {
                    let reused = match &prev {
                        Some((key, slot)) if key.matches_row(&self.by, block, row_idx) => {
                            Some(*slot)
                        }
                        _ => None,
                    };
                    let slot = match reused {
                        Some(slot) => slot,
                        None => {
                            let key = GroupKey::from_row(&self.by, block, row_idx);
                            let (slot, added) = self.slot_for(key.clone());
                            delta += added;
                            prev = Some((key, slot));
                            slot
                        }
                    };
                    for (func, &h) in self.funcs.iter().zip(&self.slots[slot]) {
                        delta += self
                            .arena
                            .get_mut(h)
                            .update_stats_for_row(func, block, row_idx);
                    }
                }
            }
        }

        self.charge(delta)
    }

    /// Folds `other` into this sink. Groups present in both are merged processor by
    /// processor; the rest are moved over.
    pub fn merge(&mut self, mut other: StatsSink<F>) -> Result<(), StatsError> {
        if self.is_cancelled() {
            return Err(StatsError::Cancelled);
        }
        debug!(
            target: "logagg::sink",
            groups = self.groups.len(),
            other_groups = other.groups.len(),
            "Merging sinks"
        );

        // Adopt the other sink's charge; it is settled against the real change below.
        let inherited = mem::take(&mut other.charged);
        self.charged += inherited;
        self.rows_seen += other.rows_seen;

        let mut delta = -inherited;
        let mut entries: Vec<(GroupKey, usize)> = other.groups.drain().collect();
        entries.sort_unstable_by_key(|(_, slot)| *slot);
        for (key, their_slot) in entries {
            let their_handles = &other.slots[their_slot];
            let existing = self.groups.get(&key).copied();
            match existing {
                Some(slot) => {
                    for ((func, &mine), &theirs) in
                        self.funcs.iter().zip(&self.slots[slot]).zip(their_handles)
                    {
                        let donor = other.arena.get_mut(theirs);
                        delta += self.arena.get_mut(mine).merge_state(func, donor);
                    }
                }
                None => {
                    let arena_before = self.arena.bytes_allocated();
                    let mut handles = Vec::with_capacity(their_handles.len());
                    for &theirs in their_handles {
                        let processor = other.arena.take(theirs);
                        delta += processor.state_size() as isize;
                        handles.push(self.arena.alloc_with(processor));
                    }
                    delta += (key.size()
                        + handles.len() * mem::size_of::<ProcessorHandle>()
                        + (self.arena.bytes_allocated() - arena_before))
                        as isize;
                    let slot = self.slots.len();
                    self.slots.push(handles);
                    self.groups.insert(key, slot);
                }
            }
        }

        self.charge(delta)
    }

    /// Produces one row per group: the by-field values, then one field per function
    /// named by its canonical text and holding its JSON result.
    ///
    /// Groups appear in the order they were first seen. Without by-fields a single row
    /// is produced even when no rows were written.
    pub fn finalize(mut self) -> Result<Vec<Vec<Field>>, StatsError> {
        if self.by.is_empty() && self.groups.is_empty() {
            let (_, added) = self.slot_for(GroupKey::empty());
            self.charge(added)?;
        }

        let mut entries: Vec<(&GroupKey, usize)> =
            self.groups.iter().map(|(k, &slot)| (k, slot)).collect();
        entries.sort_unstable_by_key(|(_, slot)| *slot);

        let mut out = Vec::with_capacity(entries.len());
        let mut buf = Vec::new();
        for (key, slot) in entries {
            let mut row = Vec::with_capacity(self.by.len() + self.funcs.len());
            for (name, value) in self.by.iter().zip(key.values()) {
                row.push(Field::new(name.as_str(), value.as_str()));
            }
            for (func, &h) in self.funcs.iter().zip(&self.slots[slot]) {
                buf.clear();
                self.arena.get(h).finalize_stats(func, &mut buf)?;
                row.push(Field::new(
                    func.to_string(),
                    String::from_utf8_lossy(&buf).into_owned(),
                ));
            }
            out.push(row);
        }

        info!(
            target: "logagg::sink",
            groups = out.len(),
            rows = self.rows_seen,
            state_bytes = self.charged,
            "Finalized stats"
        );
        Ok(out)
    }
}

impl<F: StatsFunc> Drop for StatsSink<F> {
    fn drop(&mut self) {
        let charged = mem::take(&mut self.charged);
        let _ = self.budget.charge(-charged);
    }
}
