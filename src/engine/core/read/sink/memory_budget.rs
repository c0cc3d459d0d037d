use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::errors::StatsError;
use crate::shared::memory::allowed_state_bytes;

/// Shared byte counter for group state across the shards of one query.
///
/// Sinks charge the deltas reported by processors plus their own bookkeeping. Charging
/// past the limit still records the bytes; the caller is expected to abort.
#[derive(Debug)]
pub struct MemoryBudget {
    limit: u64,
    used: AtomicU64,
}

impl MemoryBudget {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            used: AtomicU64::new(0),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(u64::MAX)
    }

    /// Budget sized from `[stats]` settings and system memory.
    pub fn from_config() -> Self {
        Self::new(allowed_state_bytes())
    }

    pub fn charge(&self, delta: isize) -> Result<(), StatsError> {
        if delta <= 0 {
            self.release(delta.unsigned_abs() as u64);
            return Ok(());
        }
        let delta = delta as u64;
        let used = self.used.fetch_add(delta, Ordering::Relaxed).saturating_add(delta);
        if used > self.limit {
            return Err(StatsError::MemoryLimitExceeded {
                used,
                limit: self.limit,
            });
        }
        Ok(())
    }

    pub fn release(&self, bytes: u64) {
        if bytes == 0 {
            return;
        }
        let _ = self
            .used
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                Some(used.saturating_sub(bytes))
            });
    }

    pub fn used(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}
