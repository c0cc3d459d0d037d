use once_cell::sync::Lazy;
use sysinfo::System;
use tracing::info;

use crate::shared::config::{CONFIG, StatsConfig};

static TOTAL_MEMORY: Lazy<u64> = Lazy::new(|| {
    let mut system = System::new();
    system.refresh_memory();
    let total = system.total_memory();
    info!(total_memory_mb = total / (1024 * 1024), "Detected system memory");
    total
});

/// Byte ceiling for state held by open groups across all shards of one query.
pub fn allowed_state_bytes() -> u64 {
    allowed_state_bytes_for(&CONFIG.stats, *TOTAL_MEMORY)
}

pub fn allowed_state_bytes_for(cfg: &StatsConfig, total_memory: u64) -> u64 {
    match cfg.max_state_bytes {
        Some(limit) => limit,
        None => {
            let fraction = cfg.memory_fraction.clamp(0.0, 1.0);
            (total_memory as f64 * fraction) as u64
        }
    }
}
