mod group_key;
mod memory_budget;
mod stats_sink;

pub use group_key::GroupKey;
pub use memory_budget::MemoryBudget;
pub use stats_sink::StatsSink;
