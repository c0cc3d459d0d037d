pub mod arena;
pub mod field;
pub mod func;
pub mod order;
pub mod row_select;

pub use arena::{ProcessorArena, ProcessorHandle};
pub use field::{Field, NeededFields, marshal_fields_to_json};
pub use func::{StatsFunc, StatsProcessor};
pub use order::{Extremum, less_string};
pub use row_select::{RowSelect, RowSelectProcessor};

#[cfg(test)]
mod arena_test;
