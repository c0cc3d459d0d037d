pub mod block;
pub mod builder;
pub mod render;
pub mod value_type;
pub mod view;

pub use block::{Block, BlockColumn};
pub use builder::{BlockBuilder, read_json_lines};
pub use value_type::ValueType;
pub use view::{BlockView, ColumnKind, ColumnView, TIME_FIELD};

#[cfg(test)]
mod render_test;
#[cfg(test)]
mod value_type_test;
