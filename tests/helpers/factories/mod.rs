pub mod block_factory;
pub mod counting_block;

pub use block_factory::BlockFactory;
pub use counting_block::{CountingBlock, CountingColumn};
