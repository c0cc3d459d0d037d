pub use super::factories::{BlockFactory, CountingBlock};

pub struct Factory;

impl Factory {
    pub fn block() -> BlockFactory {
        BlockFactory::new()
    }
}
