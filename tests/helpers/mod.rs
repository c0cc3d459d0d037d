pub mod factories;
pub mod factory;

pub use factories::*;
pub use factory::Factory;
