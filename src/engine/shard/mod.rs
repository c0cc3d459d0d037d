pub mod runner;

pub use runner::{RunOptions, run_sharded};

#[cfg(test)]
mod runner_test;
