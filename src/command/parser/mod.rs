pub mod command;
pub mod commands;
pub mod error;
pub mod tokenizer;

pub use command::{parse_field_list, parse_stats_funcs};
pub use error::ParseError;

#[cfg(test)]
mod tokenizer_tests;
