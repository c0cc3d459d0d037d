pub mod aggregate;
pub mod sink;
