pub mod column;
pub mod read;
