use thiserror::Error;
use tracing::{debug, error, warn};

use crate::command::parser::error::ParseError;

/// Errors that can occur while running stats functions over blocks.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Invalid stats function: {0}")]
    Parse(#[from] ParseError),

    #[error("Column error: {0}")]
    Column(#[from] ColumnError),

    #[error("Group state needs {used} bytes, exceeding the limit of {limit} bytes")]
    MemoryLimitExceeded { used: u64, limit: u64 },

    #[error("Query cancelled")]
    Cancelled,

    #[error("Failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),
}

impl StatsError {
    pub fn log_error(&self) {
        match self {
            StatsError::Parse(e) => {
                error!("Invalid stats function: {}", e);
                debug!("Parse error details: {:?}", e);
            }
            StatsError::Column(e) => {
                error!("Column error: {}", e);
                debug!("Column error details: {:?}", e);
            }
            StatsError::MemoryLimitExceeded { used, limit } => {
                error!(used, limit, "Group state memory limit exceeded");
            }
            StatsError::Cancelled => {
                warn!("Query was cancelled between blocks");
            }
            StatsError::Serialize(e) => {
                error!("Failed to serialize result: {}", e);
                debug!("Serialization error details: {:?}", e);
            }
            StatsError::Io(e) => {
                error!("Failed to read input: {}", e);
            }
        }
    }
}

/// Errors raised while assembling a block from raw column data.
#[derive(Debug, Error, PartialEq)]
pub enum ColumnError {
    #[error("BUG: unknown value type tag {0}")]
    UnknownValueType(u8),

    #[error("Value type {0:?} has no fixed-width encoding")]
    NotFixedWidth(crate::engine::core::column::ValueType),

    #[error("Column '{column}' value {value} does not fit {value_type:?}")]
    ValueOutOfRange {
        column: String,
        value_type: crate::engine::core::column::ValueType,
        value: u64,
    },

    #[error("Dictionary index {index} out of range for column '{column}' with {size} entries")]
    DictIndexOutOfRange {
        column: String,
        index: u8,
        size: usize,
    },

    #[error("Column '{column}' has {got} rows, block has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),
}
