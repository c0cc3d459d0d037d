use std::net::Ipv4Addr;

use crate::engine::core::column::{Block, BlockColumn};

enum PendingColumn {
    Ready(BlockColumn),
    Const(String, String),
}

/// Factory for constructing in-memory `Block` instances for tests.
///
/// Constant columns take their row count from the other columns (or `with_rows`).
pub struct BlockFactory {
    rows: Option<usize>,
    timestamps: Option<Vec<i64>>,
    columns: Vec<PendingColumn>,
}

impl BlockFactory {
    pub fn new() -> Self {
        Self {
            rows: None,
            timestamps: None,
            columns: Vec::new(),
        }
    }

    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Adds the implicit `_time` column as the first column.
    pub fn with_timestamps(mut self, timestamps: &[i64]) -> Self {
        self.timestamps = Some(timestamps.to_vec());
        self
    }

    pub fn with_strings(mut self, name: &str, values: &[&str]) -> Self {
        self.columns.push(PendingColumn::Ready(BlockColumn::strings(
            name,
            values.to_vec(),
        )));
        self
    }

    /// Dictionary column; entries are the distinct values in first-seen order.
    pub fn with_dict(mut self, name: &str, values: &[&str]) -> Self {
        let mut dict: Vec<String> = Vec::new();
        let mut indices = Vec::with_capacity(values.len());
        for v in values {
            let idx = match dict.iter().position(|d| d == v) {
                Some(idx) => idx,
                None => {
                    dict.push((*v).to_string());
                    dict.len() - 1
                }
            };
            indices.push(idx as u8);
        }
        let col = BlockColumn::dict(name, dict, indices).expect("valid dictionary");
        self.columns.push(PendingColumn::Ready(col));
        self
    }

    pub fn with_const(mut self, name: &str, value: &str) -> Self {
        self.columns
            .push(PendingColumn::Const(name.to_string(), value.to_string()));
        self
    }

    pub fn with_uint64(self, name: &str, values: &[u64]) -> Self {
        self.with_column(BlockColumn::uint64(name, values))
    }

    pub fn with_int64(self, name: &str, values: &[i64]) -> Self {
        self.with_column(BlockColumn::int64(name, values))
    }

    pub fn with_float64(self, name: &str, values: &[f64]) -> Self {
        self.with_column(BlockColumn::float64(name, values))
    }

    pub fn with_ipv4(self, name: &str, values: &[Ipv4Addr]) -> Self {
        self.with_column(BlockColumn::ipv4(name, values))
    }

    pub fn with_iso8601(self, name: &str, nanos: &[i64]) -> Self {
        self.with_column(BlockColumn::timestamp_iso8601(name, nanos))
    }

    pub fn with_column(mut self, column: BlockColumn) -> Self {
        self.columns.push(PendingColumn::Ready(column));
        self
    }

    pub fn create(self) -> Block {
        let rows = self
            .rows
            .or_else(|| self.timestamps.as_ref().map(Vec::len))
            .or_else(|| {
                self.columns.iter().find_map(|c| match c {
                    PendingColumn::Ready(col) => Some(col.rows()),
                    PendingColumn::Const(..) => None,
                })
            })
            .unwrap_or(1);
        let columns: Vec<BlockColumn> = self
            .columns
            .into_iter()
            .map(|c| match c {
                PendingColumn::Ready(col) => col,
                PendingColumn::Const(name, value) => BlockColumn::constant(name, value, rows),
            })
            .collect();
        match self.timestamps {
            Some(ts) => Block::with_timestamps(ts, columns).expect("valid block"),
            None => Block::new(rows, columns).expect("valid block"),
        }
    }
}
