use std::io::BufRead;
use std::mem;
use std::net::Ipv4Addr;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::engine::core::column::block::write_raw;
use crate::engine::core::column::{Block, BlockColumn, TIME_FIELD, ValueType};
use crate::engine::errors::{ColumnError, StatsError};
use crate::shared::time::TimeParser;

/// Most distinct values a column may have to be stored as a dictionary.
pub const MAX_DICT_LEN: usize = 8;

/// Accumulates textual rows and turns them into a typed [`Block`].
///
/// Every column is stored in the narrowest encoding that renders each row back to its
/// original text; `_time` becomes the implicit time column when every row parses as
/// RFC3339.
#[derive(Debug, Default)]
pub struct BlockBuilder {
    rows: usize,
    columns: IndexMap<String, Vec<String>>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Appends a row. Columns missing from the row get an empty value; a name repeated
    /// within the row keeps its last value.
    pub fn push_row(&mut self, fields: Vec<(String, String)>) {
        let rows = self.rows;
        for (name, value) in fields {
            let col = self
                .columns
                .entry(name)
                .or_insert_with(|| vec![String::new(); rows]);
            if col.len() == rows {
                col.push(value);
            } else if let Some(last) = col.last_mut() {
                *last = value;
            }
        }
        self.rows += 1;
        for col in self.columns.values_mut() {
            if col.len() < self.rows {
                col.push(String::new());
            }
        }
    }

    /// Appends a JSON object as a row; nested objects are flattened with dotted names.
    pub fn push_json_row(&mut self, row: &Value) {
        let mut fields = Vec::new();
        flatten_json(row, "", &mut fields);
        self.push_row(fields);
    }

    /// Drains the accumulated rows into a block.
    pub fn build(&mut self) -> Result<Block, ColumnError> {
        let rows = mem::take(&mut self.rows);
        let mut columns = mem::take(&mut self.columns);

        let timestamps = columns.get(TIME_FIELD).and_then(|values| {
            values
                .iter()
                .map(|v| TimeParser::parse_rfc3339_nanos(v))
                .collect::<Option<Vec<i64>>>()
        });
        if timestamps.is_some() {
            columns.shift_remove(TIME_FIELD);
        }

        let columns = columns
            .into_iter()
            .map(|(name, values)| infer_column(name, values))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(target: "logagg::block", rows, columns = columns.len(), "Built block");

        match timestamps {
            Some(ts) => Block::with_timestamps(ts, columns),
            None => Block::new(rows, columns),
        }
    }
}

/// Reads JSON lines into blocks of at most `block_rows` rows.
///
/// Blank lines are ignored. Lines that are not JSON objects are skipped with a warning.
pub fn read_json_lines(reader: impl BufRead, block_rows: usize) -> Result<Vec<Block>, StatsError> {
    let block_rows = block_rows.max(1);
    let mut blocks = Vec::new();
    let mut builder = BlockBuilder::new();
    let mut skipped = 0usize;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&line) {
            Ok(row @ Value::Object(_)) => builder.push_json_row(&row),
            Ok(_) | Err(_) => {
                skipped += 1;
                debug!(target: "logagg::block", line = line_no + 1, "Skipping line that is not a JSON object");
                continue;
            }
        }
        if builder.rows() >= block_rows {
            blocks.push(builder.build()?);
        }
    }
    if !builder.is_empty() {
        blocks.push(builder.build()?);
    }
    if skipped > 0 {
        warn!(target: "logagg::block", skipped, "Skipped malformed input lines");
    }
    Ok(blocks)
}

/// Picks the narrowest column encoding that preserves every value's text.
pub fn infer_column(name: String, values: Vec<String>) -> Result<BlockColumn, ColumnError> {
    let rows = values.len();
    match values.first() {
        None => return Ok(BlockColumn::constant(name, "", 0)),
        Some(first) if values.iter().all(|v| v == first) => {
            let first = first.clone();
            return Ok(BlockColumn::constant(name, first, rows));
        }
        Some(_) => {}
    }

    if let Some(raw) = parse_canonical(&values, ValueType::Uint64, |v| v.parse::<u64>().ok()) {
        let max = raw.iter().copied().max().unwrap_or_default();
        let value_type = [ValueType::Uint8, ValueType::Uint16, ValueType::Uint32]
            .into_iter()
            .find(|vt| max <= vt.max_raw())
            .unwrap_or(ValueType::Uint64);
        return BlockColumn::encoded(name, value_type, raw);
    }
    if let Some(raw) = parse_canonical(&values, ValueType::Int64, |v| {
        v.parse::<i64>().ok().map(|n| n as u64)
    }) {
        return BlockColumn::encoded(name, ValueType::Int64, raw);
    }
    if let Some(raw) = parse_canonical(&values, ValueType::Float64, |v| {
        v.parse::<f64>().ok().map(f64::to_bits)
    }) {
        return BlockColumn::encoded(name, ValueType::Float64, raw);
    }
    if let Some(raw) = parse_canonical(&values, ValueType::Ipv4, |v| {
        v.parse::<Ipv4Addr>().ok().map(|ip| u32::from(ip) as u64)
    }) {
        return BlockColumn::encoded(name, ValueType::Ipv4, raw);
    }
    if let Some(raw) = parse_canonical(&values, ValueType::TimestampIso8601, |v| {
        TimeParser::parse_iso8601_nanos(v).map(|n| n as u64)
    }) {
        return BlockColumn::encoded(name, ValueType::TimestampIso8601, raw);
    }

    match dictionary_encode(&values) {
        Some((dict, indices)) => BlockColumn::dict(name, dict, indices),
        None => Ok(BlockColumn::strings(name, values)),
    }
}

fn dictionary_encode(values: &[String]) -> Option<(Vec<String>, Vec<u8>)> {
    let mut dict: Vec<String> = Vec::new();
    let mut indices = Vec::with_capacity(values.len());
    for v in values {
        let idx = match dict.iter().position(|d| d == v) {
            Some(idx) => idx,
            None if dict.len() < MAX_DICT_LEN => {
                dict.push(v.clone());
                dict.len() - 1
            }
            None => return None,
        };
        indices.push(idx as u8);
    }
    Some((dict, indices))
}

fn parse_canonical(
    values: &[String],
    value_type: ValueType,
    parse: impl Fn(&str) -> Option<u64>,
) -> Option<Vec<u64>> {
    let mut buf = String::new();
    values
        .iter()
        .map(|v| {
            let raw = parse(v)?;
            buf.clear();
            write_raw(&mut buf, value_type, raw);
            (buf == *v).then_some(raw)
        })
        .collect()
}

fn flatten_json(value: &Value, prefix: &str, out: &mut Vec<(String, String)>) {
    let Value::Object(map) = value else {
        out.push((prefix.to_string(), json_text(value)));
        return;
    };
    for (key, v) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match v {
            Value::Object(_) => flatten_json(v, &name, out),
            _ => out.push((name, json_text(v))),
        }
    }
}

fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            value.to_string()
        }
    }
}
