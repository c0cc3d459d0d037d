use std::borrow::Cow;
use std::collections::HashMap;
use std::net::Ipv4Addr;

use crate::engine::core::column::ValueType;
use crate::engine::core::column::render;
use crate::engine::core::column::view::{BlockView, ColumnKind, ColumnView, TIME_FIELD};
use crate::engine::errors::ColumnError;

/// Storage behind a [`BlockColumn`].
#[derive(Debug, Clone, PartialEq)]
enum ColumnData {
    Const(String),
    Time(Vec<i64>),
    Strings(Vec<String>),
    Dict {
        values: Vec<String>,
        indices: Vec<u8>,
    },
    // Raw 64-bit words interpreted per `value_type`; extremes computed once at build time.
    Encoded {
        value_type: ValueType,
        raw: Vec<u64>,
        min: u64,
        max: u64,
    },
}

/// Owned in-memory column implementing [`ColumnView`].
#[derive(Debug, Clone, PartialEq)]
pub struct BlockColumn {
    name: String,
    rows: usize,
    data: ColumnData,
}

impl BlockColumn {
    pub fn constant(name: impl Into<String>, value: impl Into<String>, rows: usize) -> Self {
        Self {
            name: name.into(),
            rows,
            data: ColumnData::Const(value.into()),
        }
    }

    pub fn time(timestamps: Vec<i64>) -> Self {
        Self {
            name: TIME_FIELD.to_string(),
            rows: timestamps.len(),
            data: ColumnData::Time(timestamps),
        }
    }

    pub fn strings<S: Into<String>>(name: impl Into<String>, values: Vec<S>) -> Self {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        Self {
            name: name.into(),
            rows: values.len(),
            data: ColumnData::Strings(values),
        }
    }

    pub fn dict(
        name: impl Into<String>,
        values: Vec<String>,
        indices: Vec<u8>,
    ) -> Result<Self, ColumnError> {
        let name = name.into();
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= values.len()) {
            return Err(ColumnError::DictIndexOutOfRange {
                column: name,
                index: bad,
                size: values.len(),
            });
        }
        Ok(Self {
            name,
            rows: indices.len(),
            data: ColumnData::Dict { values, indices },
        })
    }

    /// Builds a fixed-width column from a raw value-type tag and raw words, the way a
    /// block decoder sees them. Unknown tags are rejected here so that no stats function
    /// ever observes them.
    pub fn from_raw(
        name: impl Into<String>,
        tag: u8,
        raw: Vec<u64>,
    ) -> Result<Self, ColumnError> {
        let value_type = ValueType::try_from(tag)?;
        Self::encoded(name, value_type, raw)
    }

    pub fn encoded(
        name: impl Into<String>,
        value_type: ValueType,
        raw: Vec<u64>,
    ) -> Result<Self, ColumnError> {
        let name = name.into();
        if !value_type.is_fixed_width() {
            return Err(ColumnError::NotFixedWidth(value_type));
        }
        if let Some(&bad) = raw.iter().find(|&&v| v > value_type.max_raw()) {
            return Err(ColumnError::ValueOutOfRange {
                column: name,
                value_type,
                value: bad,
            });
        }
        let (min, max) = raw_extremes(value_type, &raw);
        Ok(Self {
            name,
            rows: raw.len(),
            data: ColumnData::Encoded {
                value_type,
                raw,
                min,
                max,
            },
        })
    }

    pub fn uint64(name: impl Into<String>, values: &[u64]) -> Self {
        Self::encoded_unchecked(name, ValueType::Uint64, values.to_vec())
    }

    pub fn int64(name: impl Into<String>, values: &[i64]) -> Self {
        let raw = values.iter().map(|&v| v as u64).collect();
        Self::encoded_unchecked(name, ValueType::Int64, raw)
    }

    pub fn float64(name: impl Into<String>, values: &[f64]) -> Self {
        let raw = values.iter().map(|v| v.to_bits()).collect();
        Self::encoded_unchecked(name, ValueType::Float64, raw)
    }

    pub fn ipv4(name: impl Into<String>, values: &[Ipv4Addr]) -> Self {
        let raw = values.iter().map(|&ip| u32::from(ip) as u64).collect();
        Self::encoded_unchecked(name, ValueType::Ipv4, raw)
    }

    pub fn timestamp_iso8601(name: impl Into<String>, nanos: &[i64]) -> Self {
        let raw = nanos.iter().map(|&v| v as u64).collect();
        Self::encoded_unchecked(name, ValueType::TimestampIso8601, raw)
    }

    // Callers above only produce words that fit their type.
    fn encoded_unchecked(name: impl Into<String>, value_type: ValueType, raw: Vec<u64>) -> Self {
        let (min, max) = raw_extremes(value_type, &raw);
        Self {
            name: name.into(),
            rows: raw.len(),
            data: ColumnData::Encoded {
                value_type,
                raw,
                min,
                max,
            },
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

fn raw_extremes(value_type: ValueType, raw: &[u64]) -> (u64, u64) {
    if raw.is_empty() {
        return (0, 0);
    }
    match value_type {
        ValueType::Int64 | ValueType::TimestampIso8601 => {
            let min = raw.iter().map(|&v| v as i64).min().unwrap_or_default();
            let max = raw.iter().map(|&v| v as i64).max().unwrap_or_default();
            (min as u64, max as u64)
        }
        // NaN has no place in the order, so a column holding one has no usable extremes.
        ValueType::Float64 => {
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;
            for &v in raw {
                let f = f64::from_bits(v);
                if f.is_nan() {
                    return (f.to_bits(), f.to_bits());
                }
                min = min.min(f);
                max = max.max(f);
            }
            (min.to_bits(), max.to_bits())
        }
        ValueType::String
        | ValueType::Dict
        | ValueType::Uint8
        | ValueType::Uint16
        | ValueType::Uint32
        | ValueType::Uint64
        | ValueType::Ipv4 => {
            let min = raw.iter().copied().min().unwrap_or_default();
            let max = raw.iter().copied().max().unwrap_or_default();
            (min, max)
        }
    }
}

/// Renders one raw word of a fixed-width column.
pub fn write_raw(buf: &mut String, value_type: ValueType, raw: u64) {
    match value_type {
        ValueType::Uint8 | ValueType::Uint16 | ValueType::Uint32 | ValueType::Uint64 => {
            render::write_uint64(buf, raw)
        }
        ValueType::Int64 => render::write_int64(buf, raw as i64),
        ValueType::Float64 => render::write_float64(buf, f64::from_bits(raw)),
        ValueType::Ipv4 => render::write_ipv4(buf, raw as u32),
        ValueType::TimestampIso8601 => render::write_timestamp_iso8601(buf, raw as i64),
        ValueType::String | ValueType::Dict => {
            unreachable!("BUG: {:?} columns carry no raw words", value_type)
        }
    }
}

impl ColumnView for BlockColumn {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ColumnKind<'_> {
        match &self.data {
            ColumnData::Const(v) => ColumnKind::Const(v),
            ColumnData::Time(ts) => ColumnKind::Time(ts),
            ColumnData::Strings(_) => ColumnKind::Values {
                value_type: ValueType::String,
                min: 0,
                max: 0,
            },
            ColumnData::Dict { .. } => ColumnKind::Values {
                value_type: ValueType::Dict,
                min: 0,
                max: 0,
            },
            ColumnData::Encoded {
                value_type,
                min,
                max,
                ..
            } => ColumnKind::Values {
                value_type: *value_type,
                min: *min,
                max: *max,
            },
        }
    }

    fn value_at_row(&self, row_idx: usize) -> Cow<'_, str> {
        match &self.data {
            ColumnData::Const(v) => Cow::Borrowed(v),
            ColumnData::Time(ts) => {
                let mut s = String::with_capacity(30);
                render::write_row_timestamp(&mut s, ts[row_idx]);
                Cow::Owned(s)
            }
            ColumnData::Strings(values) => Cow::Borrowed(&values[row_idx]),
            ColumnData::Dict { values, indices } => {
                Cow::Borrowed(&values[indices[row_idx] as usize])
            }
            ColumnData::Encoded {
                value_type, raw, ..
            } => {
                let mut s = String::new();
                write_raw(&mut s, *value_type, raw[row_idx]);
                Cow::Owned(s)
            }
        }
    }

    fn for_each_value(&self, f: &mut dyn FnMut(usize, &str)) {
        match &self.data {
            ColumnData::Const(v) => {
                for i in 0..self.rows {
                    f(i, v);
                }
            }
            ColumnData::Time(ts) => {
                let mut buf = String::with_capacity(30);
                for (i, &t) in ts.iter().enumerate() {
                    buf.clear();
                    render::write_row_timestamp(&mut buf, t);
                    f(i, &buf);
                }
            }
            ColumnData::Strings(values) => {
                for (i, v) in values.iter().enumerate() {
                    f(i, v);
                }
            }
            ColumnData::Dict { values, indices } => {
                for (i, &idx) in indices.iter().enumerate() {
                    f(i, &values[idx as usize]);
                }
            }
            ColumnData::Encoded {
                value_type, raw, ..
            } => {
                let mut buf = String::new();
                for (i, &v) in raw.iter().enumerate() {
                    buf.clear();
                    write_raw(&mut buf, *value_type, v);
                    f(i, &buf);
                }
            }
        }
    }

    fn for_each_dict_value(&self, f: &mut dyn FnMut(&str)) {
        if let ColumnData::Dict { values, .. } = &self.data {
            for v in values {
                f(v);
            }
        }
    }
}

/// Owned in-memory block implementing [`BlockView`].
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    rows: usize,
    columns: Vec<BlockColumn>,
    by_name: HashMap<String, usize>,
}

impl Block {
    /// Assembles a block; every column must have exactly `rows` rows and a unique name.
    pub fn new(rows: usize, columns: Vec<BlockColumn>) -> Result<Self, ColumnError> {
        let mut by_name = HashMap::with_capacity(columns.len());
        for (idx, col) in columns.iter().enumerate() {
            if col.rows != rows {
                return Err(ColumnError::LengthMismatch {
                    column: col.name.clone(),
                    expected: rows,
                    got: col.rows,
                });
            }
            if by_name.insert(col.name.clone(), idx).is_some() {
                return Err(ColumnError::DuplicateColumn(col.name.clone()));
            }
        }
        Ok(Self {
            rows,
            columns,
            by_name,
        })
    }

    /// Assembles a block whose first column is the implicit `_time` column.
    pub fn with_timestamps(
        timestamps: Vec<i64>,
        columns: Vec<BlockColumn>,
    ) -> Result<Self, ColumnError> {
        let rows = timestamps.len();
        let mut all = Vec::with_capacity(columns.len() + 1);
        all.push(BlockColumn::time(timestamps));
        all.extend(columns);
        Self::new(rows, all)
    }

    pub fn columns(&self) -> &[BlockColumn] {
        &self.columns
    }
}

impl BlockView for Block {
    fn rows_count(&self) -> usize {
        self.rows
    }

    fn columns_count(&self) -> usize {
        self.columns.len()
    }

    fn column_at(&self, idx: usize) -> &dyn ColumnView {
        &self.columns[idx]
    }

    fn column_by_name(&self, name: &str) -> Option<&dyn ColumnView> {
        self.by_name
            .get(name)
            .map(|&idx| &self.columns[idx] as &dyn ColumnView)
    }
}
