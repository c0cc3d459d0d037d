use std::fmt;
use std::mem;

use crate::command::parser::tokenizer::quote_token_if_needed;
use crate::engine::core::column::render;
use crate::engine::core::column::{BlockView, ColumnKind, ValueType};
use crate::engine::core::read::aggregate::field::{Field, NeededFields, marshal_fields_to_json};
use crate::engine::core::read::aggregate::func::{StatsFunc, StatsProcessor};
use crate::engine::core::read::aggregate::order::{self, Extremum};
use crate::engine::errors::StatsError;
use crate::shared::time::TimeParser;

/// `row_min(src[, fields...])` / `row_max(src[, fields...])`: the row holding the
/// smallest (largest) `src` value, projected to `fields` or to all columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelect {
    extremum: Extremum,
    src_field: String,
    // Empty means every column of the winning row.
    fetch_fields: Vec<String>,
}

impl RowSelect {
    pub fn new(extremum: Extremum, src_field: impl Into<String>, fetch_fields: Vec<String>) -> Self {
        let fetch_fields = if fetch_fields.iter().any(|f| f == "*") {
            Vec::new()
        } else {
            fetch_fields
        };
        Self {
            extremum,
            src_field: src_field.into(),
            fetch_fields,
        }
    }

    pub fn row_min(src_field: impl Into<String>, fetch_fields: Vec<String>) -> Self {
        Self::new(Extremum::Min, src_field, fetch_fields)
    }

    pub fn row_max(src_field: impl Into<String>, fetch_fields: Vec<String>) -> Self {
        Self::new(Extremum::Max, src_field, fetch_fields)
    }

    pub fn func_name(&self) -> &'static str {
        match self.extremum {
            Extremum::Min => "row_min",
            Extremum::Max => "row_max",
        }
    }

    pub fn extremum(&self) -> Extremum {
        self.extremum
    }

    pub fn src_field(&self) -> &str {
        &self.src_field
    }

    pub fn fetch_fields(&self) -> &[String] {
        &self.fetch_fields
    }
}

impl fmt::Display for RowSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}",
            self.func_name(),
            quote_token_if_needed(&self.src_field)
        )?;
        for name in &self.fetch_fields {
            write!(f, ", {}", quote_token_if_needed(name))?;
        }
        f.write_str(")")
    }
}

impl StatsFunc for RowSelect {
    type Processor = RowSelectProcessor;

    fn update_needed_fields(&self, needed: &mut NeededFields) {
        if self.fetch_fields.is_empty() {
            needed.add("*");
        } else {
            needed.add_fields(&self.fetch_fields);
        }
        needed.add(&self.src_field);
    }
}

/// Per-group state of a [`RowSelect`]: the best value seen so far and the projected
/// row it came from. An empty `value` means no row has qualified yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSelectProcessor {
    value: String,
    fields: Vec<Field>,
}

impl RowSelectProcessor {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Empty values never qualify, even against an empty state.
    #[inline]
    fn need_update(&self, func: &RowSelect, v: &str) -> bool {
        if v.is_empty() {
            return false;
        }
        self.value.is_empty() || func.extremum.is_better(v, &self.value)
    }

    fn update_state(
        &mut self,
        func: &RowSelect,
        v: &str,
        block: &dyn BlockView,
        row_idx: usize,
    ) -> isize {
        if !self.need_update(func, v) {
            return 0;
        }

        let mut delta = v.len() as isize - self.value.len() as isize;
        self.value.clear();
        self.value.push_str(v);

        for f in &self.fields {
            delta -= f.size() as isize;
        }
        self.fields.clear();

        if func.fetch_fields.is_empty() {
            for idx in 0..block.columns_count() {
                let c = block.column_at(idx);
                let f = Field::new(c.name(), c.value_at_row(row_idx));
                delta += f.size() as isize;
                self.fields.push(f);
            }
        } else {
            for name in &func.fetch_fields {
                let value = block
                    .column_by_name(name)
                    .map(|c| c.value_at_row(row_idx).into_owned())
                    .unwrap_or_default();
                let f = Field::new(name.as_str(), value);
                delta += f.size() as isize;
                self.fields.push(f);
            }
        }

        delta
    }

    fn update_from_timestamps(
        &mut self,
        func: &RowSelect,
        timestamps: &[i64],
        block: &dyn BlockView,
    ) -> isize {
        let Some((row_idx, ts)) = extreme_timestamp(timestamps, func.extremum) else {
            return 0;
        };
        if let Some(current) = self.current_is_row_timestamp() {
            let can_win = match func.extremum {
                Extremum::Min => ts < current,
                Extremum::Max => ts > current,
            };
            if !can_win {
                return 0;
            }
        }

        let mut buf = String::with_capacity(30);
        render::write_row_timestamp(&mut buf, ts);
        self.update_state(func, &buf, block, row_idx)
    }

    /// Tests whether the column's precomputed extremes could beat the current state.
    ///
    /// A `false` answer must imply that no row of the column can win, so the test is only
    /// trusted where rendered values order monotonically against the current value.
    fn extreme_can_win(&self, func: &RowSelect, value_type: ValueType, min: u64, max: u64) -> bool {
        let raw = match func.extremum {
            Extremum::Min => min,
            Extremum::Max => max,
        };
        let mut buf = String::new();
        match value_type {
            // Digit-only text orders numerically against any value.
            ValueType::Uint8 | ValueType::Uint16 | ValueType::Uint32 | ValueType::Uint64 => {
                render::write_uint64(&mut buf, raw)
            }
            // Signs and fractions only order monotonically against numbers.
            ValueType::Int64 => {
                if !order::is_numeric(&self.value) {
                    return true;
                }
                render::write_int64(&mut buf, raw as i64)
            }
            // `inf` and `-inf` render as words and sort as text, so either one anywhere in
            // the column breaks the numeric bound.
            ValueType::Float64 => {
                let (lo, hi) = (f64::from_bits(min), f64::from_bits(max));
                if !lo.is_finite() || !hi.is_finite() || !order::is_numeric(&self.value) {
                    return true;
                }
                render::write_float64(&mut buf, f64::from_bits(raw))
            }
            // Dotted quads and fixed-width timestamps never parse as numbers; their natural
            // order matches the numeric order of the raw words.
            ValueType::Ipv4 => render::write_ipv4(&mut buf, raw as u32),
            ValueType::TimestampIso8601 => render::write_timestamp_iso8601(&mut buf, raw as i64),
            ValueType::String | ValueType::Dict => return true,
        }
        self.need_update(func, &buf)
    }

    /// True when the current value is a `_time` rendering, so it can be compared as
    /// nanoseconds instead of as text.
    fn current_is_row_timestamp(&self) -> Option<i64> {
        let ts = TimeParser::parse_rfc3339_nanos(&self.value)?;
        let mut buf = String::with_capacity(self.value.len());
        render::write_row_timestamp(&mut buf, ts);
        (buf == self.value).then_some(ts)
    }
}

/// First row holding the smallest (largest) timestamp.
fn extreme_timestamp(timestamps: &[i64], extremum: Extremum) -> Option<(usize, i64)> {
    let mut best: Option<(usize, i64)> = None;
    for (idx, &ts) in timestamps.iter().enumerate() {
        let better = match (best, extremum) {
            (None, _) => true,
            (Some((_, b)), Extremum::Min) => ts < b,
            (Some((_, b)), Extremum::Max) => ts > b,
        };
        if better {
            best = Some((idx, ts));
        }
    }
    best
}

impl StatsProcessor for RowSelectProcessor {
    type Func = RowSelect;

    fn update_stats_for_all_rows(&mut self, func: &RowSelect, block: &dyn BlockView) -> isize {
        if block.rows_count() == 0 {
            return 0;
        }
        // A missing column renders as empty text on every row.
        let Some(c) = block.column_by_name(&func.src_field) else {
            return 0;
        };

        let need_update_state = match c.kind() {
            ColumnKind::Const(v) => return self.update_state(func, v, block, 0),
            ColumnKind::Time(timestamps) => {
                if self.value.is_empty() || self.current_is_row_timestamp().is_some() {
                    return self.update_from_timestamps(func, timestamps, block);
                }
                // Current value came from elsewhere; only a textual scan is exact.
                true
            }
            ColumnKind::Values {
                value_type,
                min,
                max,
            } => {
                match value_type {
                    ValueType::String => true,
                    ValueType::Dict => {
                        let mut need = false;
                        c.for_each_dict_value(&mut |v| {
                            if !need && self.need_update(func, v) {
                                need = true;
                            }
                        });
                        need
                    }
                    ValueType::Uint8
                    | ValueType::Uint16
                    | ValueType::Uint32
                    | ValueType::Uint64
                    | ValueType::Int64
                    | ValueType::Float64
                    | ValueType::Ipv4
                    | ValueType::TimestampIso8601 => {
                        self.extreme_can_win(func, value_type, min, max)
                    }
                }
            }
        };

        if !need_update_state {
            return 0;
        }
        let mut delta = 0;
        c.for_each_value(&mut |row_idx, v| {
            delta += self.update_state(func, v, block, row_idx);
        });
        delta
    }

    fn update_stats_for_row(
        &mut self,
        func: &RowSelect,
        block: &dyn BlockView,
        row_idx: usize,
    ) -> isize {
        let Some(c) = block.column_by_name(&func.src_field) else {
            return 0;
        };
        match c.kind() {
            ColumnKind::Const(v) => self.update_state(func, v, block, row_idx),
            ColumnKind::Time(timestamps) => {
                let mut buf = String::with_capacity(30);
                render::write_row_timestamp(&mut buf, timestamps[row_idx]);
                self.update_state(func, &buf, block, row_idx)
            }
            ColumnKind::Values { .. } => {
                let v = c.value_at_row(row_idx);
                self.update_state(func, &v, block, row_idx)
            }
        }
    }

    fn merge_state(&mut self, func: &RowSelect, other: &mut Self) -> isize {
        if !self.need_update(func, &other.value) {
            return 0;
        }
        let before = self.state_size() as isize;
        self.value = mem::take(&mut other.value);
        self.fields = mem::take(&mut other.fields);
        self.state_size() as isize - before
    }

    fn finalize_stats(&self, _func: &RowSelect, dst: &mut Vec<u8>) -> Result<(), StatsError> {
        marshal_fields_to_json(dst, &self.fields)?;
        Ok(())
    }

    fn state_size(&self) -> usize {
        self.value.len() + self.fields.iter().map(Field::size).sum::<usize>()
    }
}
