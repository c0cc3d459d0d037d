use std::borrow::Cow;

use crate::engine::core::column::ValueType;

/// Name of the implicit per-row timestamp column.
pub const TIME_FIELD: &str = "_time";

/// Shape of a column as seen by stats functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnKind<'a> {
    /// Same value on every row of the block.
    Const(&'a str),
    /// The implicit row timestamp column, in nanoseconds.
    Time(&'a [i64]),
    /// Encoded values. `min`/`max` are raw words of the precomputed column extremes and
    /// are only meaningful when `value_type.is_fixed_width()`.
    Values {
        value_type: ValueType,
        min: u64,
        max: u64,
    },
}

/// Read-only view over one column of a block.
///
/// Views borrow block storage; anything a caller keeps past the current call must be copied.
pub trait ColumnView {
    fn name(&self) -> &str;

    fn kind(&self) -> ColumnKind<'_>;

    /// Renders the value at `row_idx`.
    fn value_at_row(&self, row_idx: usize) -> Cow<'_, str>;

    /// Calls `f(row_idx, value)` for every row in order.
    fn for_each_value(&self, f: &mut dyn FnMut(usize, &str));

    /// Calls `f` once per distinct dictionary entry. No-op for non-dictionary columns.
    fn for_each_dict_value(&self, f: &mut dyn FnMut(&str));
}

/// Read-only view over a block of rows in columnar form.
pub trait BlockView {
    fn rows_count(&self) -> usize;

    fn columns_count(&self) -> usize;

    fn column_at(&self, idx: usize) -> &dyn ColumnView;

    fn column_by_name(&self, name: &str) -> Option<&dyn ColumnView>;
}
