use std::borrow::Cow;
use std::cell::Cell;

use crate::engine::core::column::{Block, BlockColumn, BlockView, ColumnKind, ColumnView};

/// Column double that counts how the stats code touches the underlying data.
pub struct CountingColumn<'a> {
    inner: &'a BlockColumn,
    pub row_reads: Cell<usize>,
    pub full_scans: Cell<usize>,
    pub dict_scans: Cell<usize>,
}

impl ColumnView for CountingColumn<'_> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn kind(&self) -> ColumnKind<'_> {
        self.inner.kind()
    }

    fn value_at_row(&self, row_idx: usize) -> Cow<'_, str> {
        self.row_reads.set(self.row_reads.get() + 1);
        self.inner.value_at_row(row_idx)
    }

    fn for_each_value(&self, f: &mut dyn FnMut(usize, &str)) {
        self.full_scans.set(self.full_scans.get() + 1);
        self.inner.for_each_value(f)
    }

    fn for_each_dict_value(&self, f: &mut dyn FnMut(&str)) {
        self.dict_scans.set(self.dict_scans.get() + 1);
        self.inner.for_each_dict_value(f)
    }
}

/// Block double wrapping every column of a `Block` in a [`CountingColumn`].
pub struct CountingBlock<'a> {
    block: &'a Block,
    columns: Vec<CountingColumn<'a>>,
}

impl<'a> CountingBlock<'a> {
    pub fn new(block: &'a Block) -> Self {
        let columns = block
            .columns()
            .iter()
            .map(|inner| CountingColumn {
                inner,
                row_reads: Cell::new(0),
                full_scans: Cell::new(0),
                dict_scans: Cell::new(0),
            })
            .collect();
        Self { block, columns }
    }

    pub fn column(&self, name: &str) -> &CountingColumn<'a> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .expect("column exists")
    }
}

impl BlockView for CountingBlock<'_> {
    fn rows_count(&self) -> usize {
        self.block.rows_count()
    }

    fn columns_count(&self) -> usize {
        self.columns.len()
    }

    fn column_at(&self, idx: usize) -> &dyn ColumnView {
        &self.columns[idx]
    }

    fn column_by_name(&self, name: &str) -> Option<&dyn ColumnView> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c as &dyn ColumnView)
    }
}
