use std::hash::{BuildHasher, Hash, Hasher};

use ahash::RandomState as AHashRandomState;

use crate::engine::core::column::{BlockView, ColumnKind};

/// By-field values of one group.
#[derive(Clone, Debug, Eq)]
pub struct GroupKey {
    // Precomputed 64-bit hash to speed up HashMap lookups
    pub(crate) prehash: u64,
    pub(crate) values: Vec<String>,
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        // prehash is a cache; equality must be defined by the actual key fields
        self.values == other.values
    }
}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.prehash.hash(state);
    }
}

impl GroupKey {
    pub fn new(values: Vec<String>) -> Self {
        let prehash = Self::compute_prehash(&values);
        Self { prehash, values }
    }

    /// Key of the group holding every row of a block without by-fields.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Missing by-columns contribute an empty value.
    pub fn from_row(by: &[String], block: &dyn BlockView, row_idx: usize) -> Self {
        let values = by
            .iter()
            .map(|name| {
                block
                    .column_by_name(name)
                    .map(|c| c.value_at_row(row_idx).into_owned())
                    .unwrap_or_default()
            })
            .collect();
        Self::new(values)
    }

    /// Key shared by every row of `block`, when all by-columns are constant or missing.
    pub fn from_const_block(by: &[String], block: &dyn BlockView) -> Option<Self> {
        let mut values = Vec::with_capacity(by.len());
        for name in by {
            match block.column_by_name(name) {
                None => values.push(String::new()),
                Some(c) => match c.kind() {
                    ColumnKind::Const(v) => values.push(v.to_string()),
                    ColumnKind::Time(_) | ColumnKind::Values { .. } => return None,
                },
            }
        }
        Some(Self::new(values))
    }

    /// Compares against a row without allocating.
    pub fn matches_row(&self, by: &[String], block: &dyn BlockView, row_idx: usize) -> bool {
        by.iter().zip(&self.values).all(|(name, expected)| {
            match block.column_by_name(name) {
                Some(c) => c.value_at_row(row_idx).as_ref() == expected.as_str(),
                None => expected.is_empty(),
            }
        })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Bytes retained by the key.
    pub fn size(&self) -> usize {
        self.values.iter().map(String::len).sum::<usize>()
            + self.values.len() * std::mem::size_of::<String>()
    }

    #[inline]
    fn compute_prehash(values: &[String]) -> u64 {
        let mut hasher = AHashRandomState::with_seeds(0, 0, 0, 0).build_hasher();
        for v in values {
            v.hash(&mut hasher);
        }
        hasher.finish()
    }
}
