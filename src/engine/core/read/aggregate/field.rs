use indexmap::IndexSet;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Owned `name=value` pair copied out of a block row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Bytes retained by this field.
    #[inline]
    pub fn size(&self) -> usize {
        self.name.len() + self.value.len()
    }
}

/// Serializes a field list as a JSON object, preserving order and duplicate names.
pub struct FieldsObject<'a>(pub &'a [Field]);

impl Serialize for FieldsObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for f in self.0 {
            map.serialize_entry(&f.name, &f.value)?;
        }
        map.end()
    }
}

/// Appends `fields` to `dst` as a JSON object.
pub fn marshal_fields_to_json(dst: &mut Vec<u8>, fields: &[Field]) -> serde_json::Result<()> {
    serde_json::to_writer(dst, &FieldsObject(fields))
}

/// Set of column names a query needs to read; `*` stands for every column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeededFields {
    fields: IndexSet<String>,
}

impl NeededFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str) {
        if self.contains_all() {
            return;
        }
        if field == "*" {
            self.fields.clear();
        }
        self.fields.insert(field.to_string());
    }

    pub fn add_fields<S: AsRef<str>>(&mut self, fields: &[S]) {
        for f in fields {
            self.add(f.as_ref());
        }
    }

    pub fn contains_all(&self) -> bool {
        self.fields.contains("*")
    }

    pub fn contains(&self, field: &str) -> bool {
        self.contains_all() || self.fields.contains(field)
    }

    /// Explicit names in insertion order, or `["*"]`.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }
}
