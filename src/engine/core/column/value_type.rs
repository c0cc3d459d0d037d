use crate::engine::errors::ColumnError;

/// Encoding of a non-constant column inside a block.
///
/// Every stats function dispatches over this enum with an exhaustive `match`, so a new
/// encoding cannot be added without deciding how each function handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueType {
    String = 1,
    Dict = 2,
    Uint8 = 3,
    Uint16 = 4,
    Uint32 = 5,
    Uint64 = 6,
    Int64 = 7,
    Float64 = 8,
    Ipv4 = 9,
    TimestampIso8601 = 10,
}

impl ValueType {
    /// True for encodings stored as raw 64-bit words with precomputed min/max.
    pub fn is_fixed_width(self) -> bool {
        !matches!(self, ValueType::String | ValueType::Dict)
    }

    /// Largest raw word a column of this type may hold.
    pub fn max_raw(self) -> u64 {
        match self {
            ValueType::Uint8 => u8::MAX as u64,
            ValueType::Uint16 => u16::MAX as u64,
            ValueType::Uint32 | ValueType::Ipv4 => u32::MAX as u64,
            ValueType::String
            | ValueType::Dict
            | ValueType::Uint64
            | ValueType::Int64
            | ValueType::Float64
            | ValueType::TimestampIso8601 => u64::MAX,
        }
    }
}

impl TryFrom<u8> for ValueType {
    type Error = ColumnError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        let vt = match tag {
            1 => ValueType::String,
            2 => ValueType::Dict,
            3 => ValueType::Uint8,
            4 => ValueType::Uint16,
            5 => ValueType::Uint32,
            6 => ValueType::Uint64,
            7 => ValueType::Int64,
            8 => ValueType::Float64,
            9 => ValueType::Ipv4,
            10 => ValueType::TimestampIso8601,
            other => return Err(ColumnError::UnknownValueType(other)),
        };
        Ok(vt)
    }
}
