use crate::engine::core::column::ValueType;
use crate::engine::errors::ColumnError;

#[test]
fn known_tags_decode() {
    for tag in 1u8..=10 {
        let vt = ValueType::try_from(tag).expect("known tag");
        assert_eq!(vt as u8, tag);
    }
}

#[test]
fn unknown_tags_are_rejected() {
    assert_eq!(
        ValueType::try_from(0),
        Err(ColumnError::UnknownValueType(0))
    );
    assert_eq!(
        ValueType::try_from(42),
        Err(ColumnError::UnknownValueType(42))
    );
}

#[test]
fn fixed_width_flags() {
    assert!(!ValueType::String.is_fixed_width());
    assert!(!ValueType::Dict.is_fixed_width());
    assert!(ValueType::Uint8.is_fixed_width());
    assert!(ValueType::Ipv4.is_fixed_width());
    assert!(ValueType::TimestampIso8601.is_fixed_width());
    assert_eq!(ValueType::Uint16.max_raw(), 65535);
    assert_eq!(ValueType::Ipv4.max_raw(), u32::MAX as u64);
}
