use crate::engine::core::column::render::{
    write_float64, write_int64, write_ipv4, write_row_timestamp, write_timestamp_iso8601,
    write_uint64,
};

fn render(f: impl FnOnce(&mut String)) -> String {
    let mut s = String::new();
    f(&mut s);
    s
}

#[test]
fn integers_render_as_plain_decimal() {
    assert_eq!(render(|b| write_uint64(b, 0)), "0");
    assert_eq!(render(|b| write_uint64(b, u64::MAX)), "18446744073709551615");
    assert_eq!(render(|b| write_int64(b, -42)), "-42");
}

#[test]
fn floats_render_shortest_without_exponent() {
    assert_eq!(render(|b| write_float64(b, 1.0)), "1");
    assert_eq!(render(|b| write_float64(b, 0.1)), "0.1");
    assert_eq!(render(|b| write_float64(b, -2.5)), "-2.5");
    assert_eq!(render(|b| write_float64(b, 1e21)), "1000000000000000000000");
}

#[test]
fn ipv4_renders_dotted_quad() {
    assert_eq!(render(|b| write_ipv4(b, 0x0A00_0001)), "10.0.0.1");
}

#[test]
fn timestamps_render_in_their_fixed_formats() {
    let ts = 1_714_557_600_123_456_789;
    assert_eq!(
        render(|b| write_timestamp_iso8601(b, ts)),
        "2024-05-01T10:00:00.123Z"
    );
    assert_eq!(
        render(|b| write_row_timestamp(b, ts)),
        "2024-05-01T10:00:00.123456789Z"
    );
}

#[test]
fn writers_append_to_existing_text() {
    let mut s = String::from("x=");
    write_uint64(&mut s, 7);
    assert_eq!(s, "x=7");
}
