//! Canonical text renderings of fixed-width column values.
//!
//! Stats functions compare and retain values as text, so every encoding must render
//! to exactly the text the row would have had before it was encoded.

use std::fmt::Write;
use std::net::Ipv4Addr;

use crate::shared::time;

pub fn write_uint64(buf: &mut String, v: u64) {
    let mut b = itoa::Buffer::new();
    buf.push_str(b.format(v));
}

pub fn write_int64(buf: &mut String, v: i64) {
    let mut b = itoa::Buffer::new();
    buf.push_str(b.format(v));
}

/// Shortest decimal that round-trips, never in exponent form (`1e21` renders in full).
pub fn write_float64(buf: &mut String, v: f64) {
    let _ = write!(buf, "{}", v);
}

pub fn write_ipv4(buf: &mut String, v: u32) {
    let _ = write!(buf, "{}", Ipv4Addr::from(v));
}

pub fn write_timestamp_iso8601(buf: &mut String, nanos: i64) {
    time::write_iso8601(buf, nanos);
}

/// Renders the implicit `_time` column value.
pub fn write_row_timestamp(buf: &mut String, nanos: i64) {
    time::write_rfc3339_nano(buf, nanos);
}
