//! Numeric-aware ordering of textual values.
//!
//! Values in a log block are text, but most of them are numbers, IP addresses or
//! timestamps. `less_string` orders them so that `"9" < "10"`, `"-3" < "2.5"` and
//! `"9.1.1.1" < "10.0.0.1"`.

use std::cmp::Ordering;

/// Which end of the value order a row-selecting function keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extremum {
    Min,
    Max,
}

impl Extremum {
    /// True when `candidate` strictly beats `current`.
    #[inline]
    pub fn is_better(self, candidate: &str, current: &str) -> bool {
        match self {
            Extremum::Min => less_string(candidate, current),
            Extremum::Max => less_string(current, candidate),
        }
    }
}

/// Strict "less than" over textual values.
///
/// Tries, in order: both sides as `u64`, both as `i64`, both as finite decimals, then
/// natural order. Numerically equal values with different text (`"007"`, `"7"`) are
/// neither less nor greater.
///
/// Each pair picks its comparison independently, so the relation is not transitive
/// across values that mix numbers and text: `"1.10" < "1.5" < "1.5a" < "1.10"`.
pub fn less_string(a: &str, b: &str) -> bool {
    if a == b {
        return false;
    }
    if let (Ok(x), Ok(y)) = (a.parse::<u64>(), b.parse::<u64>()) {
        return x < y;
    }
    if let (Some(x), Some(y)) = (parse_i64(a), parse_i64(b)) {
        return x < y;
    }
    if let (Some(x), Some(y)) = (parse_number(a), parse_number(b)) {
        return x < y;
    }
    less_natural(a, b)
}

/// True when `s` takes one of the numeric paths of [`less_string`].
pub fn is_numeric(s: &str) -> bool {
    s.parse::<u64>().is_ok() || parse_i64(s).is_some() || parse_number(s).is_some()
}

fn parse_i64(s: &str) -> Option<i64> {
    if s.starts_with('+') {
        return None;
    }
    s.parse().ok()
}

/// Parses plain decimal notation only; `"inf"`, `"NaN"` and friends stay text.
fn parse_number(s: &str) -> Option<f64> {
    let first = s.chars().next()?;
    if !(first.is_ascii_digit() || first == '-' || first == '+' || first == '.') {
        return None;
    }
    let f: f64 = s.parse().ok()?;
    f.is_finite().then_some(f)
}

/// Natural order: digit runs compare as numbers, everything else bytewise.
pub fn less_natural(a: &str, b: &str) -> bool {
    natural_cmp(a.as_bytes(), b.as_bytes()) == Ordering::Less
}

fn natural_cmp(mut a: &[u8], mut b: &[u8]) -> Ordering {
    loop {
        let (pa, ra) = split_run(a, false);
        let (pb, rb) = split_run(b, false);
        if pa != pb {
            return pa.cmp(pb);
        }
        let (da, ra) = split_run(ra, true);
        let (db, rb) = split_run(rb, true);
        if da.is_empty() || db.is_empty() {
            // At most one side continues with digits; the other ended or has text.
            return da.cmp(db).then_with(|| ra.cmp(rb));
        }
        if da != db {
            return match (parse_digits(da), parse_digits(db)) {
                (Some(x), Some(y)) if x != y => x.cmp(&y),
                _ => da.cmp(db),
            };
        }
        if ra.is_empty() || rb.is_empty() {
            return ra.len().cmp(&rb.len());
        }
        a = ra;
        b = rb;
    }
}

fn split_run(s: &[u8], digits: bool) -> (&[u8], &[u8]) {
    let n = s
        .iter()
        .position(|c| c.is_ascii_digit() != digits)
        .unwrap_or(s.len());
    s.split_at(n)
}

fn parse_digits(d: &[u8]) -> Option<u64> {
    std::str::from_utf8(d).ok()?.parse().ok()
}
