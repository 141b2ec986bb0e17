//! Display formatting for decoded entry values.
//!
//! Formatting never fails: every value has a plain rendering to fall back on.
//!
//! - ASCII: the text, minus one trailing NUL.
//! - Integers and floats: decimal, lists joined by `", "`.
//! - Rationals: `numerator/denominator`, lists joined by `", "`.
//! - GPS coordinates (three rationals): `"D, M, S"` with degrees and minutes
//!   as whole numbers right-aligned to width 2, so single-digit components
//!   produce a double space after the comma (`"131,  0, 55.2063"`).
//! - Undefined and unknown types: standard base64 of the raw bytes.

use std::fmt::Display;

use base64::{engine::general_purpose, Engine as _};

use crate::format::tiff::{Rational, SRational, Value};

/// Tags holding a degrees/minutes/seconds triplet.
const GPS_COORDINATE_TAGS: [&str; 4] = [
    "GPSLatitude",
    "GPSLongitude",
    "GPSDestLatitude",
    "GPSDestLongitude",
];

/// Render a decoded value for the tag mapping.
pub fn format_value(name: &str, value: &Value) -> String {
    match value {
        Value::Ascii(bytes) => format_ascii(bytes),
        Value::Rational(parts) if parts.len() == 3 && is_gps_coordinate(name) => {
            format_coordinate(parts)
        }
        Value::Rational(values) => join_with(values, format_rational),
        Value::SRational(values) => join_with(values, format_srational),
        Value::Byte(values) => join(values),
        Value::Short(values) => join(values),
        Value::Long(values) => join(values),
        Value::SByte(values) => join(values),
        Value::SShort(values) => join(values),
        Value::SLong(values) => join(values),
        Value::Float(values) => join(values),
        Value::Double(values) => join(values),
        Value::Undefined(data) | Value::Unknown { data, .. } => general_purpose::STANDARD.encode(data),
    }
}

fn is_gps_coordinate(name: &str) -> bool {
    GPS_COORDINATE_TAGS.contains(&name)
}

fn format_ascii(bytes: &[u8]) -> String {
    let text = bytes.strip_suffix(b"\0").unwrap_or(bytes);
    String::from_utf8_lossy(text).into_owned()
}

fn format_rational(r: &Rational) -> String {
    format!("{}/{}", r.numerator, r.denominator)
}

fn format_srational(r: &SRational) -> String {
    format!("{}/{}", r.numerator, r.denominator)
}

/// Degrees and minutes as whole numbers, seconds with every decimal the
/// quotient carries. A zero denominator renders the bare numerator.
fn format_coordinate(parts: &[Rational]) -> String {
    let whole = |r: &Rational| match r.denominator {
        0 => r.numerator,
        d => r.numerator / d,
    };
    let seconds = match parts[2].denominator {
        0 => parts[2].numerator as f64,
        d => parts[2].numerator as f64 / d as f64,
    };

    format!(
        "{:>2}, {:>2}, {:>2}",
        whole(&parts[0]),
        whole(&parts[1]),
        seconds
    )
}

fn join<T: Display>(values: &[T]) -> String {
    join_with(values, ToString::to_string)
}

fn join_with<T>(values: &[T], render: impl Fn(&T) -> String) -> String {
    values.iter().map(render).collect::<Vec<_>>().join(", ")
}

// =============================================================================
// Tests
// =============================================================================
