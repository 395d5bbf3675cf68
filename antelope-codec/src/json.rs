//! JSON emission tuned for the Antelope wire conventions (spec.md §2.4).
//!
//! `serde_json`'s default formatter is used everywhere a `JsonValue` is
//! produced by walking the ABI type graph (see [`crate::abi::ABI`]); this
//! module only matters for callers that serialize native Rust types
//! directly via `#[derive(serde::Serialize)]` and still want the same
//! large-integer and float rendering rules.

use std::io;

use serde::Serialize;

use serde_json::Result;
use serde_json::ser::{Formatter, CompactFormatter, Serializer};

pub struct EOSFormatter {
    base: CompactFormatter,
}

/// JSON formatter with the following differences to `serde_json`'s default:
///  - `u128` and `i128` are rendered as strings (double-quoted) to avoid
///    precision loss, matching the `i64`/`u64` JSON shape in spec.md §4.2
///  - `f32` and `f64` never use scientific notation, and floats with a
///    fractional part never get a trailing `.0`
impl EOSFormatter {
    fn new() -> Self {
        EOSFormatter { base: CompactFormatter {} }
    }
}

impl Formatter for EOSFormatter {
    #[inline]
    fn write_u128<W>(&mut self, writer: &mut W, value: u128) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\"")?;
        self.base.write_u128(writer, value)?;
        writer.write_all(b"\"")
    }

    #[inline]
    fn write_i128<W>(&mut self, writer: &mut W, value: i128) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b"\"")?;
        self.base.write_i128(writer, value)?;
        writer.write_all(b"\"")
    }

    #[inline]
    fn write_f32<W>(&mut self, writer: &mut W, value: f32) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        write!(writer, "{}", value)
    }

    #[inline]
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        write!(writer, "{}", value)
    }
}

pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let fmt = EOSFormatter::new();
    let mut vec = Vec::with_capacity(128);
    let mut ser = Serializer::with_formatter(&mut vec, fmt);
    value.serialize(&mut ser)?;
    let string = unsafe {
        // EOSFormatter never emits invalid UTF-8.
        String::from_utf8_unchecked(vec)
    };
    Ok(string)
}

pub use serde_json::from_str;


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn large_ints_are_quoted() {
        let v = json!({"n": 18446744073709551615u128});
        assert_eq!(to_string(&v).unwrap(), r#"{"n":"18446744073709551615"}"#);
    }

    #[test]
    fn floats_avoid_scientific_notation() {
        let v = json!(1.0e10_f64);
        assert_eq!(to_string(&v).unwrap(), "10000000000");
    }
}
