//! Order-preserving binary key codec used by KV tables (spec.md §4.5).
//!
//! Unlike the composite serializers in [`crate::abi`], the encodings here are
//! chosen so that unsigned lexicographic comparison of the resulting byte
//! strings matches the semantic ordering of the encoded values. This is what
//! the underlying key-value store sorts rows by, so the primary- and
//! secondary-index lookups need keys built this way rather than via the
//! regular wire codec.

use crate::abi::error::{ABIError, BadDataSnafu};
use crate::abi::ABI;
use crate::types::Name;

type Result<T, E = ABIError> = core::result::Result<T, E>;

/// Builds an order-preserving composite key by appending element encodings
/// in declaration order. Tuples concatenate with no length prefix, so the
/// key is only unambiguous as long as callers agree on the field order and
/// widths of the tuple being encoded — which is exactly what a KV table's
/// declared index gives them.
#[derive(Default, Clone, Debug)]
pub struct KvKeyBuilder(Vec<u8>);

macro_rules! push_unsigned {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, v: $ty) -> Self {
            self.0.extend_from_slice(&v.to_be_bytes());
            self
        }
    };
}

macro_rules! push_signed {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, v: $ty) -> Self {
            let mut bytes = v.to_be_bytes();
            bytes[0] ^= 0x80;
            self.0.extend_from_slice(&bytes);
            self
        }
    };
}

impl KvKeyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_u8(mut self, v: u8) -> Self {
        self.0.push(v);
        self
    }

    push_unsigned!(push_u16, u16);
    push_unsigned!(push_u32, u32);
    push_unsigned!(push_u64, u64);
    push_unsigned!(push_u128, u128);

    pub fn push_i8(mut self, v: i8) -> Self {
        self.0.push((v as u8) ^ 0x80);
        self
    }

    push_signed!(push_i16, i16);
    push_signed!(push_i32, i32);
    push_signed!(push_i64, i64);
    push_signed!(push_i128, i128);

    pub fn push_name(mut self, n: Name) -> Self {
        self.0.extend_from_slice(&n.as_u64().to_be_bytes());
        self
    }

    pub fn push_str(mut self, s: &str) -> Self {
        for b in s.as_bytes() {
            self.0.push(*b);
            if *b == 0x00 {
                self.0.push(0x01);
            }
        }
        self.0.push(0x00);
        self.0.push(0x00);
        self
    }

    pub fn push_f32(mut self, v: f32) -> Self {
        self.0.extend_from_slice(&encode_f32(v));
        self
    }

    pub fn push_f64(mut self, v: f64) -> Self {
        self.0.extend_from_slice(&encode_f64(v));
        self
    }

    pub fn push_bytes(mut self, raw: &[u8]) -> Self {
        self.0.extend_from_slice(raw);
        self
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

fn encode_f32(v: f32) -> [u8; 4] {
    let bits = v.to_bits();
    let flipped = if v.is_sign_negative() { !bits } else { bits | (1 << 31) };
    flipped.to_be_bytes()
}

fn encode_f64(v: f64) -> [u8; 8] {
    let bits = v.to_bits();
    let flipped = if v.is_sign_negative() { !bits } else { bits | (1 << 63) };
    flipped.to_be_bytes()
}

/// Reads the `(u8 table_code, name table, name index)` prefix shared by
/// every KV key, then looks up the row type and declared primary index for
/// `table` in the given ABI.
///
/// Returns the empty string when `index` is not the declared primary index
/// of `table` — this is the "not a primary key" signal used by callers that
/// scan over both primary and secondary index entries.
pub fn kv_table_primary_index_to_json(abi: &ABI, key_bytes: &[u8], value_bytes: &[u8]) -> Result<String> {
    ensure_len(key_bytes, 17)?;

    let _table_code = key_bytes[0];
    let table = Name::from_u64(u64::from_be_bytes(key_bytes[1..9].try_into().unwrap()));
    let index = Name::from_u64(u64::from_be_bytes(key_bytes[9..17].try_into().unwrap()));

    let row_type = abi.type_for_kv_table(table).ok_or_else(|| {
        BadDataSnafu { message: format!("no KV table named \"{table}\"") }.build()
    })?;

    let primary_index_name = abi.kv_table_primary_key_name(table).ok_or_else(|| {
        BadDataSnafu { message: format!("KV table \"{table}\" has no declared primary index") }.build()
    })?;

    if index.to_string() != primary_index_name {
        return Ok(String::new());
    }

    abi.bin_to_json(row_type, value_bytes)
}

fn ensure_len(bytes: &[u8], n: usize) -> Result<()> {
    if bytes.len() < n {
        return BadDataSnafu {
            message: format!("KV key is too short: expected at least {n} bytes, got {}", bytes.len()),
        }.fail();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Name;
    use crate::{ABISerializable, ByteStream};

    fn encode_row(name_field: &str, note_field: &str) -> Vec<u8> {
        let mut stream = ByteStream::new();
        Name::new(name_field).unwrap().to_bin(&mut stream);
        note_field.to_string().to_bin(&mut stream);
        stream.into_bytes()
    }

    fn test_abi() -> ABI {
        ABI::from_str(r#"{
            "version": "eosio::abi/1.2",
            "types": [],
            "structs": [
                {
                    "name": "my_struct",
                    "base": "",
                    "fields": [
                        {"name": "primary_key", "type": "name"},
                        {"name": "note", "type": "string"}
                    ]
                }
            ],
            "actions": [],
            "tables": [],
            "kv_tables": {
                "testtable": {
                    "type": "my_struct",
                    "primary_index": {"name": "primary", "type": "name"},
                    "secondary_indices": {}
                }
            }
        }"#).unwrap()
    }

    #[test]
    fn encodes_unsigned_ints_in_order() {
        let a = KvKeyBuilder::new().push_u32(1).into_bytes();
        let b = KvKeyBuilder::new().push_u32(2).into_bytes();
        assert!(a < b);
    }

    #[test]
    fn encodes_signed_ints_in_order() {
        let neg = KvKeyBuilder::new().push_i32(-1).into_bytes();
        let zero = KvKeyBuilder::new().push_i32(0).into_bytes();
        let pos = KvKeyBuilder::new().push_i32(1).into_bytes();
        assert!(neg < zero);
        assert!(zero < pos);
    }

    #[test]
    fn encodes_floats_in_order() {
        let neg = KvKeyBuilder::new().push_f64(-1.5).into_bytes();
        let zero = KvKeyBuilder::new().push_f64(0.0).into_bytes();
        let pos = KvKeyBuilder::new().push_f64(1.5).into_bytes();
        assert!(neg < zero);
        assert!(zero < pos);
    }

    #[test]
    fn encodes_strings_with_doubled_nul() {
        let a = KvKeyBuilder::new().push_str("ab").into_bytes();
        assert_eq!(a, vec![b'a', b'b', 0x00, 0x00]);

        let with_nul = KvKeyBuilder::new().push_str("a\0b").into_bytes();
        assert_eq!(with_nul, vec![b'a', 0x00, 0x01, b'b', 0x00, 0x00]);
    }

    #[test]
    fn primary_index_round_trips() {
        let abi = test_abi();
        let key = KvKeyBuilder::new()
            .push_u8(1)
            .push_name(Name::new("testtable").unwrap())
            .push_name(Name::new("primary").unwrap())
            .push_str("test")
            .into_bytes();
        let value = encode_row("taurus", "note");

        let json = kv_table_primary_index_to_json(&abi, &key, &value).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["primary_key"], "taurus");
        assert_eq!(parsed["note"], "note");
    }

    #[test]
    fn non_primary_index_returns_empty_string() {
        let abi = test_abi();
        let key = KvKeyBuilder::new()
            .push_u8(1)
            .push_name(Name::new("testtable").unwrap())
            .push_name(Name::new("note").unwrap())
            .push_str("test")
            .into_bytes();
        let value = encode_row("taurus", "note");

        let json = kv_table_primary_index_to_json(&abi, &key, &value).unwrap();
        assert_eq!(json, "");
    }
}
