//! Binary (de)serialization for the native Rust types exposed by this crate.
//!
//! This is the low-level counterpart to the ABI-driven JSON <-> binary
//! conversion found in [`crate::abi::ABI`]: it lets a Rust struct or scalar
//! turn itself into the Antelope wire format without going through a
//! [`JsonValue`](crate::JsonValue) at all. Struct/enum impls are usually
//! generated with the [`ABISerializable`](macro@antelope_codec_macros::ABISerializable)
//! derive macro; this module provides the trait itself plus the impls for
//! every scalar type.

use bytemuck::{cast_ref, pod_read_unaligned};
use hex::FromHexError;
use snafu::{ResultExt, Snafu};

use antelope_codec_macros::with_location;

use crate::{
    impl_auto_error_conversion,
    types::{
        Asset, InvalidAsset, ExtendedAsset,
        Bytes, Checksum160, Checksum256, Checksum512,
        Float128, Name,
        PublicKey, PrivateKey, Signature, KeyType, InvalidCryptoData, UnsupportedKeyTypeSnafu,
        Symbol, SymbolCode, InvalidSymbol,
        TimePoint, TimePointSec, BlockTimestamp,
        VarInt32, VarUint32,
    },
    ByteStream, StreamError,
};

#[with_location]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SerializeError {
    #[snafu(display("stream error"))]
    StreamError { source: StreamError },

    #[snafu(display("invalid asset"))]
    InvalidAsset { source: InvalidAsset },

    #[snafu(display("invalid symbol"))]
    InvalidSymbol { source: InvalidSymbol },

    #[snafu(display("invalid crypto data"))]
    InvalidCryptoData { source: InvalidCryptoData },

    #[snafu(display("cannot decode hex data"))]
    HexDecodeError { source: FromHexError },

    #[snafu(display("cannot decode UTF-8 string from stream"))]
    Utf8Error { source: std::string::FromUtf8Error },

    #[snafu(display("{msg}"))]
    InvalidData { msg: String },  // acts as a generic error type with a given message

    #[snafu(display("invalid tag {tag} for enum {variant}"))]
    InvalidTag { tag: u32, variant: String },
}

impl_auto_error_conversion!(StreamError, SerializeError, StreamSnafu);
impl_auto_error_conversion!(InvalidAsset, SerializeError, InvalidAssetSnafu);
impl_auto_error_conversion!(InvalidSymbol, SerializeError, InvalidSymbolSnafu);
impl_auto_error_conversion!(InvalidCryptoData, SerializeError, InvalidCryptoDataSnafu);
impl_auto_error_conversion!(FromHexError, SerializeError, HexDecodeSnafu);
impl_auto_error_conversion!(std::string::FromUtf8Error, SerializeError, Utf8Snafu);


/// Encode/decode a Rust native type to/from the Antelope binary wire format.
///
/// Implementations for composite types (structs, enums) are usually generated
/// with `#[derive(ABISerializable)]`, which calls [`ABISerializable::to_bin`]/
/// [`ABISerializable::from_bin`] on each member in turn.
pub trait ABISerializable {
    fn to_bin(&self, stream: &mut ByteStream);
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError>
    where
        Self: Sized;
}

/// Serialize a value to its binary representation.
pub fn to_bin<T: ABISerializable>(value: &T) -> Bytes {
    let mut stream = ByteStream::new();
    value.to_bin(&mut stream);
    Bytes(stream.into_bytes())
}

/// Serialize a value to its binary representation, then hex-encode it.
pub fn to_hex<T: ABISerializable>(value: &T) -> String {
    let mut stream = ByteStream::new();
    value.to_bin(&mut stream);
    stream.hex_data()
}

/// Deserialize a value from a byte stream.
pub fn from_bin<T: ABISerializable>(stream: &mut ByteStream) -> Result<T, SerializeError> {
    T::from_bin(stream)
}


// -----------------------------------------------------------------------------
//     Primitive numeric types
// -----------------------------------------------------------------------------

impl ABISerializable for bool {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_byte(u8::from(*self));
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        match stream.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            n => InvalidDataSnafu { msg: format!("cannot parse bool from byte: {n}") }.fail(),
        }
    }
}

macro_rules! impl_abiserializable_for_fixed_width {
    ($typ:ty, $size:expr) => {
        impl ABISerializable for $typ {
            fn to_bin(&self, stream: &mut ByteStream) {
                stream.write_bytes(cast_ref::<$typ, [u8; $size]>(self));
            }
            fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
                Ok(pod_read_unaligned(stream.read_bytes($size)?))
            }
        }
    }
}

impl_abiserializable_for_fixed_width!(i8, 1);
impl_abiserializable_for_fixed_width!(i16, 2);
impl_abiserializable_for_fixed_width!(i32, 4);
impl_abiserializable_for_fixed_width!(i64, 8);
impl_abiserializable_for_fixed_width!(i128, 16);

impl_abiserializable_for_fixed_width!(u16, 2);
impl_abiserializable_for_fixed_width!(u32, 4);
impl_abiserializable_for_fixed_width!(u64, 8);
impl_abiserializable_for_fixed_width!(u128, 16);

impl_abiserializable_for_fixed_width!(f32, 4);
impl_abiserializable_for_fixed_width!(f64, 8);

impl ABISerializable for u8 {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_byte(*self);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(stream.read_byte()?)
    }
}


// -----------------------------------------------------------------------------
//     Variable-length integers
// -----------------------------------------------------------------------------

impl ABISerializable for VarUint32 {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_u32(self.0);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(VarUint32(stream.read_var_u32()?))
    }
}

impl ABISerializable for VarInt32 {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_i32(self.0);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(VarInt32(stream.read_var_i32()?))
    }
}


// -----------------------------------------------------------------------------
//     String / Bytes
// -----------------------------------------------------------------------------

impl ABISerializable for String {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_u32(self.len() as u32);
        stream.write_bytes(self.as_bytes());
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        Ok(String::from_utf8(stream.read_bytes(len)?.to_owned())?)
    }
}

impl ABISerializable for Bytes {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_u32(self.0.len() as u32);
        stream.write_bytes(&self.0);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        Ok(Bytes(stream.read_bytes(len)?.to_owned()))
    }
}

macro_rules! impl_abiserializable_for_checksum {
    ($typ:ty, $size:expr) => {
        impl ABISerializable for $typ {
            fn to_bin(&self, stream: &mut ByteStream) {
                stream.write_bytes(&self.0);
            }
            fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
                let data: [u8; $size] = stream.read_bytes($size)?.try_into()
                    .expect("slice of the requested size always converts");
                Ok(Self(data))
            }
        }
    }
}

impl_abiserializable_for_checksum!(Checksum160, 20);
impl_abiserializable_for_checksum!(Checksum256, 32);
impl_abiserializable_for_checksum!(Checksum512, 64);


// -----------------------------------------------------------------------------
//     Float128
// -----------------------------------------------------------------------------

impl ABISerializable for Float128 {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_bytes(self.to_bin_repr());
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let data: [u8; 16] = stream.read_bytes(16)?.try_into()
            .expect("slice of the requested size always converts");
        Ok(Float128::from_bin_repr(&data))
    }
}


// -----------------------------------------------------------------------------
//     Time types
// -----------------------------------------------------------------------------

impl ABISerializable for TimePoint {
    fn to_bin(&self, stream: &mut ByteStream) {
        i64::from(*self).to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(TimePoint::from(i64::from_bin(stream)?))
    }
}

impl ABISerializable for TimePointSec {
    fn to_bin(&self, stream: &mut ByteStream) {
        u32::from(*self).to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(TimePointSec::from(u32::from_bin(stream)?))
    }
}

impl ABISerializable for BlockTimestamp {
    fn to_bin(&self, stream: &mut ByteStream) {
        u32::from(*self).to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(BlockTimestamp::from(u32::from_bin(stream)?))
    }
}


// -----------------------------------------------------------------------------
//     Name / Symbol / Asset
// -----------------------------------------------------------------------------

impl ABISerializable for Name {
    fn to_bin(&self, stream: &mut ByteStream) {
        self.as_u64().to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Name::from_u64(u64::from_bin(stream)?))
    }
}

impl ABISerializable for SymbolCode {
    fn to_bin(&self, stream: &mut ByteStream) {
        self.as_u64().to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(SymbolCode::from_u64(u64::from_bin(stream)?))
    }
}

impl ABISerializable for Symbol {
    fn to_bin(&self, stream: &mut ByteStream) {
        self.as_u64().to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Symbol::from_u64(u64::from_bin(stream)?)?)
    }
}

impl ABISerializable for Asset {
    fn to_bin(&self, stream: &mut ByteStream) {
        self.amount().to_bin(stream);
        self.symbol().to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let amount = i64::from_bin(stream)?;
        let symbol = Symbol::from_bin(stream)?;
        Ok(Asset::new(amount, symbol)?)
    }
}

impl ABISerializable for ExtendedAsset {
    fn to_bin(&self, stream: &mut ByteStream) {
        self.quantity.to_bin(stream);
        self.contract.to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(ExtendedAsset {
            quantity: Asset::from_bin(stream)?,
            contract: Name::from_bin(stream)?,
        })
    }
}


// -----------------------------------------------------------------------------
//     Crypto types
// -----------------------------------------------------------------------------
//
// On the wire, a public/private key or signature is a single byte for the
// curve type (`KeyType::index`) followed by the fixed-size key material.
// `KeyType::WebAuthn` signatures are larger and not supported by this crate.

macro_rules! impl_abiserializable_for_crypto_data {
    ($typ:ty, $size:expr) => {
        impl ABISerializable for $typ {
            fn to_bin(&self, stream: &mut ByteStream) {
                stream.write_byte(self.key_type().index());
                stream.write_bytes(self.data());
            }
            fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
                let key_type = KeyType::from_index(stream.read_byte()?)?;
                if key_type == KeyType::WebAuthn {
                    return UnsupportedKeyTypeSnafu { key_type }.fail().context(InvalidCryptoDataSnafu);
                }
                let data: [u8; $size] = stream.read_bytes($size)?.try_into()
                    .expect("slice of the requested size always converts");
                Ok(Self::with_key_type(key_type, data))
            }
        }
    }
}

impl_abiserializable_for_crypto_data!(PublicKey, 33);
impl_abiserializable_for_crypto_data!(PrivateKey, 32);
impl_abiserializable_for_crypto_data!(Signature, 65);


// -----------------------------------------------------------------------------
//     Generic containers
// -----------------------------------------------------------------------------
//
// blanket impls so that `#[derive(ABISerializable)]` works out of the box for
// struct fields of type `Vec<T>`, `Option<T>`, `Box<T>` and `BTreeSet<T>`.

impl<T: ABISerializable> ABISerializable for Vec<T> {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_u32(self.len() as u32);
        for item in self {
            item.to_bin(stream);
        }
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        let mut result = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            result.push(T::from_bin(stream)?);
        }
        Ok(result)
    }
}

impl<T: ABISerializable> ABISerializable for Option<T> {
    fn to_bin(&self, stream: &mut ByteStream) {
        match self {
            Some(value) => {
                true.to_bin(stream);
                value.to_bin(stream);
            },
            None => false.to_bin(stream),
        }
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(match bool::from_bin(stream)? {
            true => Some(T::from_bin(stream)?),
            false => None,
        })
    }
}

impl<T: ABISerializable> ABISerializable for Box<T> {
    fn to_bin(&self, stream: &mut ByteStream) {
        self.as_ref().to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok(Box::new(T::from_bin(stream)?))
    }
}

impl<T: ABISerializable + Ord> ABISerializable for std::collections::BTreeSet<T> {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_u32(self.len() as u32);
        for item in self {
            item.to_bin(stream);
        }
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        let mut result = std::collections::BTreeSet::new();
        for _ in 0..len {
            result.insert(T::from_bin(stream)?);
        }
        Ok(result)
    }
}

impl<K: ABISerializable + Ord, V: ABISerializable> ABISerializable for std::collections::BTreeMap<K, V> {
    fn to_bin(&self, stream: &mut ByteStream) {
        stream.write_var_u32(self.len() as u32);
        for (k, v) in self {
            k.to_bin(stream);
            v.to_bin(stream);
        }
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = stream.read_var_u32()? as usize;
        let mut result = std::collections::BTreeMap::new();
        for _ in 0..len {
            let k = K::from_bin(stream)?;
            let v = V::from_bin(stream)?;
            result.insert(k, v);
        }
        Ok(result)
    }
}

impl<A: ABISerializable, B: ABISerializable> ABISerializable for (A, B) {
    fn to_bin(&self, stream: &mut ByteStream) {
        self.0.to_bin(stream);
        self.1.to_bin(stream);
    }
    fn from_bin(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        Ok((A::from_bin(stream)?, B::from_bin(stream)?))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Name;

    #[test]
    fn roundtrip_scalars() {
        let mut s = ByteStream::new();
        42i32.to_bin(&mut s);
        true.to_bin(&mut s);
        "hello".to_owned().to_bin(&mut s);

        assert_eq!(i32::from_bin(&mut s).unwrap(), 42);
        assert_eq!(bool::from_bin(&mut s).unwrap(), true);
        assert_eq!(String::from_bin(&mut s).unwrap(), "hello");
    }

    #[test]
    fn roundtrip_name() {
        let n = Name::new("eosio.token").unwrap();
        let bin = to_bin(&n);
        let mut s = ByteStream::from(bin.0);
        assert_eq!(Name::from_bin(&mut s).unwrap(), n);
    }

    #[test]
    fn roundtrip_asset() {
        let a = Asset::from_str("1.2345 FOO").unwrap();
        let bin = to_bin(&a);
        let mut s = ByteStream::from(bin.0);
        assert_eq!(Asset::from_bin(&mut s).unwrap(), a);
    }

    #[test]
    fn decoding_a_webauthn_public_key_fails_instead_of_panicking() {
        let mut s = ByteStream::new();
        s.write_byte(KeyType::WebAuthn.index());
        s.write_bytes(&[0u8; 33]);
        assert!(PublicKey::from_bin(&mut s).is_err());
    }
}
