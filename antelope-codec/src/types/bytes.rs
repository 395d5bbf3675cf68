use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use hex::FromHexError;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};


/// A buffer of raw bytes.
///
/// This is a thin wrapper around `Vec<u8>` rather than a type alias so that
/// it gets its own `serde` implementation: Antelope renders byte buffers as
/// lowercase hex strings in JSON, which is not what `Vec<u8>` does natively
/// (it would serialize as a JSON array of numbers).
#[derive(Eq, PartialEq, Hash, Debug, Clone, Default, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new() -> Self { Self(Vec::new()) }

    pub fn from_hex(s: &str) -> Result<Self, FromHexError> {
        Ok(Self(hex::decode(s)?))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn as_slice(&self) -> &[u8] { &self.0 }
}

impl Deref for Bytes {
    type Target = Vec<u8>;
    fn deref(&self) -> &Vec<u8> { &self.0 }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Vec<u8> { &mut self.0 }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self { Bytes(v) }
}

impl From<Bytes> for Vec<u8> {
    fn from(b: Bytes) -> Self { b.0 }
}

impl FromStr for Bytes {
    type Err = FromHexError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Bytes {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de>
    {
        let s: &str = <&str>::deserialize(deserializer)?;
        Self::from_hex(s).map_err(|e| de::Error::custom(e.to_string()))
    }
}


macro_rules! impl_checksum {
    ($name:ident, $size:expr) => {
        #[doc = concat!("A fixed ", stringify!($size), "-byte digest.")]
        #[derive(Eq, PartialEq, Hash, Debug, Clone, Copy)]
        pub struct $name(pub [u8; $size]);

        impl $name {
            pub fn from_hex(s: &str) -> Result<Self, FromHexError> {
                let mut data = [0_u8; $size];
                hex::decode_to_slice(s, &mut data)?;
                Ok(Self(data))
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self { Self([0_u8; $size]) }
        }

        impl From<[u8; $size]> for $name {
            fn from(data: [u8; $size]) -> Self { Self(data) }
        }

        impl FromStr for $name {
            type Err = FromHexError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where S: Serializer
            {
                self.to_hex().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where D: Deserializer<'de>
            {
                let s: &str = <&str>::deserialize(deserializer)?;
                Self::from_hex(s).map_err(|e| de::Error::custom(e.to_string()))
            }
        }
    }
}

impl_checksum!(Checksum160, 20);
impl_checksum!(Checksum256, 32);
impl_checksum!(Checksum512, 64);


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_roundtrip() {
        let b = Bytes::from_hex("deadbeef").unwrap();
        assert_eq!(b.to_hex(), "deadbeef");
        assert_eq!(serde_json::to_string(&b).unwrap(), r#""deadbeef""#);
        assert_eq!(serde_json::from_str::<Bytes>(r#""deadbeef""#).unwrap(), b);
    }

    #[test]
    fn checksum256_roundtrip() {
        let hex = "0".repeat(63) + "1";
        let c = Checksum256::from_hex(&hex).unwrap();
        assert_eq!(c.to_hex(), hex);
    }
}
