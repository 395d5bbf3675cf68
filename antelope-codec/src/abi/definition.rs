use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use snafu::{ensure, ResultExt};

use crate::{
    ByteStream, SerializeError, Name, ActionName, TableName, Extensions, ABISerializable,
    abi::error::{ABIError, JsonSnafu, VersionSnafu, IncompatibleVersionSnafu, DeserializeSnafu},
    abi::data::{ABI_SCHEMA, CONTRACT_ABI},
    abi::serializer::ABI,
};

// needed to be able to call the `ABISerializable` derive macro below, which needs
// access to the `antelope_codec` crate
extern crate self as antelope_codec;

// see doc at: https://docs.eosnetwork.com/manuals/cdt/latest/best-practices/abi/understanding-abi-files/
//
// field layout mirrors `eosio::abi_def` (include/eosio/abi.hpp): version, types, structs,
// actions, tables, ricardian_clauses, error_messages, abi_extensions, then the tail-optional
// variants / action_results / kv_tables / protobuf_types.

type Result<T, E = ABIError> = core::result::Result<T, E>;

pub type TypeName = String;
pub type FieldName = String;


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeDef {
    pub new_type_name: TypeName,

    #[serde(rename = "type")]
    pub type_: TypeName,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: FieldName,
    #[serde(rename = "type")]
    pub type_: TypeName,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub name: TypeName,
    #[serde(default)]
    pub base: TypeName,
    pub fields: Vec<Field>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub name: ActionName,
    #[serde(rename = "type")]
    pub type_: TypeName,
    #[serde(default)]
    pub ricardian_contract: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: TableName,
    #[serde(default)]
    pub index_type: TypeName,
    #[serde(default)]
    pub key_names: Vec<FieldName>,
    #[serde(default)]
    pub key_types: Vec<TypeName>,
    #[serde(rename = "type")]
    pub type_: TypeName,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClausePair {
    pub id: String,
    pub body: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub error_code: u64,
    pub error_msg: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub name: TypeName,
    #[serde(default)]
    pub types: Vec<TypeName>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub name: ActionName,
    pub result_type: TypeName,
}

/// Declaration of the primary index of a [`KvTableEntry`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ABISerializable)]
pub struct PrimaryKeyIndex {
    pub name: FieldName,
    #[serde(rename = "type")]
    pub type_: TypeName,
}

/// Declaration of a secondary index of a [`KvTableEntry`]; only the type is
/// needed since the index's name is its key in [`KvTableEntry::secondary_indices`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ABISerializable)]
pub struct SecondaryIndex {
    #[serde(rename = "type")]
    pub type_: TypeName,
}

/// Row layout for a KV table: its row type plus the declared primary and
/// secondary indices, keyed by index name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ABISerializable)]
pub struct KvTableEntry {
    #[serde(rename = "type")]
    pub type_: TypeName,
    pub primary_index: PrimaryKeyIndex,
    #[serde(default)]
    pub secondary_indices: BTreeMap<FieldName, SecondaryIndex>,
}

/// Placeholder for the embedded protobuf descriptor set.
///
/// The protobuf bridge itself is an external collaborator (out of scope, see
/// the crate's top-level docs); with the `protobuf` feature disabled this is
/// always empty and is omitted on encode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default, ABISerializable)]
pub struct ProtobufTypes {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_descriptor_set: Vec<u8>,
}

impl ProtobufTypes {
    pub fn is_empty(&self) -> bool {
        self.file_descriptor_set.is_empty()
    }
}


#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ABIDefinition {
    pub version: String,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub structs: Vec<Struct>,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub ricardian_clauses: Vec<ClausePair>,
    #[serde(default)]
    pub error_messages: Vec<ErrorMessage>,
    #[serde(default)]
    pub abi_extensions: Extensions,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub action_results: Vec<ActionResult>,
    #[serde(default)]
    pub kv_tables: BTreeMap<Name, KvTableEntry>,
    #[serde(default, skip_serializing_if = "ProtobufTypes::is_empty")]
    pub protobuf_types: ProtobufTypes,
}


impl ABIDefinition {
    pub fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).context(JsonSnafu)
    }

    pub fn from_variant(v: &JsonValue) -> Result<Self> {
        ABIDefinition::from_str(&v.to_string())
    }

    /// Decode from binary, following the extension rule: members after
    /// `abi_extensions` are tail-optional and default when the stream runs
    /// dry before reaching them.
    pub fn from_bin(data: &mut ByteStream) -> Result<Self> {
        let version = String::from_bin(data).context(DeserializeSnafu { what: "version" })?;

        ensure!(version.starts_with("eosio::abi/1."), VersionSnafu { version });

        let parser = bin_abi_parser();
        let abi = json!({
            "version":  version,
            "types":    parser.decode_variant(data, "type_def[]")?,
            "structs":  parser.decode_variant(data, "struct_def[]")?,
            "actions":  parser.decode_variant(data, "action_def[]")?,
            "tables":   parser.decode_variant(data, "table_def[]")?,
            "ricardian_clauses":  parser.decode_variant(data, "clause_pair[]")?,
            "error_messages":     parser.decode_variant(data, "error_message[]")?,
            "abi_extensions": if !data.leftover().is_empty() {
                let exts = Extensions::from_bin(data).context(DeserializeSnafu { what: "abi_extensions" })?;
                json!(exts)
            } else { json!([]) },
            "variants": if !data.leftover().is_empty() {
                parser.decode_variant(data, "variant_def[]")?
            } else { json!([]) },
            "action_results": if !data.leftover().is_empty() {
                parser.decode_variant(data, "action_result_def[]")?
            } else { json!([]) },
            "kv_tables": if !data.leftover().is_empty() {
                let tables = BTreeMap::<Name, KvTableEntry>::from_bin(data)
                    .context(DeserializeSnafu { what: "kv_tables" })?;
                json!(tables)
            } else { json!({}) },
            "protobuf_types": if !data.leftover().is_empty() {
                let pt = ProtobufTypes::from_bin(data).context(DeserializeSnafu { what: "protobuf_types" })?;
                json!(pt)
            } else { json!({}) },
        });

        Self::from_variant(&abi)
    }

    /// Encode to binary; trailing tail-optional members are omitted entirely
    /// when empty so that round-tripping an older document reproduces the
    /// original bytes exactly (see spec §4.6 / §9 open question (c)).
    pub fn to_bin(&self, stream: &mut ByteStream) -> Result<()> {
        let parser = bin_abi_parser();
        parser.encode(stream, &self.version);
        parser.encode_variant(stream, "type_def[]", &json!(self.types))?;
        parser.encode_variant(stream, "struct_def[]", &json!(self.structs))?;
        parser.encode_variant(stream, "action_def[]", &json!(self.actions))?;
        parser.encode_variant(stream, "table_def[]", &json!(self.tables))?;
        parser.encode_variant(stream, "clause_pair[]", &json!(self.ricardian_clauses))?;
        parser.encode_variant(stream, "error_message[]", &json!(self.error_messages))?;

        if self.abi_extensions.is_empty() && self.variants.is_empty() &&
           self.action_results.is_empty() && self.kv_tables.is_empty() &&
           self.protobuf_types.is_empty()
        {
            return Ok(());
        }
        self.abi_extensions.to_bin(stream);

        if self.variants.is_empty() && self.action_results.is_empty() &&
           self.kv_tables.is_empty() && self.protobuf_types.is_empty()
        {
            return Ok(());
        }
        parser.encode_variant(stream, "variant_def[]", &json!(self.variants))?;

        if self.action_results.is_empty() && self.kv_tables.is_empty() &&
           self.protobuf_types.is_empty()
        {
            return Ok(());
        }
        parser.encode_variant(stream, "action_result_def[]", &json!(self.action_results))?;

        if self.kv_tables.is_empty() && self.protobuf_types.is_empty() {
            return Ok(());
        }
        self.kv_tables.to_bin(stream);

        if self.protobuf_types.is_empty() {
            return Ok(());
        }
        self.protobuf_types.to_bin(stream);

        Ok(())
    }

    pub fn update(&mut self, other: &ABIDefinition) -> Result<()> {
        ensure!(self.version.is_empty() || other.version.is_empty() ||
                self.version == other.version,
                IncompatibleVersionSnafu { a: self.version.clone(), b: other.version.clone() });

        self.types.extend(other.types.iter().cloned());
        self.structs.extend(other.structs.iter().cloned());
        self.actions.extend(other.actions.iter().cloned());
        self.tables.extend(other.tables.iter().cloned());
        self.ricardian_clauses.extend(other.ricardian_clauses.iter().cloned());
        self.error_messages.extend(other.error_messages.iter().cloned());
        self.abi_extensions.extend(other.abi_extensions.iter().cloned());
        self.variants.extend(other.variants.iter().cloned());
        self.action_results.extend(other.action_results.iter().cloned());
        self.kv_tables.extend(other.kv_tables.iter().map(|(k, v)| (*k, v.clone())));

        Ok(())
    }

    pub fn with_contract_abi(mut self) -> Result<Self> {
        self.update(&ABIDefinition::from_str(CONTRACT_ABI)?)?;
        Ok(self)
    }
}

impl Default for ABIDefinition {
    fn default() -> ABIDefinition {
        ABIDefinition {
            version: "eosio::abi/1.2".to_owned(),
            types: vec![],
            structs: vec![],
            actions: vec![],
            tables: vec![],
            ricardian_clauses: vec![],
            error_messages: vec![],
            abi_extensions: vec![],
            variants: vec![],
            action_results: vec![],
            kv_tables: BTreeMap::new(),
            protobuf_types: ProtobufTypes::default(),
        }
    }
}

impl ABISerializable for ABIDefinition {
    fn to_bin(&self, stream: &mut ByteStream) {
        ABIDefinition::to_bin(self, stream).unwrap()  // safe unwrap, same as teacher idiom
    }
    fn from_bin(stream: &mut ByteStream) -> core::result::Result<Self, SerializeError> {
        use crate::abiserializable::InvalidDataSnafu;
        ABIDefinition::from_bin(stream)
            .map_err(|e| InvalidDataSnafu { msg: e.to_string() }.build())
    }
}


/// The self-describing schema for `abi_def` itself, used to bootstrap the
/// binary parser that `ABIDefinition::{to,from}_bin` rely on.
pub fn abi_schema() -> &'static ABIDefinition {
    static ABI_SCHEMA_ONCE: OnceLock<ABIDefinition> = OnceLock::new();
    ABI_SCHEMA_ONCE.get_or_init(|| ABIDefinition::from_str(ABI_SCHEMA).unwrap())
}

fn bin_abi_parser() -> &'static ABI {
    static BIN_ABI_PARSER: OnceLock<ABI> = OnceLock::new();
    BIN_ABI_PARSER.get_or_init(|| {
        ABI::from_definition(abi_schema()).unwrap()  // safe unwrap
    })
}


#[cfg(test)]
mod tests {
    use serde_json::Error as JsonError;
    use crate::abi::data::ABI_EXAMPLE;
    use super::*;

    #[test]
    fn parse_abi_def() -> Result<(), JsonError> {
        let abi: ABIDefinition = serde_json::from_str(ABI_EXAMPLE)?;
        assert_eq!(abi.version, "eosio::abi/1.1");
        Ok(())
    }

    #[test]
    fn default_round_trips_through_json() {
        let def = ABIDefinition::default();
        let json = serde_json::to_string(&def).unwrap();
        let back: ABIDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }
}
